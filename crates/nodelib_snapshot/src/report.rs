// SPDX-License-Identifier: MIT OR Apache-2.0
//! Restore outcome: counts, skipped items and nested group reports.

use indexmap::IndexMap;
use std::fmt;

/// A node, value or link the restorer had to skip
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RestoreIssue {
    /// Neither the recorded type nor any fallback could be instantiated
    #[error("Node {node}: unknown node type {node_type}")]
    UnknownNodeType {
        /// Recorded node name
        node: String,
        /// Recorded type tag
        node_type: String,
    },

    /// The created node has no socket with the recorded identifier
    #[error("Node {node}: no socket {identifier}")]
    MissingSocket {
        /// Node name
        node: String,
        /// Socket identifier
        identifier: String,
    },

    /// A link endpoint node was not restored
    #[error("Link {from_node} -> {to_node}: node {missing} not restored")]
    LinkEndpointMissing {
        /// Recorded source node
        from_node: String,
        /// Recorded target node
        to_node: String,
        /// The endpoint that is missing
        missing: String,
    },

    /// An identical link already exists
    #[error("Link {from_node}:{from_socket} -> {to_node}:{to_socket} already exists")]
    DuplicateLinkSkipped {
        /// Source node name in the target graph
        from_node: String,
        /// Source socket identifier
        from_socket: String,
        /// Target node name in the target graph
        to_node: String,
        /// Target socket identifier
        to_socket: String,
    },

    /// The host refused a socket default
    #[error("Node {node}: value for {identifier} rejected: {reason}")]
    ValueRejected {
        /// Node name
        node: String,
        /// Socket identifier
        identifier: String,
        /// Host explanation
        reason: String,
    },

    /// The host refused a node setting
    #[error("Node {node}: property {key} rejected: {reason}")]
    PropertyRejected {
        /// Node name
        node: String,
        /// Property key
        key: String,
        /// Host explanation
        reason: String,
    },

    /// The host refused the layout
    #[error("Node {node}: layout rejected: {reason}")]
    LayoutRejected {
        /// Node name
        node: String,
        /// Host explanation
        reason: String,
    },

    /// The nested graph of a group node could not be prepared
    #[error("Group {node}: {reason}")]
    GroupRejected {
        /// Group node name
        node: String,
        /// Host explanation
        reason: String,
    },

    /// The host refused a connection
    #[error("Link {from_node}:{from_socket} -> {to_node}:{to_socket} rejected: {reason}")]
    LinkRejected {
        /// Source node name
        from_node: String,
        /// Source socket identifier
        from_socket: String,
        /// Target node name
        to_node: String,
        /// Target socket identifier
        to_socket: String,
        /// Host explanation
        reason: String,
    },
}

/// Result of restoring one document into one graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// Nodes created in this graph
    pub nodes_created: usize,
    /// Nodes that could not be created
    pub nodes_skipped: usize,
    /// Links created in this graph
    pub links_created: usize,
    /// Links skipped for any reason
    pub links_skipped: usize,
    /// Everything that went wrong, in the order it happened
    pub issues: Vec<RestoreIssue>,
    /// Final names of the created nodes, in document order
    pub created_names: Vec<String>,
    /// Reports for nested group graphs, by group node name
    pub groups: IndexMap<String, RestoreReport>,
}

impl RestoreReport {
    /// No issues here or in any nested group
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.groups.values().all(RestoreReport::is_clean)
    }

    /// Issues of this graph and every nested group
    pub fn all_issues(&self) -> Vec<&RestoreIssue> {
        let mut issues: Vec<&RestoreIssue> = self.issues.iter().collect();
        for group in self.groups.values() {
            issues.extend(group.all_issues());
        }
        issues
    }

    /// Nodes created here and in nested groups
    pub fn total_nodes_created(&self) -> usize {
        self.nodes_created + self.groups.values().map(RestoreReport::total_nodes_created).sum::<usize>()
    }

    pub(crate) fn push(&mut self, issue: RestoreIssue) {
        match issue {
            RestoreIssue::DuplicateLinkSkipped { .. } => tracing::debug!("{}", issue),
            _ => tracing::warn!("{}", issue),
        }
        self.issues.push(issue);
    }
}

impl fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes created, {} skipped; {} links created, {} skipped",
            self.nodes_created, self.nodes_skipped, self.links_created, self.links_skipped
        )?;
        if !self.groups.is_empty() {
            write!(f, "; {} nested groups", self.groups.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_issues_are_collected() {
        let mut inner = RestoreReport::default();
        inner.push(RestoreIssue::MissingSocket {
            node: "Math".to_string(),
            identifier: "Value_003".to_string(),
        });
        let mut outer = RestoreReport {
            nodes_created: 2,
            ..Default::default()
        };
        assert!(outer.is_clean());
        outer.groups.insert("Group".to_string(), inner);

        assert!(!outer.is_clean());
        assert_eq!(outer.all_issues().len(), 1);
        assert_eq!(
            outer.to_string(),
            "2 nodes created, 0 skipped; 0 links created, 0 skipped; 1 nested groups"
        );
    }

    #[test]
    fn test_issue_messages() {
        let issue = RestoreIssue::LinkEndpointMissing {
            from_node: "Gone".to_string(),
            to_node: "Blur".to_string(),
            missing: "Gone".to_string(),
        };
        assert_eq!(issue.to_string(), "Link Gone -> Blur: node Gone not restored");
    }
}
