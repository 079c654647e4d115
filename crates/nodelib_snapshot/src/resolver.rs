// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fallback type identifiers for node types a host no longer knows.
//!
//! Documents outlive host versions. Types get renamed, generic tags
//! (`GROUP_INPUT`, `FRAME`) stand in for concrete identifiers, and nodes
//! move between graph kinds. [`TypeNameResolver`] produces an ordered list
//! of identifiers to try after the recorded one fails:
//!
//! 1. The static rename table
//! 2. The naming convention (`MESH_TO_POINTS` becomes `GeometryNodeMeshToPoints`)
//! 3. A scan of the host's known identifiers, best match first

use nodelib_graph::GraphKind;

/// One entry of the rename table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameRule {
    /// Type tag as found in documents
    pub recorded: &'static str,
    /// Graph kind the rule applies to, `None` for every kind
    pub kind: Option<GraphKind>,
    /// Identifier to try instead
    pub replacement: &'static str,
}

const fn rule(recorded: &'static str, kind: Option<GraphKind>, replacement: &'static str) -> RenameRule {
    RenameRule {
        recorded,
        kind,
        replacement,
    }
}

const COMPOSITING: Option<GraphKind> = Some(GraphKind::Compositing);
const SHADER: Option<GraphKind> = Some(GraphKind::Shader);
const GEOMETRY: Option<GraphKind> = Some(GraphKind::Geometry);

/// Generic tags and known renames between host versions
pub const DEFAULT_RENAMES: &[RenameRule] = &[
    // Generic tags
    rule("GROUP_INPUT", None, "NodeGroupInput"),
    rule("GROUP_OUTPUT", None, "NodeGroupOutput"),
    rule("FRAME", None, "NodeFrame"),
    rule("REROUTE", None, "NodeReroute"),
    rule("GROUP", COMPOSITING, "CompositorNodeGroup"),
    rule("GROUP", SHADER, "ShaderNodeGroup"),
    rule("GROUP", GEOMETRY, "GeometryNodeGroup"),
    rule("NodeGroup", COMPOSITING, "CompositorNodeGroup"),
    rule("NodeGroup", SHADER, "ShaderNodeGroup"),
    rule("NodeGroup", GEOMETRY, "GeometryNodeGroup"),
    rule("R_LAYERS", COMPOSITING, "CompositorNodeRLayers"),
    rule("MIX_RGB", COMPOSITING, "CompositorNodeMixRGB"),
    rule("MIX_RGB", SHADER, "ShaderNodeMix"),
    rule("MATH", COMPOSITING, "CompositorNodeMath"),
    rule("MATH", SHADER, "ShaderNodeMath"),
    rule("MATH", GEOMETRY, "ShaderNodeMath"),
    // Version renames
    rule("ShaderNodeMixRGB", None, "ShaderNodeMix"),
    rule("CompositorNodeSepRGBA", None, "CompositorNodeSeparateColor"),
    rule("CompositorNodeCombRGBA", None, "CompositorNodeCombineColor"),
    rule("SEPRGBA", COMPOSITING, "CompositorNodeSeparateColor"),
    rule("COMBRGBA", COMPOSITING, "CompositorNodeCombineColor"),
    rule("ShaderNodeSeparateRGB", None, "ShaderNodeSeparateColor"),
    rule("ShaderNodeCombineRGB", None, "ShaderNodeCombineColor"),
    rule("ShaderNodeTexMusgrave", None, "ShaderNodeTexNoise"),
    rule("GeometryNodeAttributeRandomize", None, "FunctionNodeRandomValue"),
];

/// Prefixes stripped from recorded identifiers, longest first
const KNOWN_PREFIXES: &[&str] = &["CompositorNode", "GeometryNode", "FunctionNode", "ShaderNode", "Node"];

/// Produces fallback type identifiers for a target graph kind.
///
/// Pure and deterministic: the host's identifier list is passed in by the
/// caller.
#[derive(Debug, Clone)]
pub struct TypeNameResolver {
    renames: Vec<RenameRule>,
}

impl Default for TypeNameResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RENAMES.to_vec())
    }
}

impl TypeNameResolver {
    /// Create a resolver with a custom rename table
    pub fn new(renames: Vec<RenameRule>) -> Self {
        Self { renames }
    }

    /// Candidate identifiers for `recorded` in a graph of `kind`, best first.
    ///
    /// `known_types` returns every identifier the host knows with a given
    /// prefix. The recorded name itself is never a candidate. A rename rule
    /// bound to `kind` is final: no convention or scan candidates follow it.
    pub fn candidates<F>(&self, recorded: &str, kind: GraphKind, known_types: F) -> Vec<String>
    where
        F: Fn(&str) -> Vec<String>,
    {
        let mut candidates: Vec<String> = Vec::new();
        let mut push = |candidate: String| {
            if candidate != recorded && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        };

        let mut kind_specific = false;
        for rule in &self.renames {
            if rule.recorded == recorded && rule.kind.map_or(true, |k| k == kind) {
                kind_specific |= rule.kind.is_some();
                push(rule.replacement.to_string());
            }
        }
        // A per-kind rule names the type outright; guessing further would
        // offer the same tag from another kind (`GROUP` -> `ShaderNodeGroup`)
        if kind_specific {
            return candidates;
        }

        let stems = stems(recorded);
        let mut prefixes = vec![kind.type_prefix()];
        prefixes.extend_from_slice(kind.shared_prefixes());

        for stem in &stems {
            for prefix in &prefixes {
                push(format!("{prefix}{stem}"));
            }
        }

        for id in scan(&stems, &prefixes, known_types) {
            push(id);
        }

        candidates
    }
}

/// Type name stems derived from a recorded identifier
fn stems(recorded: &str) -> Vec<String> {
    let mut stems = Vec::new();
    if is_screaming_snake(recorded) {
        let parts: Vec<&str> = recorded.split('_').filter(|p| !p.is_empty()).collect();
        stems.push(parts.iter().map(|p| title_case(p)).collect::<String>());
        stems.push(
            parts
                .iter()
                .map(|p| if is_acronym(p) { (*p).to_string() } else { title_case(p) })
                .collect::<String>(),
        );
    } else {
        let stripped = KNOWN_PREFIXES
            .iter()
            .find_map(|prefix| recorded.strip_prefix(prefix))
            .unwrap_or(recorded);
        stems.push(stripped.to_string());
    }
    stems.retain(|s| !s.is_empty());
    stems.dedup();
    stems
}

fn is_screaming_snake(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

// RGB, HSV, RGBA
fn is_acronym(part: &str) -> bool {
    !part.chars().any(|c| matches!(c, 'A' | 'E' | 'I' | 'O' | 'U'))
}

fn title_case(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

fn normalize(s: &str) -> String {
    s.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
}

/// Host identifiers matching a stem, ordered exact > suffix > substring.
/// The sort is stable, so equal matches keep the host's order.
fn scan<F>(stems: &[String], prefixes: &[&str], known_types: F) -> Vec<String>
where
    F: Fn(&str) -> Vec<String>,
{
    let needles: Vec<String> = stems.iter().map(|s| normalize(s)).filter(|s| !s.is_empty()).collect();
    if needles.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(u8, String)> = Vec::new();
    for prefix in prefixes {
        for id in known_types(prefix) {
            if ranked.iter().any(|(_, known)| *known == id) {
                continue;
            }
            let stem = normalize(id.strip_prefix(prefix).unwrap_or(&id));
            let rank = needles
                .iter()
                .filter_map(|needle| {
                    if stem == *needle {
                        Some(0)
                    } else if stem.ends_with(needle.as_str()) {
                        Some(1)
                    } else if stem.contains(needle.as_str()) {
                        Some(2)
                    } else {
                        None
                    }
                })
                .min();
            if let Some(rank) = rank {
                ranked.push((rank, id));
            }
        }
    }

    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, id)| id).collect()
}
