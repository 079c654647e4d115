// SPDX-License-Identifier: MIT OR Apache-2.0
//! Collision-free `.NNN` names for nodes and graphs.

use std::collections::HashSet;
use uuid::Uuid;

/// Highest numbered suffix tried before falling back to a unique one
pub const MAX_NUMBERED_SUFFIX: u32 = 999;

/// `name` if free, otherwise the first free `name.001` .. `name.999`,
/// otherwise `name.<uuid>`.
///
/// A colliding name that already carries a numbered suffix is renumbered
/// from its base, so `Blur.001` becomes `Blur.002` rather than `Blur.001.001`.
pub fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let base = numbered_base(name).unwrap_or(name);
    (1..=MAX_NUMBERED_SUFFIX)
        .map(|i| format!("{base}.{i:03}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| format!("{base}.{}", Uuid::new_v4().simple()))
}

fn numbered_base(name: &str) -> Option<&str> {
    let (base, suffix) = name.rsplit_once('.')?;
    let numbered = !base.is_empty() && suffix.len() == 3 && suffix.bytes().all(|b| b.is_ascii_digit());
    numbered.then_some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name() {
        let taken: HashSet<String> = ["Blur", "Blur.001", "Mix.002"].iter().map(|s| s.to_string()).collect();
        assert_eq!(unique_name("Glare", &taken), "Glare");
        assert_eq!(unique_name("Blur", &taken), "Blur.002");
        assert_eq!(unique_name("Blur.001", &taken), "Blur.002");
        assert_eq!(unique_name("Mix.002", &taken), "Mix.001");
        assert_eq!(unique_name("v1.5", &taken), "v1.5");

        let crowded: HashSet<String> = std::iter::once("Math".to_string())
            .chain((1..=MAX_NUMBERED_SUFFIX).map(|i| format!("Math.{i:03}")))
            .collect();
        let fallback = unique_name("Math", &crowded);
        assert!(fallback.starts_with("Math."));
        assert!(!crowded.contains(&fallback));
    }
}
