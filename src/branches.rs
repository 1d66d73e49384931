//! Branch alias tables and free-text resolution.
//!
//! The source site never names branches consistently, so matching is
//! deliberately permissive: a branch matches when any of its alias
//! substrings occurs in the normalized input. Ties break in declaration
//! order — the first configured branch wins on ambiguous input.

use serde::{Deserialize, Serialize};

/// A physical studio location with its match aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Canonical display name.
    pub name: String,
    /// Lowercase substrings matched against free text.
    pub aliases: Vec<String>,
}

/// Fixed, process-wide set of branches. Immutable after startup.
#[derive(Debug, Clone)]
pub struct BranchSet {
    branches: Vec<Branch>,
}

/// Normalize free text for alias matching: lowercase with `ё` folded to `е`,
/// so that "Звёздная" and "звездная" compare equal.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace('ё', "е")
}

impl BranchSet {
    /// Build a set from configuration. Aliases are normalized once here;
    /// the canonical name is always included as an implicit alias.
    pub fn new(branches: Vec<Branch>) -> Self {
        let branches = branches
            .into_iter()
            .map(|b| {
                let mut aliases: Vec<String> = b.aliases.iter().map(|a| normalize(a)).collect();
                let canon = normalize(&b.name);
                if !aliases.contains(&canon) {
                    aliases.push(canon);
                }
                Branch {
                    name: b.name,
                    aliases,
                }
            })
            .collect();
        Self { branches }
    }

    /// Resolve a free-text fragment to a branch, or `None` if no alias matches.
    pub fn resolve(&self, text: &str) -> Option<&Branch> {
        let haystack = normalize(text);
        self.branches
            .iter()
            .find(|b| b.aliases.iter().any(|a| haystack.contains(a.as_str())))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn default_set() -> BranchSet {
        BranchSet::new(EngineConfig::default().branches)
    }

    #[test]
    fn resolves_case_and_diacritic_variants() {
        let set = default_set();
        for text in ["звёздная", "Звездная", "ЗВЕЗДНАЯ"] {
            let branch = set.resolve(text).expect("should resolve");
            assert_eq!(branch.name, "Звёздная", "failed for {text}");
        }
    }

    #[test]
    fn resolves_substring_inside_longer_text() {
        let set = default_set();
        let branch = set.resolve("Занятия на Дыбенко по будням").unwrap();
        assert_eq!(branch.name, "Дыбенко");
    }

    #[test]
    fn resolves_latin_alias() {
        let set = default_set();
        assert_eq!(set.resolve("branch: kupchino").unwrap().name, "Купчино");
    }

    #[test]
    fn unknown_text_resolves_to_none() {
        let set = default_set();
        assert!(set.resolve("Невский проспект").is_none());
        assert!(set.resolve("").is_none());
    }

    #[test]
    fn ambiguous_input_prefers_declaration_order() {
        let set = BranchSet::new(vec![
            Branch {
                name: "Первый".into(),
                aliases: vec!["центр".into()],
            },
            Branch {
                name: "Второй".into(),
                aliases: vec!["центральный".into()],
            },
        ]);
        // Both alias lists match; the first configured branch wins.
        assert_eq!(set.resolve("центральный зал").unwrap().name, "Первый");
    }
}
