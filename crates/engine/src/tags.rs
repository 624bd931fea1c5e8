//! Tag capability table.
//!
//! The configured tag lists are folded once into a map from tag name to a set
//! of capability bits, so every per-element question is a single lookup.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::config::TagSets;

bitflags! {
    /// What the classifier and guard may (not) do with an element of a tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TagCaps: u8 {
        const EXCLUDED = 0b0_0001;
        const NO_TRANSPARENCY = 0b0_0010;
        const NO_STACKING = 0b0_0100;
        const SAFE_ANCESTOR = 0b0_1000;
        const SAFE_DESCENDANT = 0b1_0000;
    }
}

impl Default for TagCaps {
    fn default() -> Self {
        TagCaps::empty()
    }
}

#[derive(Debug, Clone)]
pub struct TagTable {
    caps: HashMap<String, TagCaps>,
}

impl Default for TagTable {
    fn default() -> Self {
        Self::new(&TagSets::default())
    }
}

impl TagTable {
    pub fn new(sets: &TagSets) -> Self {
        let bits = [
            TagCaps::EXCLUDED,
            TagCaps::NO_TRANSPARENCY,
            TagCaps::NO_STACKING,
            TagCaps::SAFE_ANCESTOR,
            TagCaps::SAFE_DESCENDANT,
        ];
        let mut caps: HashMap<String, TagCaps> = HashMap::new();
        for ((_, list), bit) in sets.named().into_iter().zip(bits) {
            for tag in list {
                *caps.entry(tag.to_ascii_lowercase()).or_default() |= bit;
            }
        }
        Self { caps }
    }

    /// Capabilities of `tag`; unknown tags have none.
    pub fn caps(&self, tag: &str) -> TagCaps {
        match self.caps.get(tag) {
            Some(caps) => *caps,
            None if tag.bytes().any(|b| b.is_ascii_uppercase()) => self
                .caps
                .get(&tag.to_ascii_lowercase())
                .copied()
                .unwrap_or_default(),
            None => TagCaps::empty(),
        }
    }

    pub fn has(&self, tag: &str, cap: TagCaps) -> bool {
        self.caps(tag).contains(cap)
    }

    pub fn is_excluded(&self, tag: &str) -> bool {
        self.has(tag, TagCaps::EXCLUDED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_bits() {
        let table = TagTable::default();
        assert!(table.is_excluded("script"));
        assert!(table.is_excluded("li"));
        assert!(!table.is_excluded("div"));
        assert!(table.has("header", TagCaps::NO_TRANSPARENCY | TagCaps::NO_STACKING));
        assert!(table.has("header", TagCaps::SAFE_DESCENDANT));
        assert!(table.has("ul", TagCaps::SAFE_ANCESTOR));
        assert!(!table.has("main", TagCaps::SAFE_ANCESTOR));
        assert_eq!(table.caps("span"), TagCaps::empty());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = TagTable::default();
        assert!(table.is_excluded("SCRIPT"));
        assert!(table.has("Nav", TagCaps::SAFE_DESCENDANT));
    }

    #[test]
    fn custom_sets_override_defaults() {
        let sets = TagSets {
            excluded: vec!["div".into()],
            no_transparency: Vec::new(),
            no_stacking: Vec::new(),
            safe_ancestor: Vec::new(),
            safe_descendant: vec!["Section".into()],
        };
        let table = TagTable::new(&sets);
        assert!(table.is_excluded("div"));
        assert!(!table.is_excluded("script"));
        assert!(table.has("section", TagCaps::SAFE_DESCENDANT));
    }

    #[test]
    fn each_excluded_default_tag_has_the_bit() {
        let sets = TagSets::default();
        let table = TagTable::new(&sets);
        for tag in &sets.excluded {
            assert!(table.is_excluded(tag), "{tag} should be excluded");
        }
    }
}
