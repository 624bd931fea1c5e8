//! Engine configuration.
//!
//! Everything here is immutable once loaded and is handed to the components
//! that need it at construction time. Every section is optional in the TOML
//! file; missing sections fall back to the built-in defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Whether the engine may start on the next page load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Enabled,
    Disabled,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mode: RunMode,
    pub tags: TagSets,
    pub sites: SiteLists,
    pub reactor: ReactorConfig,
}

/// The five tag lists behind the classifier's exclusion and guard rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSets {
    /// Never inspected, never mutated, never walked into.
    pub excluded: Vec<String>,
    /// Never get their background made transparent.
    pub no_transparency: Vec<String>,
    /// Never removed for having a raised z-index.
    pub no_stacking: Vec<String>,
    /// An ancestor with one of these tags vetoes a stacking removal.
    pub safe_ancestor: Vec<String>,
    /// A descendant with one of these tags vetoes a stacking removal.
    pub safe_descendant: Vec<String>,
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

impl Default for TagSets {
    fn default() -> Self {
        Self {
            excluded: tags(&[
                "head", "meta", "link", "script", "noscript", "style", "title", "base",
                "template", "br", "hr", "wbr", "li", "dt", "dd", "tr", "td", "th", "thead",
                "tbody", "tfoot", "caption", "col", "colgroup", "input", "select", "option",
                "optgroup", "textarea", "button", "label", "p", "h1", "h2", "h3", "h4", "h5",
                "h6", "pre", "code", "b", "i", "u", "s", "em", "strong", "small", "sub", "sup",
                "mark", "kbd", "samp", "var", "abbr", "cite", "q", "dfn", "time", "a", "img",
                "picture", "source", "track", "svg", "path", "canvas",
            ]),
            no_transparency: tags(&[
                "header", "nav", "footer", "aside", "main", "article", "section", "ul", "ol",
                "dl", "table", "form", "figure", "figcaption", "details", "summary",
            ]),
            no_stacking: tags(&[
                "html", "body", "header", "nav", "footer", "aside", "main", "article",
                "section", "menu", "ul", "ol", "dl", "table", "form", "figure",
            ]),
            safe_ancestor: tags(&[
                "header", "nav", "footer", "aside", "menu", "ul", "ol", "dl", "table", "form",
                "figure",
            ]),
            safe_descendant: tags(&["header", "main", "article", "aside", "nav", "footer"]),
        }
    }
}

impl TagSets {
    /// Every list with its config key, for validation and table building.
    pub fn named(&self) -> [(&'static str, &[String]); 5] {
        [
            ("excluded", self.excluded.as_slice()),
            ("no_transparency", self.no_transparency.as_slice()),
            ("no_stacking", self.no_stacking.as_slice()),
            ("safe_ancestor", self.safe_ancestor.as_slice()),
            ("safe_descendant", self.safe_descendant.as_slice()),
        ]
    }
}

/// Static host lists consulted by the site gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLists {
    /// Exact hosts on which the engine never runs.
    pub ignored: Vec<String>,
    /// Regular expressions; a match means the engine never runs.
    pub ignored_patterns: Vec<String>,
    /// Exact hosts routed to the per-site override hook.
    pub special: Vec<String>,
}

/// Mutation reactor tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Walk the whole inserted subtree instead of classifying only the
    /// inserted node itself.
    pub recurse_into_insertions: bool,
    /// Upper bound on collect/run rounds in a single `pump` call.
    pub max_turns_per_pump: usize,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            recurse_into_insertions: true,
            max_turns_per_pump: 64,
        }
    }
}

/// Loads and validates [`EngineConfig`] from TOML.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<EngineConfig> {
        let content = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject tag names that could never match an element, site patterns
    /// that do not compile, and a pump that could never run a turn.
    pub fn validate(config: &EngineConfig) -> Result<()> {
        for (set, list) in config.tags.named() {
            if let Some(bad) = list.iter().find(|t| !is_tag_name(t)) {
                return Err(EngineError::TagName {
                    set,
                    tag: bad.clone(),
                });
            }
        }
        for pattern in &config.sites.ignored_patterns {
            regex::Regex::new(pattern).map_err(|source| EngineError::SitePattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        if config.reactor.max_turns_per_pump == 0 {
            return Err(EngineError::ZeroPumpTurns);
        }
        Ok(())
    }
}

fn is_tag_name(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.mode, RunMode::Enabled);
        assert!(config.reactor.recurse_into_insertions);
    }

    #[test]
    fn load_partial_sections() {
        let content = r#"
            mode = "disabled"

            [sites]
            ignored = ["mail.example.com"]
            ignored_patterns = ['^.*\.bank\.example$']

            [tags]
            safe_descendant = ["header", "nav"]

            [reactor]
            recurse_into_insertions = false
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.mode, RunMode::Disabled);
        assert_eq!(config.sites.ignored, vec!["mail.example.com"]);
        assert_eq!(config.tags.safe_descendant, vec!["header", "nav"]);
        // Untouched lists keep their defaults.
        assert_eq!(config.tags.excluded, TagSets::default().excluded);
        assert!(!config.reactor.recurse_into_insertions);
        assert_eq!(config.reactor.max_turns_per_pump, 64);
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sites]").unwrap();
        writeln!(file, "special = [\"news.example.org\"]").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.sites.special, vec!["news.example.org"]);
    }

    #[test]
    fn load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/declutter.toml"));
        assert!(matches!(result, Err(EngineError::ConfigIo { .. })));
    }

    #[test]
    fn load_invalid_toml() {
        let result = ConfigLoader::load_str("mode = [unclosed");
        assert!(matches!(result, Err(EngineError::ConfigParse(_))));
    }

    #[test]
    fn invalid_mode_value() {
        assert!(ConfigLoader::load_str("mode = \"sometimes\"").is_err());
    }

    #[test]
    fn bad_site_pattern_is_rejected() {
        let result = ConfigLoader::load_str("[sites]\nignored_patterns = [\"(unclosed\"]");
        match result {
            Err(EngineError::SitePattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected SitePattern error, got {other:?}"),
        }
    }

    #[test]
    fn bad_tag_name_is_rejected() {
        let result = ConfigLoader::load_str("[tags]\nexcluded = [\"div span\"]");
        assert!(matches!(
            result,
            Err(EngineError::TagName { set: "excluded", .. })
        ));
    }

    #[test]
    fn zero_pump_turns_rejected() {
        let result = ConfigLoader::load_str("[reactor]\nmax_turns_per_pump = 0");
        assert!(matches!(result, Err(EngineError::ZeroPumpTurns)));
        assert!(ConfigLoader::load_str("[reactor]\nmax_turns_per_pump = 1").is_ok());
    }

    #[test]
    fn default_sets_cover_landmarks() {
        let sets = TagSets::default();
        for landmark in ["header", "main", "article", "aside", "nav", "footer"] {
            assert!(sets.safe_descendant.iter().any(|t| t == landmark));
        }
        assert!(!sets.excluded.iter().any(|t| t == "span" || t == "div"));
    }
}
