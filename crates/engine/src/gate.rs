//! Site gate: decides from the host name whether the engine runs at all.

use std::collections::HashSet;

use dom::Dom;
use regex::Regex;

use crate::config::SiteLists;
use crate::context::DocumentContext;
use crate::error::{EngineError, Result};

/// What the gate decided for one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteMode {
    /// The engine stays off for the page's lifetime.
    Ignored,
    /// Routed to the [`SiteOverride`] hook instead of the general engine.
    Special,
    General,
}

impl std::fmt::Display for SiteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SiteMode::Ignored => "ignored",
            SiteMode::Special => "special",
            SiteMode::General => "general",
        })
    }
}

/// Per-site handling for hosts on the special list.
pub trait SiteOverride {
    fn apply(&self, host: &str, dom: &mut Dom, ctx: Option<&DocumentContext>);
}

/// The default hook: no site gets special treatment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOverride;

impl SiteOverride for NoopOverride {
    fn apply(&self, host: &str, _dom: &mut Dom, _ctx: Option<&DocumentContext>) {
        tracing::debug!(host, "no override registered");
    }
}

#[derive(Debug, Clone, Default)]
pub struct SiteGate {
    ignored: HashSet<String>,
    ignored_patterns: Vec<Regex>,
    special: HashSet<String>,
}

impl SiteGate {
    pub fn from_config(lists: &SiteLists) -> Result<Self> {
        let ignored_patterns = lists
            .ignored_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| EngineError::SitePattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            ignored: lists.ignored.iter().map(|h| normalize_host(h)).collect(),
            ignored_patterns,
            special: lists.special.iter().map(|h| normalize_host(h)).collect(),
        })
    }

    /// First match wins: exact ignored, ignored patterns, exact special.
    pub fn classify(&self, host: &str) -> SiteMode {
        let host = normalize_host(host);
        if self.ignored.contains(&host) || self.ignored_patterns.iter().any(|re| re.is_match(&host))
        {
            SiteMode::Ignored
        } else if self.special.contains(&host) {
            SiteMode::Special
        } else {
            SiteMode::General
        }
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> SiteGate {
        SiteGate::from_config(&SiteLists {
            ignored: vec!["mail.example.com".into()],
            ignored_patterns: vec![r"(^|\.)bank\.example$".into()],
            special: vec!["News.Example.org".into(), "bank.example".into()],
        })
        .unwrap()
    }

    #[test]
    fn exact_ignored_host() {
        assert_eq!(gate().classify("mail.example.com"), SiteMode::Ignored);
        assert_eq!(gate().classify("MAIL.example.com."), SiteMode::Ignored);
    }

    #[test]
    fn pattern_ignored_host_beats_special() {
        assert_eq!(gate().classify("online.bank.example"), SiteMode::Ignored);
        assert_eq!(gate().classify("bank.example"), SiteMode::Ignored);
    }

    #[test]
    fn special_and_general() {
        assert_eq!(gate().classify("news.example.org"), SiteMode::Special);
        assert_eq!(gate().classify("blog.example.org"), SiteMode::General);
        assert_eq!(SiteGate::default().classify("anything"), SiteMode::General);
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let lists = SiteLists {
            ignored_patterns: vec!["[".into()],
            ..SiteLists::default()
        };
        assert!(matches!(
            SiteGate::from_config(&lists),
            Err(EngineError::SitePattern { .. })
        ));
    }
}
