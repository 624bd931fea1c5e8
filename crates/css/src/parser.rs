use crate::declaration::{Declaration, parse_declarations};
use crate::selector::{ComplexSelector, parse_selector_list};

/// A CSS style rule: selectors + declarations.
#[derive(Debug, Clone)]
pub struct CssRule {
    /// The selector list for this rule.
    pub selectors: Vec<ComplexSelector>,
    /// The declarations in the rule body.
    pub declarations: Vec<Declaration>,
}

/// A parsed CSS stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// All rules in the stylesheet, in source order.
    pub rules: Vec<CssRule>,
}

/// Parse a complete CSS stylesheet from a string.
pub fn parse_stylesheet(input: &str) -> Stylesheet {
    let source = strip_comments(input);
    let mut rules = Vec::new();
    parse_rules(&source, &mut rules);
    Stylesheet { rules }
}

fn parse_rules(input: &str, rules: &mut Vec<CssRule>) {
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(at_rule) = rest.strip_prefix('@') {
            let name_end = at_rule
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(at_rule.len());
            let name = at_rule[..name_end].to_ascii_lowercase();
            let brace = rest.find('{');
            let semi = rest.find(';');
            match (brace, semi) {
                // Statement at-rule (`@import ...;`).
                (_, Some(s)) if brace.is_none_or(|b| s < b) => {
                    rest = &rest[s + 1..];
                }
                (Some(b), _) => {
                    let end = matching_brace(rest, b);
                    // Conditional group rules hold ordinary rules; the
                    // condition itself is assumed to match.
                    if matches!(name.as_str(), "media" | "supports" | "layer" | "container") {
                        parse_rules(&rest[b + 1..end.min(rest.len())], rules);
                    }
                    rest = rest.get(end + 1..).unwrap_or("");
                }
                _ => break,
            }
            continue;
        }

        let Some(open) = rest.find('{') else {
            break;
        };
        let close = matching_brace(rest, open);
        let selectors = parse_selector_list(rest[..open].trim());
        let body = &rest[open + 1..close.min(rest.len())];
        if !selectors.is_empty() {
            rules.push(CssRule {
                selectors,
                declarations: parse_declarations(body),
            });
        }
        rest = rest.get(close + 1..).unwrap_or("");
    }
}

/// Index of the `}` closing the block opened at `open`, or `input.len()`
/// when the block runs to end of input.
fn matching_brace(input: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (i, c) in input[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return open + i;
                }
            }
            _ => {}
        }
    }
    input.len()
}

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_stylesheet() {
        let css = r#"
            body {
                overflow: hidden;
                position: fixed;
            }
        "#;
        let sheet = parse_stylesheet(css);
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors[0].parts[0].0.tag.as_deref(), Some("body"));
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].name, "overflow");
        assert_eq!(rule.declarations[1].value, "fixed");
    }

    #[test]
    fn test_parse_multiple_rules_and_selectors() {
        let sheet = parse_stylesheet(
            ".modal, .backdrop { z-index: 1000 } #paywall { filter: blur(3px) !important; }",
        );
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].selectors.len(), 2);
        assert!(sheet.rules[1].declarations[0].important);
    }

    #[test]
    fn test_comments_are_ignored() {
        let sheet = parse_stylesheet("/* { */ div { z-index: 5 } /* trailing");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].value, "5");
    }

    #[test]
    fn test_media_block_rules_are_flattened() {
        let sheet = parse_stylesheet(
            "@import url(x.css); @media (max-width: 600px) { div { overflow: hidden } } p { color: red }",
        );
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].declarations[0].name, "overflow");
    }

    #[test]
    fn test_other_at_rules_are_skipped() {
        let sheet = parse_stylesheet("@keyframes fade { from { opacity: 0 } to { opacity: 1 } } div { z-index: 2 }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].name, "z-index");
    }

    #[test]
    fn test_unsupported_selector_rule_is_dropped() {
        let sheet = parse_stylesheet("a:hover { z-index: 9 } div { z-index: 1 }");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn test_non_ascii_selector_rule_is_dropped() {
        let sheet = parse_stylesheet("*é { z-index: 1 } .ok { z-index: 2 }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selectors[0].parts[0].0.classes, vec!["ok"]);
        assert_eq!(sheet.rules[0].declarations[0].value, "2");
    }

    #[test]
    fn test_unterminated_block() {
        let sheet = parse_stylesheet("div { overflow: hidden");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].value, "hidden");
    }
}
