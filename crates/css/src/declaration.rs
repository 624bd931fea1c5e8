//! Declaration blocks: the text inside `{ ... }` or a `style="..."` attribute.
//!
//! Values are kept as trimmed source text. Everything downstream compares
//! values textually (`overflow` containing `hidden`, `rgba(...)` patterns), so
//! a lossless string is more useful here than a typed value tree.

/// A CSS declaration (property: value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-cased property name, e.g. `overflow`, `background-color`.
    pub name: String,
    /// Value text with `!important` stripped.
    pub value: String,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    pub fn new(name: &str, value: &str, important: bool) -> Self {
        Self {
            name: name.trim().to_ascii_lowercase(),
            value: value.trim().to_string(),
            important,
        }
    }
}

/// Parse a declaration block. Malformed entries are dropped, never reported.
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    split_top_level(input, ';')
        .into_iter()
        .filter_map(parse_declaration)
        .collect()
}

/// Serialize declarations back to `name: value[ !important]; ...` form.
pub fn serialize_declarations(declarations: &[Declaration]) -> String {
    let mut out = String::new();
    for decl in declarations {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&decl.name);
        out.push_str(": ");
        out.push_str(&decl.value);
        if decl.important {
            out.push_str(" !important");
        }
        out.push(';');
    }
    out
}

fn parse_declaration(raw: &str) -> Option<Declaration> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if !is_property_name(name) {
        return None;
    }
    let (value, important) = strip_important(value.trim());
    if value.is_empty() {
        return None;
    }
    Some(Declaration::new(name, value, important))
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split off a trailing `!important` (any case, whitespace allowed after `!`).
fn strip_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        let tail = value[bang + 1..].trim();
        if tail.eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

/// Split on `sep`, ignoring separators nested in parentheses or quotes.
pub(crate) fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if c == sep && depth == 0 => {
                    parts.push(&input[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(&input[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_block() {
        let decls = parse_declarations("position: fixed; overflow:hidden");
        assert_eq!(
            decls,
            vec![
                Declaration::new("position", "fixed", false),
                Declaration::new("overflow", "hidden", false),
            ]
        );
    }

    #[test]
    fn important_flag_is_stripped() {
        let decls = parse_declarations("filter: blur(4px) ! IMPORTANT");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value, "blur(4px)");
        assert!(decls[0].important);
    }

    #[test]
    fn semicolons_inside_functions_do_not_split() {
        let decls = parse_declarations("background-image: url('a;b.png'); z-index: 3");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "url('a;b.png')");
        assert_eq!(decls[1].name, "z-index");
    }

    #[test]
    fn property_names_are_lowercased() {
        let decls = parse_declarations("Background-Color: rgba(1, 2, 3, 0.5)");
        assert_eq!(decls[0].name, "background-color");
        assert_eq!(decls[0].value, "rgba(1, 2, 3, 0.5)");
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let decls = parse_declarations("no colon here; : orphan; z-index: ; color: red;;");
        assert_eq!(decls, vec![Declaration::new("color", "red", false)]);
    }

    #[test]
    fn serialize_keeps_order_and_priority() {
        let decls = vec![
            Declaration::new("overflow", "auto", true),
            Declaration::new("color", "red", false),
        ];
        assert_eq!(
            serialize_declarations(&decls),
            "overflow: auto !important; color: red;"
        );
        assert_eq!(parse_declarations(&serialize_declarations(&decls)), decls);
    }
}
