//! Selector subset used by page stylesheets in fixtures: type, universal,
//! `#id` and `.class` compounds joined by descendant or child combinators.
//! Anything richer (attribute, pseudo, sibling) makes the whole selector
//! unsupported and it is dropped, so a rule never matches more than it should.

use crate::declaration::split_top_level;

/// Combinator between compound selectors in a complex selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
}

/// A compound selector such as `div#overlay.modal`. All-`None` means `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// A chain of compound selectors, stored right-to-left: `parts[0]` is the
/// subject, and each entry's combinator says how to reach the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<(CompoundSelector, Option<Combinator>)>,
}

/// CSS specificity as `(ids, classes, types)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

pub fn compute_specificity(selector: &ComplexSelector) -> Specificity {
    selector
        .parts
        .iter()
        .fold(Specificity::default(), |mut spec, (compound, _)| {
            spec.a += u32::from(compound.id.is_some());
            spec.b += compound.classes.len() as u32;
            spec.c += u32::from(compound.tag.is_some());
            spec
        })
}

/// Parse a comma-separated selector list, dropping unsupported entries.
pub fn parse_selector_list(input: &str) -> Vec<ComplexSelector> {
    split_top_level(input, ',')
        .into_iter()
        .filter_map(parse_complex_selector)
        .collect()
}

fn parse_complex_selector(input: &str) -> Option<ComplexSelector> {
    // Give `>` room so it tokenizes on whitespace.
    let spaced = input.replace('>', " > ");
    let mut parts_ltr: Vec<(CompoundSelector, Option<Combinator>)> = Vec::new();
    let mut pending = None;

    for word in spaced.split_whitespace() {
        if word == ">" {
            if parts_ltr.is_empty() || pending.is_some() {
                return None;
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(word)?;
        let combinator = if parts_ltr.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts_ltr.push((compound, combinator));
    }

    if parts_ltr.is_empty() || pending.is_some() {
        return None;
    }

    // Each left-to-right combinator links a part to its left neighbour, which
    // is exactly the next hop once the list is reversed.
    parts_ltr.reverse();
    Some(ComplexSelector { parts: parts_ltr })
}

fn parse_compound(word: &str) -> Option<CompoundSelector> {
    let mut compound = CompoundSelector::default();
    let mut rest = word;

    if let Some(stripped) = rest.strip_prefix('*') {
        rest = stripped;
    } else {
        let end = rest.find(['#', '.']).unwrap_or(rest.len());
        if end > 0 {
            compound.tag = Some(ident(&rest[..end])?.to_ascii_lowercase());
        }
        rest = &rest[end..];
    }

    while !rest.is_empty() {
        let mut chars = rest.chars();
        let marker = chars.next()?;
        let body = chars.as_str();
        let end = body.find(['#', '.']).unwrap_or(body.len());
        let name = ident(&body[..end])?.to_string();
        match marker {
            '#' => compound.id = Some(name),
            '.' => compound.classes.push(name),
            _ => return None,
        }
        rest = &body[end..];
    }
    Some(compound)
}

fn ident(s: &str) -> Option<&str> {
    let ok = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    ok.then_some(s)
}
