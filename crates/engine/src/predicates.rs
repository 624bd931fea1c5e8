//! Style predicates.
//!
//! Each predicate looks at one concern of a [`ResolvedStyle`] and either
//! returns nothing or the exact override to write. All rewrites are textual:
//! `hidden` becomes `auto` inside whatever overflow string the page produced,
//! so the other axis survives untouched.

use regex::Regex;
use style::ResolvedStyle;

/// One property override, always applied with `!important`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub property: &'static str,
    pub value: String,
}

impl Correction {
    fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

const RGBA_PATTERN: &str =
    r"^rgba\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(0|0?\.\d+)\s*\)$";

#[derive(Debug, Clone)]
pub struct StylePredicates {
    rgba: Regex,
}

impl Default for StylePredicates {
    fn default() -> Self {
        Self::new()
    }
}

impl StylePredicates {
    pub fn new() -> Self {
        Self {
            rgba: Regex::new(RGBA_PATTERN).expect("rgba pattern is a valid regex"),
        }
    }

    /// `overflow` containing `hidden` → `auto`; if so and `position`
    /// contains `fixed` → `static` as well.
    pub fn scroll_lock(&self, style: &ResolvedStyle) -> Vec<Correction> {
        let overflow = style.overflow();
        if !overflow.contains("hidden") {
            return Vec::new();
        }
        let mut out = vec![Correction::new("overflow", overflow.replace("hidden", "auto"))];
        let position = style.position();
        if position.contains("fixed") {
            out.push(Correction::new("position", position.replace("fixed", "static")));
        }
        out
    }

    /// Any `blur` in `filter` → `filter: none`.
    pub fn blur(&self, style: &ResolvedStyle) -> Option<Correction> {
        style
            .filter()
            .contains("blur")
            .then(|| Correction::new("filter", "none"))
    }

    /// A translucent `rgba()` background → same channels, alpha `0`.
    /// Other colour syntaxes are out of scope and never match.
    pub fn transparency(&self, style: &ResolvedStyle) -> Option<Correction> {
        let caps = self.rgba.captures(style.background_color())?;
        let alpha: f64 = caps[4].parse().ok()?;
        if alpha == 0.0 {
            return None;
        }
        Some(Correction::new(
            "background-color",
            format!("rgba({},{},{},0)", &caps[1], &caps[2], &caps[3]),
        ))
    }

    /// `z-index` other than `auto` or `0` marks a possible overlay root.
    pub fn is_stacking_candidate(&self, style: &ResolvedStyle) -> bool {
        let z = style.z_index();
        z != "auto" && z != "0"
    }
}
