//! The resolved style snapshot: the handful of properties the annoyance
//! heuristics look at, as text.

use std::fmt;

/// Properties carried by a [`ResolvedStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    OverflowX,
    OverflowY,
    Position,
    Filter,
    BackgroundColor,
    ZIndex,
}

impl StyleProperty {
    pub const ALL: [StyleProperty; 6] = [
        StyleProperty::OverflowX,
        StyleProperty::OverflowY,
        StyleProperty::Position,
        StyleProperty::Filter,
        StyleProperty::BackgroundColor,
        StyleProperty::ZIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StyleProperty::OverflowX => "overflow-x",
            StyleProperty::OverflowY => "overflow-y",
            StyleProperty::Position => "position",
            StyleProperty::Filter => "filter",
            StyleProperty::BackgroundColor => "background-color",
            StyleProperty::ZIndex => "z-index",
        }
    }

    /// Initial value, used when nothing is declared (none of these inherit).
    pub fn initial(self) -> &'static str {
        match self {
            StyleProperty::OverflowX | StyleProperty::OverflowY => "visible",
            StyleProperty::Position => "static",
            StyleProperty::Filter => "none",
            StyleProperty::BackgroundColor => "rgba(0, 0, 0, 0)",
            StyleProperty::ZIndex => "auto",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only view of one element's style at the moment it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    values: [String; 6],
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            values: StyleProperty::ALL.map(|p| p.initial().to_string()),
        }
    }
}

impl ResolvedStyle {
    pub fn get(&self, property: StyleProperty) -> &str {
        &self.values[property.index()]
    }

    pub fn set(&mut self, property: StyleProperty, value: impl Into<String>) {
        self.values[property.index()] = value.into();
    }

    /// The `overflow` shorthand as a browser serializes it: one keyword when
    /// both axes agree, otherwise `"<x> <y>"`.
    pub fn overflow(&self) -> String {
        let x = self.get(StyleProperty::OverflowX);
        let y = self.get(StyleProperty::OverflowY);
        if x == y { x.to_string() } else { format!("{x} {y}") }
    }

    pub fn position(&self) -> &str {
        self.get(StyleProperty::Position)
    }

    pub fn filter(&self) -> &str {
        self.get(StyleProperty::Filter)
    }

    pub fn background_color(&self) -> &str {
        self.get(StyleProperty::BackgroundColor)
    }

    pub fn z_index(&self) -> &str {
        self.get(StyleProperty::ZIndex)
    }
}
