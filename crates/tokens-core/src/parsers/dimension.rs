//! Dimension parser (C2): `<number><unit>` literals, unit case-insensitive.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{BorderRadiusUnit, BorderRadiusValue, DimensionUnit, DimensionValue};

fn dimension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(-?[0-9]+(?:\.[0-9]+)?)(px|rem|em|pt)$").expect("valid regex"))
}

fn border_radius_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(-?[0-9]+(?:\.[0-9]+)?)(px|rem|em|%)$").expect("valid regex")
    })
}

/// Parses a trimmed `"<number><unit>"` literal. Non-string callers should
/// reject before calling this (spec: "non-string input ⇒ no-value").
pub fn parse_dimension(input: &str) -> Option<DimensionValue> {
    let trimmed = input.trim();
    let caps = dimension_re().captures(trimmed)?;
    let value: f64 = caps[1].parse().ok()?;
    let unit = DimensionUnit::parse(&caps[2])?;
    value.is_finite().then_some(DimensionValue { value, unit })
}

/// Parses a `borderRadius` `$value` with the permissive unit set
/// `{px, rem, em, %}` (spec's dimension parser stops at `{px,rem,em,pt}`;
/// see the border-radius unit decision in DESIGN.md).
pub fn parse_border_radius(input: &str) -> Option<BorderRadiusValue> {
    let trimmed = input.trim();
    let caps = border_radius_re().captures(trimmed)?;
    let value: f64 = caps[1].parse().ok()?;
    let unit = BorderRadiusUnit::parse(&caps[2])?;
    value.is_finite().then_some(BorderRadiusValue {
        value,
        unit,
        corners: None,
    })
}
