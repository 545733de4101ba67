//! Color parser (C1): hex 3/6/8, `rgb(...)`, `rgba(...)` literals into
//! normalized RGBA floats in `[0,1]`.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::ColorValue;

fn rgb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^rgb\(\s*(-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*\)$")
            .expect("valid regex")
    })
}

fn rgba_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^rgba\(\s*(-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*(?:,\s*(-?[0-9]+(?:\.[0-9]+)?)\s*)?\)$",
        )
        .expect("valid regex")
    })
}

/// Parses a color literal. Returns `None` ("no-value") for empty input, an
/// unrecognized leading sequence, a malformed hex/rgb body, or any step that
/// would produce a non-finite channel.
pub fn parse_color(input: &str) -> Option<ColorValue> {
    if input.is_empty() {
        return None;
    }
    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex);
    }
    if input.starts_with("rgba(") {
        return parse_rgba(input);
    }
    if input.starts_with("rgb(") {
        return parse_rgb(input);
    }
    None
}

fn hex_digit(c: char) -> Option<u32> {
    c.to_digit(16)
}

fn parse_hex(hex: &str) -> Option<ColorValue> {
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(hex_digit);
            let r = digits.next()??;
            let g = digits.next()??;
            let b = digits.next()??;
            let color = ColorValue::new(
                (r * 17) as f64 / 255.0,
                (g * 17) as f64 / 255.0,
                (b * 17) as f64 / 255.0,
                Some(1.0),
            );
            color.is_finite().then_some(color)
        }
        6 => {
            let byte = |s: &str| u8::from_str_radix(s, 16).ok();
            let r = byte(&hex[0..2])?;
            let g = byte(&hex[2..4])?;
            let b = byte(&hex[4..6])?;
            let color = ColorValue::new(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
                Some(1.0),
            );
            color.is_finite().then_some(color)
        }
        8 => {
            let byte = |s: &str| u8::from_str_radix(s, 16).ok();
            let r = byte(&hex[0..2])?;
            let g = byte(&hex[2..4])?;
            let b = byte(&hex[4..6])?;
            let a = byte(&hex[6..8])?;
            let color = ColorValue::new(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
                Some(a as f64 / 255.0),
            );
            color.is_finite().then_some(color)
        }
        _ => None,
    }
}

/// `rgb()`/`rgba()` channels are only valid in `0..=255`; alpha in `0..=1`.
/// Unlike the hex paths (bytes are bounded by construction), the functional
/// notation accepts arbitrary numerals, so out-of-range values must be
/// rejected explicitly to keep the `[0,1]` round-trip bound.
fn channel_in_range(v: f64) -> bool {
    (0.0..=255.0).contains(&v)
}

fn alpha_in_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn parse_rgb(input: &str) -> Option<ColorValue> {
    let caps = rgb_re().captures(input)?;
    let r: f64 = caps[1].parse().ok()?;
    let g: f64 = caps[2].parse().ok()?;
    let b: f64 = caps[3].parse().ok()?;
    if ![r, g, b].into_iter().all(channel_in_range) {
        return None;
    }
    let color = ColorValue::new(r / 255.0, g / 255.0, b / 255.0, Some(1.0));
    color.is_finite().then_some(color)
}

fn parse_rgba(input: &str) -> Option<ColorValue> {
    let caps = rgba_re().captures(input)?;
    let r: f64 = caps[1].parse().ok()?;
    let g: f64 = caps[2].parse().ok()?;
    let b: f64 = caps[3].parse().ok()?;
    let a: f64 = match caps.get(4) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1.0,
    };
    if ![r, g, b].into_iter().all(channel_in_range) || !alpha_in_range(a) {
        return None;
    }
    let color = ColorValue::new(r / 255.0, g / 255.0, b / 255.0, Some(a));
    color.is_finite().then_some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn empty_input_is_no_value() {
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn unknown_leading_sequence_is_no_value() {
        assert_eq!(parse_color("hsl(0,0,0)"), None);
    }

    // spec scenario 1: "#F73" -> {r~1.0, g~0.4667, b~0.2, a=1}
    #[test]
    fn hex_shortcut() {
        let c = parse_color("#F73").expect("valid 3-digit hex");
        assert!(approx(c.r, 1.0));
        assert!(approx(c.g, 0.4667));
        assert!(approx(c.b, 0.2));
        assert_eq!(c.alpha(), 1.0);
    }

    // spec scenario 2: "#FF573380" -> {r~1.0, g~0.3412, b~0.2, a~0.5020}
    #[test]
    fn hex_eight_digit() {
        let c = parse_color("#FF573380").expect("valid 8-digit hex");
        assert!(approx(c.r, 1.0));
        assert!(approx(c.g, 0.3412));
        assert!(approx(c.b, 0.2));
        assert!(approx(c.alpha(), 0.5020));
    }

    #[test]
    fn hex_six_digit() {
        let c = parse_color("#FF5733").expect("valid 6-digit hex");
        assert!(approx(c.r, 1.0));
        assert!(approx(c.g, 0.3412));
        assert!(approx(c.b, 0.2));
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn hex_rejects_non_hex_characters() {
        assert_eq!(parse_color("#ZZZ"), None);
    }

    #[test]
    fn hex_rejects_wrong_length() {
        assert_eq!(parse_color("#FF57"), None);
    }

    #[test]
    fn legacy_rgb() {
        let c = parse_color("rgb(255, 87, 51)").expect("valid rgb()");
        assert!(approx(c.r, 1.0));
        assert!(approx(c.g, 0.3412));
        assert!(approx(c.b, 0.2));
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn legacy_rgba_missing_alpha_defaults_to_one() {
        let c = parse_color("rgba(255, 87, 51)").expect("valid rgba() without alpha");
        assert_eq!(c.alpha(), 1.0);
    }

    #[test]
    fn legacy_rgba_with_alpha() {
        let c = parse_color("rgba(255, 87, 51, 0.5)").expect("valid rgba() with alpha");
        assert!(approx(c.alpha(), 0.5));
    }

    #[test]
    fn rgb_rejects_out_of_range_channels() {
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color("rgb(-5, 0, 0)"), None);
    }

    #[test]
    fn rgba_rejects_out_of_range_alpha() {
        assert_eq!(parse_color("rgba(0, 0, 0, 1.5)"), None);
        assert_eq!(parse_color("rgba(0, 0, 0, -0.1)"), None);
    }

    #[test]
    fn color_round_trip_bounds() {
        for input in ["#000", "#fff", "#ff5733", "#ff57337f", "rgb(0,0,0)", "rgba(12,34,56,0.2)"] {
            let c = parse_color(input).unwrap_or_else(|| panic!("expected value for {input}"));
            for channel in [c.r, c.g, c.b, c.alpha()] {
                assert!(channel.is_finite());
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }
}
