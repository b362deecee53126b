//! Color normalization for the color picker and selection mirroring.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>, doubled: bool| {
        let digits = hex.get(range)?;
        let digits = if doubled { digits.repeat(2) } else { digits.to_owned() };
        u8::from_str_radix(&digits, 16).ok()
    };
    match hex.len() {
        3 => Some((channel(0..1, true)?, channel(1..2, true)?, channel(2..3, true)?)),
        6 => Some((channel(0..2, false)?, channel(2..4, false)?, channel(4..6, false)?)),
        _ => None,
    }
}

/// Normalize a color to canonical lowercase `#rrggbb`. `None` for anything
/// that is not a hex color.
pub fn normalize_hex_color(value: &str) -> Option<String> {
    let (r, g, b) = parse_hex_rgb(value)?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Value for an `<input type="color">`, which only accepts `#rrggbb`.
/// Non-hex colors (e.g. a loaded `rgb(...)` fill) fall back to `fallback`.
pub fn color_input_value(value: &str, fallback: &str) -> String {
    normalize_hex_color(value)
        .or_else(|| normalize_hex_color(fallback))
        .unwrap_or_else(|| "#000000".to_owned())
}
