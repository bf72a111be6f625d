use std::borrow::Cow;

use eframe::egui::Color32;

/// Indigo used when a startup has no resolvable tag to color it by.
pub(super) const FALLBACK_BUBBLE_COLOR: Color32 = Color32::from_rgb(0x63, 0x66, 0xF1);

/// Parses a `#RRGGBB` tag color; anything else falls back to the default
/// bubble color so malformed data files still render.
pub(super) fn parse_tag_color(hex: &str) -> Color32 {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return FALLBACK_BUBBLE_COLOR;
    }

    let channel = |range| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color32::from_rgb(r, g, b),
        _ => FALLBACK_BUBBLE_COLOR,
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn fade(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Shortens a bubble label so it fits inside the circle.
pub(super) fn truncate_label(name: &str, max_chars: usize) -> Cow<'_, str> {
    if name.chars().count() <= max_chars {
        return Cow::Borrowed(name);
    }

    let prefix = name
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    Cow::Owned(format!("{}…", prefix.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_hex_colors() {
        assert_eq!(parse_tag_color("#3B82F6"), Color32::from_rgb(0x3B, 0x82, 0xF6));
        assert_eq!(parse_tag_color("10B981"), Color32::from_rgb(0x10, 0xB9, 0x81));
    }

    #[test]
    fn malformed_colors_fall_back() {
        assert_eq!(parse_tag_color(""), FALLBACK_BUBBLE_COLOR);
        assert_eq!(parse_tag_color("#fff"), FALLBACK_BUBBLE_COLOR);
        assert_eq!(parse_tag_color("#GGGGGG"), FALLBACK_BUBBLE_COLOR);
    }

    #[test]
    fn truncates_long_labels_with_an_ellipsis() {
        assert_eq!(truncate_label("Acme", 12), "Acme");
        assert_eq!(truncate_label("Quantum Hummingbird", 12), "Quantum Hum…");
    }
}
