use palaver_core::Profile;
use ratatui::style::Color;

/// Parses a `#rrggbb` hex string. Anything malformed falls back to gray
/// rather than failing the draw.
pub fn hex_color(hex: &str) -> Color {
    fn channel(hex: &str, at: usize) -> Option<u8> {
        u8::from_str_radix(hex.get(at..at + 2)?, 16).ok()
    }
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    match (channel(hex, 0), channel(hex, 2), channel(hex, 4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

/// Terminal cells can't blend two colors, so avatars use the first stop of
/// the profile gradient as a solid accent.
pub fn gradient_start(profile: &Profile) -> Color {
    hex_color(&profile.gradient.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(hex_color("#ff6b6b"), Color::Rgb(0xff, 0x6b, 0x6b));
        assert_eq!(hex_color("4facfe"), Color::Rgb(0x4f, 0xac, 0xfe));
    }

    #[test]
    fn malformed_hex_falls_back() {
        assert_eq!(hex_color("#zzz"), Color::Gray);
        assert_eq!(hex_color(""), Color::Gray);
    }
}
