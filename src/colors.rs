//! Terminal colors for request ids and notification tags.

use owo_colors::{AnsiColors, DynColors, OwoColorize, Style};

use crate::notify::Severity;

/// Palette for request ids. Red is left out so ids never look like errors.
const ID_COLORS: [AnsiColors; 10] = [
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Magenta,
    AnsiColors::Cyan,
    AnsiColors::BrightGreen,
    AnsiColors::BrightYellow,
    AnsiColors::BrightBlue,
    AnsiColors::BrightMagenta,
    AnsiColors::BrightCyan,
];

/// Stable color for `id` (FNV-1a over the bytes).
pub fn color_for_id(id: &str) -> AnsiColors {
    let hash = id
        .bytes()
        .fold(0x811c_9dc5u32, |acc, b| (acc ^ b as u32).wrapping_mul(0x0100_0193));
    ID_COLORS[(hash as usize) % ID_COLORS.len()]
}

/// `[id]` in the id's color.
pub fn colored_id(id: &str) -> String {
    let style = Style::new().color(DynColors::Ansi(color_for_id(id)));
    format!("[{}]", id).style(style).to_string()
}

pub fn severity_tag(severity: Severity) -> String {
    match severity {
        Severity::Error => "ERROR".red().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_same_color() {
        assert_eq!(
            std::mem::discriminant(&color_for_id("k3x9q")),
            std::mem::discriminant(&color_for_id("k3x9q"))
        );
    }

    #[test]
    fn test_tags_contain_text() {
        assert!(colored_id("abc").contains("abc"));
        assert!(severity_tag(Severity::Error).contains("ERROR"));
    }
}
