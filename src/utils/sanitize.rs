// Text normalization shared by every chunk parser

use unicode_general_category::{get_general_category, GeneralCategory};

/// Normalize a metadata string.
///
/// Tabs, newlines and carriage returns become spaces, non-printable
/// characters are dropped, whitespace runs collapse to one space and the
/// ends are trimmed. `sanitize(&sanitize(s)) == sanitize(s)` for every `s`.
pub fn sanitize(value: &str) -> String {
    let printable: String = value
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            other => other,
        })
        .filter(|&c| is_printable(c))
        .collect();

    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Every character in the Other (C*) and Separator (Z*) general categories is
// non-printable, except the plain space.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(sanitize("  Door \t slam\r\n  hard  "), "Door slam hard");
    }

    #[test]
    fn test_control_characters_dropped() {
        assert_eq!(sanitize("Gun\x07shot\x00"), "Gunshot");
        assert_eq!(sanitize("\u{FEFF}Title"), "Title");
    }

    #[test]
    fn test_format_characters_dropped() {
        // Bidi isolates and marks
        assert_eq!(sanitize("a\u{2066}b\u{2069}"), "ab");
        assert_eq!(sanitize("x\u{061C}y"), "xy");
        // Arabic number signs, Mongolian vowel separator
        assert_eq!(sanitize("\u{0600}x"), "x");
        assert_eq!(sanitize("\u{0605}x\u{180E}"), "x");
        // Tag characters
        assert_eq!(sanitize("t\u{E0041}g\u{E007F}"), "tg");
        assert_eq!(sanitize("soft\u{00AD}hyphen"), "softhyphen");
    }

    #[test]
    fn test_private_use_and_unassigned_dropped() {
        assert_eq!(sanitize("a\u{E000}b"), "ab");
        assert_eq!(sanitize("a\u{F8FF}b\u{F0000}"), "ab");
        assert_eq!(sanitize("u\u{0378}v"), "uv");
    }

    #[test]
    fn test_separators_other_than_space_dropped() {
        assert_eq!(sanitize("a\u{00A0}b"), "ab");
        assert_eq!(sanitize("line\u{2028}para\u{2029}"), "linepara");
        assert_eq!(sanitize("wide\u{3000}gap"), "widegap");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \t\n "), "");
    }

    #[test]
    fn test_non_ascii_kept() {
        assert_eq!(sanitize("Café  ambiance"), "Café ambiance");
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize(" a\u{00A0}b \u{2029} c\t");
        assert_eq!(sanitize(&once), once);
    }
}
