//! # Piece Display Strings
//!
//! Tokens carry a human-readable rendering of their raw piece alongside the
//! bytes themselves. Display strings are always valid UTF-8:
//! * control characters (``< 0x20``) are rendered as ``\xNN``,
//! * spaces are rendered as [`SPACE_MARKER`] (``▁``),
//! * non UTF-8 pieces fall back to an ascii-escaped form of the bytes,
//!   see [`escape_bytes`].
//!
//! The exported display string is prefixed by a single length byte,
//! so [`truncate_display`] caps its encoded size at [`DISPLAY_LIMIT`].

use std::borrow::Cow;

/// The "lower one eighth block" character, standing in for a literal space.
pub const SPACE_MARKER: char = '\u{2581}';

/// The maximum encoded size of an exported display string.
pub const DISPLAY_LIMIT: usize = u8::MAX as usize;

/// Suffix appended to display strings which were cut short.
pub const TRUNCATED_SUFFIX: &str = "...(truncated)";

/// Render a raw piece as a display string.
///
/// ## Arguments
/// * `piece` - the raw token bytes.
///
/// ## Returns
/// The UTF-8 decoded piece, with control characters escaped and spaces
/// marked; or an ascii-escaped rendering when the piece is not UTF-8.
pub fn bytes_to_display(piece: &[u8]) -> String {
    let text: Cow<str> = match std::str::from_utf8(piece) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(escape_bytes(piece)),
    };
    escape_display(&text)
}

/// Render raw bytes as a byte-literal body.
///
/// Printable ascii is kept; ``\\``, ``\t``, ``\n`` and ``\r`` use their short
/// escapes, and every other byte becomes ``\xNN``. Quotes are left bare,
/// except a ``'`` in a piece holding both quote kinds, which is ``\'``.
pub fn escape_bytes(piece: &[u8]) -> String {
    let escape_quote = piece.contains(&b'\'') && piece.contains(&b'"');

    let mut text = String::with_capacity(piece.len());
    for &b in piece {
        match b {
            b'\'' if escape_quote => text.push_str("\\'"),
            b'\'' | b'"' => text.push(char::from(b)),
            _ => text.extend(b.escape_ascii().map(char::from)),
        }
    }
    text
}

/// Escape control characters and mark spaces in a display string.
pub fn escape_display(text: &str) -> String {
    let mut display = String::with_capacity(text.len());
    for ch in text.chars() {
        if (ch as u32) < 0x20 {
            display.push_str(&format!("\\x{:02x}", ch as u32));
        } else if ch == ' ' {
            display.push(SPACE_MARKER);
        } else {
            display.push(ch);
        }
    }
    display
}

/// Encode a display string, truncating it to fit a one-byte length prefix.
///
/// Strings of at most [`DISPLAY_LIMIT`] bytes are returned unchanged.
/// Longer strings lose trailing characters (whole characters, never
/// partial UTF-8 sequences) until they fit with [`TRUNCATED_SUFFIX`] appended.
pub fn truncate_display(display: &str) -> Vec<u8> {
    if display.len() <= DISPLAY_LIMIT {
        return display.as_bytes().to_vec();
    }

    let mut end = display.len();
    while end + TRUNCATED_SUFFIX.len() > DISPLAY_LIMIT {
        end = display[..end]
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx);
    }

    let mut buf = Vec::with_capacity(end + TRUNCATED_SUFFIX.len());
    buf.extend_from_slice(display[..end].as_bytes());
    buf.extend_from_slice(TRUNCATED_SUFFIX.as_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_display_utf8() {
        assert_eq!(bytes_to_display(b"hello"), "hello");
        assert_eq!(bytes_to_display(b" the"), "\u{2581}the");
        assert_eq!(bytes_to_display("東方".as_bytes()), "東方");
        assert_eq!(bytes_to_display(b"a\nb\t"), "a\\x0ab\\x09");
        assert_eq!(bytes_to_display(b"\x00"), "\\x00");
        assert_eq!(bytes_to_display(b""), "");
    }

    #[test]
    fn test_bytes_to_display_invalid_utf8() {
        assert_eq!(bytes_to_display(&[0xe6]), "\\xe6");
        assert_eq!(bytes_to_display(&[b'a', 0xff, b'b']), "a\\xffb");
        assert_eq!(bytes_to_display(&[b' ', 0x80]), "\u{2581}\\x80");
    }

    #[test]
    fn test_escape_bytes_quotes() {
        assert_eq!(escape_bytes(b"'\xff"), "'\\xff");
        assert_eq!(escape_bytes(b"\"\xff"), "\"\\xff");
        assert_eq!(escape_bytes(b"'\"\xff"), "\\'\"\\xff");
        assert_eq!(escape_bytes(b"a\\b\t\n\r\x7f"), "a\\\\b\\t\\n\\r\\x7f");

        assert_eq!(bytes_to_display(b"'\xff"), "'\\xff");
    }

    #[test]
    fn test_bytes_to_display_is_idempotent() {
        for piece in [
            "hello".as_bytes(),
            "\u{2581}the".as_bytes(),
            "a\\x0ab".as_bytes(),
            "東方Project".as_bytes(),
            &[0xe6u8, 0x9d][..],
        ] {
            let once = bytes_to_display(piece);
            let twice = bytes_to_display(once.as_bytes());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_truncate_short() {
        let display = "a".repeat(DISPLAY_LIMIT);
        assert_eq!(truncate_display(&display), display.as_bytes());
        assert_eq!(truncate_display(""), b"");
    }

    #[test]
    fn test_truncate_ascii() {
        let display = "a".repeat(300);
        let truncated = truncate_display(&display);

        assert_eq!(truncated.len(), DISPLAY_LIMIT);
        assert!(truncated.ends_with(TRUNCATED_SUFFIX.as_bytes()));
        assert!(truncated.starts_with(&[b'a'; 241]));
    }

    #[test]
    fn test_truncate_multibyte() {
        let display = "東".repeat(100);
        let truncated = truncate_display(&display);

        assert!(truncated.len() <= DISPLAY_LIMIT);
        let text = String::from_utf8(truncated).unwrap();
        assert_eq!(text, format!("{}{}", "東".repeat(80), TRUNCATED_SUFFIX));

        let display = format!("{}{}", "a".repeat(240), "🐱".repeat(10));
        let truncated = truncate_display(&display);
        assert!(truncated.len() <= DISPLAY_LIMIT);
        assert_eq!(
            String::from_utf8(truncated).unwrap(),
            format!("{}{}", "a".repeat(240), TRUNCATED_SUFFIX)
        );
    }

    proptest::proptest! {
        #[test]
        fn truncate_display_fits(display in "\\PC{0,300}") {
            let truncated = truncate_display(&display);

            proptest::prop_assert!(truncated.len() <= DISPLAY_LIMIT);
            let text = String::from_utf8(truncated);
            proptest::prop_assert!(text.is_ok());
            let text = text.unwrap();

            if display.len() <= DISPLAY_LIMIT {
                proptest::prop_assert_eq!(&text, &display);
            } else {
                let kept = text.strip_suffix(TRUNCATED_SUFFIX);
                proptest::prop_assert!(kept.is_some());
                proptest::prop_assert!(display.starts_with(kept.unwrap()));
            }
        }

        #[test]
        fn truncate_display_arbitrary(display in proptest::prelude::any::<String>()) {
            let truncated = truncate_display(&display);

            proptest::prop_assert!(truncated.len() <= DISPLAY_LIMIT);
            proptest::prop_assert!(core::str::from_utf8(&truncated).is_ok());
        }

        #[test]
        fn bytes_to_display_is_escaped(piece in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..64)) {
            let display = bytes_to_display(&piece);

            proptest::prop_assert!(!display.contains(' '));
            proptest::prop_assert!(display.chars().all(|ch| (ch as u32) >= 0x20));
            proptest::prop_assert_eq!(bytes_to_display(display.as_bytes()), display.clone());
        }
    }
}
