//! Byte classes used by the block and inline classifiers.

/// Horizontal whitespace.
pub fn is_white_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

pub fn is_eol(c: u8) -> bool {
    c == b'\r' || c == b'\n'
}

/// ASCII punctuation, as used by the flanking rules.
pub fn is_punctuation(c: u8) -> bool {
    matches!(c, 0x21..=0x2f | 0x3a..=0x40 | 0x5b..=0x60 | 0x7b..=0x7e)
}

/// Whitespace for flanking purposes: a line ending or the end of the input
/// (`None`) separates words just like a space does.
pub fn is_flanking_space(c: Option<u8>) -> bool {
    c.is_none_or(|c| is_white_space(c) || is_eol(c))
}

/// Whether `b` begins a UTF-8 encoded character (is not a continuation byte).
pub fn is_char_start(b: u8) -> bool {
    b & 0xc0 != 0x80
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'!', true)]
    #[case(b'/', true)]
    #[case(b':', true)]
    #[case(b'@', true)]
    #[case(b'[', true)]
    #[case(b'`', true)]
    #[case(b'{', true)]
    #[case(b'~', true)]
    #[case(b'*', true)]
    #[case(b'a', false)]
    #[case(b'Z', false)]
    #[case(b'0', false)]
    #[case(b' ', false)]
    fn punctuation_classes(#[case] c: u8, #[case] expected: bool) {
        assert_eq!(is_punctuation(c), expected);
    }

    #[test]
    fn line_endings_and_eof_separate_words() {
        assert!(is_flanking_space(None));
        assert!(is_flanking_space(Some(b'\n')));
        assert!(is_flanking_space(Some(b'\t')));
        assert!(!is_flanking_space(Some(b'x')));
        assert!(!is_flanking_space(Some(b'*')));
    }

    #[test]
    fn continuation_bytes_do_not_start_chars() {
        let bytes = "aé€".as_bytes();
        let starts: Vec<bool> = bytes.iter().map(|&b| is_char_start(b)).collect();
        assert_eq!(starts, vec![true, true, false, true, false, false]);
    }

    #[test]
    fn tab_is_white_space_but_newline_is_not() {
        assert!(is_white_space(b'\t'));
        assert!(!is_white_space(b'\n'));
        assert!(is_eol(b'\r'));
    }
}
