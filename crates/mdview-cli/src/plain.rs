//! Word wrapping for documents shown as plain text.

use textwrap::{Options, WordSplitter, WrapAlgorithm};

/// Wraps each line of `text` to at most `width` terminal columns.
///
/// Lines break at whitespace; a word wider than the line is split. Wide
/// characters count double. Whitespace at line ends is dropped. Empty
/// input lines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let options = Options::new(width.max(1))
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .word_splitter(WordSplitter::NoHyphenation)
        .break_words(true);

    text.lines()
        .flat_map(|line| textwrap::wrap(line, &options))
        .map(|line| line.trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn short_lines_are_untouched() {
        assert_eq!(wrap_text("one\n\ntwo  ", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn wraps_at_whitespace() {
        assert_eq!(
            wrap_text("a longer sentence here", 10),
            vec!["a longer", "sentence", "here"]
        );
    }

    #[rstest]
    #[case("abcde fgh", 5, &["abcde", "fgh"])]
    #[case("abcdefghij", 4, &["abcd", "efgh", "ij"])]
    #[case("well-known", 5, &["well-", "known"])]
    fn long_words_are_split(#[case] input: &str, #[case] width: usize, #[case] expected: &[&str]) {
        assert_eq!(wrap_text(input, width), expected);
    }

    #[test]
    fn crlf_and_accents() {
        assert_eq!(wrap_text("héllo wörld\r\nx", 6), vec!["héllo", "wörld", "x"]);
    }

    #[test]
    fn wide_characters_take_two_columns() {
        assert_eq!(wrap_text("你好世界", 4), vec!["你好", "世界"]);
        assert_eq!(wrap_text("日本 語", 5), vec!["日本", "語"]);
    }
}
