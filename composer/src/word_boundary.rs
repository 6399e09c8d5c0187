//! Word-boundary helpers used by the live-message flow.

/// Longest prefix of `s` that ends exactly at a non-alphanumeric boundary.
///
/// The trailing partial word is dropped so a progressively-revised message
/// never shows a half-typed word: `"hello wor"` becomes `"hello "`.
pub fn truncate_to_words(s: &str) -> String {
    let mut acc = String::new();
    let mut word = String::new();
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
        } else {
            acc.push_str(&word);
            acc.push(ch);
            word.clear();
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_partial_word_is_dropped() {
        assert_eq!(truncate_to_words("hello wor"), "hello ");
        assert_eq!(truncate_to_words("hello"), "");
    }

    #[test]
    fn text_ending_on_a_boundary_is_kept_whole() {
        assert_eq!(truncate_to_words("hello world!"), "hello world!");
        assert_eq!(truncate_to_words("hello "), "hello ");
    }

    #[test]
    fn punctuation_counts_as_a_boundary_mid_word() {
        assert_eq!(truncate_to_words("see example.com now"), "see example.com ");
        assert_eq!(truncate_to_words("a,b,c"), "a,b,");
    }

    #[test]
    fn non_ascii_letters_are_word_characters() {
        assert_eq!(truncate_to_words("héllo wörl"), "héllo ");
        assert_eq!(truncate_to_words(""), "");
    }
}
