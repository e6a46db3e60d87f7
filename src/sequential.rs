//! Single-pass drivers used as the correctness oracle and timing baseline

use crate::cipher::LineTransform;

/// Apply `transform` to every line in order on the calling thread
pub fn sequential_transform<T>(lines: &[String], transform: &T) -> Vec<String>
where
    T: LineTransform + ?Sized,
{
    lines.iter().map(|line| transform.apply(line)).collect()
}

/// Longest line of a document, or `None` when it is empty.
///
/// Length is measured in characters. A later line must be strictly longer
/// to replace the current best, so the first of several equally long lines
/// wins.
pub fn longest_line(lines: &[String]) -> Option<&str> {
    longest_of(lines.iter().map(String::as_str))
}

/// Longest item of a sequence, first-seen wins ties
pub fn longest_of<I, S>(items: I) -> Option<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<(usize, S)> = None;

    for item in items {
        let len = item.as_ref().chars().count();
        match &best {
            Some((best_len, _)) if len <= *best_len => {}
            _ => best = Some((len, item)),
        }
    }

    best.map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::CaesarCipher;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sequential_transform() {
        let lines = doc(&["ABC", "xyz9", "Hello, World!"]);
        let out = sequential_transform(&lines, &CaesarCipher::new(3));
        assert_eq!(out, doc(&["DEF", "abc2", "Khoor, Zruog!"]));
    }

    #[test]
    fn test_longest_line() {
        assert_eq!(longest_line(&doc(&["a", "abc", "ab"])), Some("abc"));
        assert_eq!(longest_line(&[]), None);
    }

    #[test]
    fn test_tie_keeps_first() {
        assert_eq!(longest_line(&doc(&["one", "two", "six"])), Some("one"));
        assert_eq!(longest_of(vec!["xy", "abc", "def"]), Some("abc"));
    }

    #[test]
    fn test_length_counts_chars() {
        // "ééé" is 6 bytes but 3 chars
        assert_eq!(longest_line(&doc(&["ééé", "abcd"])), Some("abcd"));
    }

    #[test]
    fn test_empty_lines_still_selected() {
        assert_eq!(longest_line(&doc(&["", ""])), Some(""));
    }
}
