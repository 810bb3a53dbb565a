//! Word wrapping for help text
//!
//! Lines are broken to minimise raggedness rather than greedily: the cost of a
//! layout is the sum over lines of the squared shortfall from the limit, the
//! last line is free, and a line that overflows (one word longer than the
//! limit) pays a large fixed penalty.

/// Maximum width of any help line
pub const MAX_LINE_LENGTH: usize = 78;

const OVERFLOW_PENALTY: u64 = 100_000;

/// Wrap `text` to `limit` columns, joining lines with `\n`
pub fn wrap(text: &str, limit: usize) -> String {
    let trimmed = text.trim().replace('\n', " ");
    let words: Vec<&str> = trimmed.split(' ').collect();

    wrap_words(&words, 1, limit)
        .iter()
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split `words` into lines, counting `space` columns between adjacent words
pub fn wrap_words<'a>(words: &[&'a str], space: usize, limit: usize) -> Vec<Vec<&'a str>> {
    let n = words.len();
    if n == 0 {
        return Vec::new();
    }

    let widths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
    // line_len(i, j) = width of words[i..=j] laid out on one line
    let line_len = |i: usize, j: usize| -> usize {
        widths[i..=j].iter().sum::<usize>() + space * (j - i)
    };

    let mut cost = vec![u64::MAX; n];
    let mut next_break = vec![n; n];

    for i in (0..n).rev() {
        if line_len(i, n - 1) <= limit || i == n - 1 {
            cost[i] = 0;
            next_break[i] = n;
            continue;
        }
        for j in (i + 1)..n {
            let len = line_len(i, j - 1);
            let shortfall = limit as i64 - len as i64;
            let mut c = (shortfall * shortfall) as u64 + cost[j];
            if len > limit {
                c += OVERFLOW_PENALTY;
            }
            if c < cost[i] {
                cost[i] = c;
                next_break[i] = j;
            }
        }
    }

    let mut lines = Vec::new();
    let mut i = 0;
    while i < n {
        lines.push(words[i..next_break[i]].to_vec());
        i = next_break[i];
    }
    lines
}

/// Wrap `text` so that, after left-padding every line by `pad` spaces, no
/// line exceeds [`MAX_LINE_LENGTH`]
pub fn wrap_at_length(text: &str, pad: usize) -> String {
    let wrapped = wrap(text, MAX_LINE_LENGTH.saturating_sub(pad));
    let indent = " ".repeat(pad);
    wrapped
        .split('\n')
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap("hello world", 20), "hello world");
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let out = wrap("aaa bbb ccc ddd", 7);
        assert_eq!(out, "aaa bbb\nccc ddd");
    }

    #[test]
    fn test_wrap_balances_lines() {
        // Greedy would give "aaaa bb" / "cc" / "dddddd"; balanced layout
        // avoids the very short middle line.
        let out = wrap("aaaa bb cc dddddd", 9);
        for line in out.lines() {
            assert!(line.len() <= 9, "line too long: {:?}", line);
        }
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_long_word_overflows() {
        let out = wrap("a verylongwordthatdoesnotfit b", 10);
        assert_eq!(out, "a verylongwordthatdoesnotfit\nb");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(wrap("", 10), "");
        assert_eq!(wrap_at_length("", 6), "      ");
    }

    #[test]
    fn test_wrap_at_length_pads_every_line() {
        let text = "word ".repeat(40);
        let out = wrap_at_length(text.trim(), 6);
        for line in out.lines() {
            assert!(line.starts_with("      "));
            assert!(!line.starts_with("       "));
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
        assert!(out.lines().count() > 1);
    }
}
