//! Makes a character class match both cases of the letters it contains, without relying on the
//! regex engine case-insensitive flag.
//!
//! This is needed when a case-insensitive rule is merged with case-sensitive ones in a single
//! combined pattern: the flag would apply to everything.

/// Escapes that are sets by themselves and are kept as-is
const SET_ESCAPES: [&str; 8] = [r"\B", r"\b", r"\D", r"\d", r"\S", r"\s", r"\W", r"\w"];

/// Splits the body of a class (brackets excluded) into single chars, escapes and `-`.
fn split_class_body(body: &[char]) -> Vec<&[char]> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < body.len() {
        if body[i] != '\\' || i + 1 >= body.len() {
            out.push(&body[i..i + 1]);
            i += 1;
            continue;
        }

        let rest = &body[i + 1..];
        let is_hex =
            |n: usize| rest.len() > n && rest[1..=n].iter().all(char::is_ascii_hexdigit);
        let len = match rest[0] {
            'u' if is_hex(4) => 6,
            'x' if is_hex(2) => 4,
            '0'..='3' => octal_len(&rest[1..], 2),
            '4'..='7' => octal_len(&rest[1..], 1),
            _ => 2,
        };
        out.push(&body[i..i + len]);
        i += len;
    }

    out
}

/// Length of an octal escape: backslash, first digit and up to `max_extra` more digits
fn octal_len(rest: &[char], max_extra: usize) -> usize {
    2 + rest
        .iter()
        .take(max_extra)
        .take_while(|c| c.is_digit(8))
        .count()
}

/// Returns the code point a class member stands for.
fn decode_escape(token: &[char]) -> u32 {
    if token[0] != '\\' {
        return token[0] as u32;
    }
    let digits: String = token[2..].iter().collect();
    match token[1] {
        'b' => 8,
        't' => 9,
        'n' => 10,
        'v' => 11,
        'f' => 12,
        'r' => 13,
        'u' | 'x' => u32::from_str_radix(&digits, 16)
            .ok()
            .filter(|&v| v != 0)
            .unwrap_or(token[1] as u32),
        '0'..='7' => {
            let octal: String = token[1..].iter().collect();
            u32::from_str_radix(&octal, 8).unwrap_or(0)
        }
        c => c as u32,
    }
}

fn encode_escape(out: &mut String, code: u32) {
    if code < 0x20 {
        out.push_str(&format!("\\x{code:02x}"));
        return;
    }
    match char::from_u32(code) {
        Some(c @ ('\\' | '-' | '[' | ']' | '^' | '&')) => {
            out.push('\\');
            out.push(c);
        }
        Some(c) => out.push(c),
        None => out.push_str(&format!("\\x{{{code:x}}}")),
    }
}

/// Rewrites `class` (brackets included) so that it matches upper and lower case versions
/// of every ASCII letter it matches.
/// Ranges are merged when they touch or overlap and emitted in ascending order.
pub(crate) fn case_fold_charset(class: &str) -> String {
    let chars: Vec<char> = class.chars().collect();
    let body = &chars[1..chars.len() - 1];
    let tokens = split_class_body(body);

    let inverse = tokens.first().is_some_and(|t| *t == ['^']);
    let mut groups: Vec<String> = Vec::new();
    let mut ranges: Vec<(u32, u32)> = Vec::new();

    let mut i = usize::from(inverse);
    while i < tokens.len() {
        let token = tokens[i];
        let text: String = token.iter().collect();
        if SET_ESCAPES.contains(&text.as_str()) {
            groups.push(text);
            i += 1;
            continue;
        }

        let start = decode_escape(token);
        let end = if i + 2 < tokens.len() && tokens[i + 1] == ['-'] {
            i += 2;
            decode_escape(tokens[i])
        } else {
            start
        };
        ranges.push((start, end));

        // Only ranges overlapping [A-Za-z] get a folded counterpart
        if !(end < 65 || start > 122) {
            if !(end < 65 || start > 90) {
                ranges.push((start.max(65) | 32, end.min(90) | 32));
            }
            if !(end < 97 || start > 122) {
                ranges.push((start.max(97) & !32, end.min(122) & !32));
            }
        }
        i += 1;
    }

    ranges.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        if let Some(last) = merged.last_mut()
            && start <= last.1 + 1
        {
            last.1 = last.1.max(end);
        } else {
            merged.push((start, end));
        }
    }

    let mut out = String::from("[");
    if inverse {
        out.push('^');
    }
    for group in groups {
        out.push_str(&group);
    }
    for (start, end) in merged {
        encode_escape(&mut out, start);
        if end > start {
            out.push('-');
            encode_escape(&mut out, end);
        }
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_letter_ranges() {
        assert_eq!(case_fold_charset("[a-z]"), "[A-Za-z]");
        assert_eq!(case_fold_charset("[A-Fa-f0-9]"), "[0-9A-Fa-f]");
        assert_eq!(case_fold_charset("[^x]"), "[^Xx]");
        assert_eq!(case_fold_charset("[P-d]"), "[A-DP-dp-z]");
    }

    #[test]
    fn keeps_set_escapes_first() {
        assert_eq!(case_fold_charset(r"[\d_a]"), r"[\dA_a]");
        assert_eq!(case_fold_charset(r"[^\s\w]"), r"[^\s\w]");
    }

    #[test]
    fn merges_touching_ranges() {
        assert_eq!(case_fold_charset("[a-cd-f]"), "[A-Fa-f]");
        assert_eq!(case_fold_charset("[0-45-9]"), "[0-9]");
    }

    #[test]
    fn decodes_and_reencodes_escapes() {
        assert_eq!(case_fold_charset(r"[\x41]"), "[Aa]");
        assert_eq!(case_fold_charset(r"[\t\n -]"), r"[\x09-\x0a \-]");
        assert_eq!(case_fold_charset(r"[a-c]"), "[A-Ca-c]");
        assert_eq!(case_fold_charset(r"[\[\]\\]"), r"[\[-\]]");
    }
}
