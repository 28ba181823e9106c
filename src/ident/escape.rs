//! Identifier serialization.

use std::fmt::Write;

/// Characters that cannot appear in a generated class name. They are replaced
/// by `-` before escaping.
const RESERVED: &[char] = &['"', '*', '/', ':', '<', '>', '?', '\\', '|'];

/// Escapes `raw` so it can be used verbatim as a CSS identifier.
///
/// - Tab, newline, vertical tab, form feed, carriage return and the other
///   ASCII control characters become `\HEX ` escapes.
/// - Backslash and ASCII punctuation other than `-` and `_` get a single
///   backslash in front.
/// - A leading digit becomes `\3X `, a leading `-` followed by a digit or
///   another `-` becomes `\-`.
/// - The space after a hex escape is dropped whenever the next character
///   cannot be mistaken for part of the escape.
///
/// NUL has no escape form and is serialized as U+FFFD. Non-ASCII characters
/// are kept as they are.
///
/// # Example
///
/// ```rust
/// use stylename::escape_identifier;
///
/// assert_eq!(escape_identifier("a.b"), r"a\.b");
/// assert_eq!(escape_identifier("1st"), r"\31st");
/// assert_eq!(escape_identifier("1a"), r"\31 a");
/// assert_eq!(escape_identifier("-2"), r"\-2");
/// ```
pub fn escape_identifier(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '\0' => output.push('\u{FFFD}'),
            c if c.is_ascii_control() => {
                let _ = write!(output, "\\{:X} ", c as u32);
            }
            '\\' => output.push_str("\\\\"),
            c if needs_single_escape(c) => {
                output.push('\\');
                output.push(c);
            }
            c => output.push(c),
        }
    }

    let first = raw.chars().next();
    let second = output.chars().nth(1);

    if first == Some('-') && matches!(second, Some(c) if c == '-' || c.is_ascii_digit()) {
        output.insert(0, '\\');
    } else if let Some(digit) = first.filter(|c| c.is_ascii_digit()) {
        output = format!("\\3{} {}", digit, &output[1..]);
    } else if output == "-" {
        output.insert(0, '\\');
    }

    strip_redundant_spaces(&output)
}

/// Turns a generated scoped class name into a safe CSS identifier.
///
/// A leading digit, `-digit` or `--` is prefixed with `_`. Reserved file name
/// characters (`" * / : < > ? \ |`), control characters and `.` become `-`.
/// The result is then passed through [`escape_identifier`].
///
/// # Example
///
/// ```rust
/// use stylename::escape_local_ident;
///
/// assert_eq!(escape_local_ident("src/app.css__title"), "src-app-css__title");
/// assert_eq!(escape_local_ident("9lives"), "_9lives");
/// ```
pub fn escape_local_ident(raw: &str) -> String {
    let mut sanitized = String::with_capacity(raw.len() + 1);

    let mut chars = raw.chars();
    let needs_prefix = match (chars.next(), chars.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('-'), Some(c)) => c == '-' || c.is_ascii_digit(),
        _ => false,
    };
    if needs_prefix {
        sanitized.push('_');
    }

    sanitized.extend(raw.chars().map(|c| {
        if RESERVED.contains(&c) || is_control(c) || c == '.' {
            '-'
        } else {
            c
        }
    }));

    escape_identifier(&sanitized)
}

/// C0 controls, DEL and C1 controls.
fn is_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

/// ASCII characters that are escaped with a plain backslash prefix.
fn needs_single_escape(c: char) -> bool {
    matches!(
        c,
        ' '..=',' | '.' | '/' | ':'..='@' | '[' | ']' | '^' | '`' | '{'..='~'
    )
}

/// Removes the terminating space of `\HEX ` escapes when the following
/// character is neither a hex digit nor a space.
///
/// The space must stay when the backslash itself is escaped, i.e. when it is
/// the last of an even-length run of backslashes.
fn strip_redundant_spaces(escaped: &str) -> String {
    let chars: Vec<char> = escaped.chars().collect();
    let mut output = String::with_capacity(escaped.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            output.push(chars[i]);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|c| **c == '\\').count();
        let hex_start = i + run;
        let hex_len = chars[hex_start..]
            .iter()
            .take(6)
            .take_while(|c| c.is_ascii_digit() || ('A'..='F').contains(*c))
            .count();
        let space = hex_start + hex_len;

        let redundant = run % 2 == 1
            && hex_len > 0
            && chars.get(space) == Some(&' ')
            && !chars
                .get(space + 1)
                .is_some_and(|c| *c == ' ' || c.is_ascii_hexdigit());

        output.extend(&chars[i..space]);
        i = space;
        if redundant {
            i += 1;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_identifier_unchanged() {
        assert_eq!(escape_identifier("header"), "header");
        assert_eq!(escape_identifier("a-b_c"), "a-b_c");
        assert_eq!(escape_identifier("ünïcödé"), "ünïcödé");
    }

    #[test]
    fn test_escape_punctuation() {
        assert_eq!(escape_identifier("a.b"), r"a\.b");
        assert_eq!(escape_identifier("a b"), r"a\ b");
        assert_eq!(escape_identifier("w-1/2"), r"w-1\/2");
        assert_eq!(escape_identifier("hover:x"), r"hover\:x");
        assert_eq!(escape_identifier(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_escape_whitespace_uses_hex() {
        assert_eq!(escape_identifier("a\tb"), r"a\9 b");
        assert_eq!(escape_identifier("a\nz"), r"a\Az");
        assert_eq!(escape_identifier("a\n"), r"a\A");
    }

    #[test]
    fn test_escape_keeps_space_before_hex_digit() {
        assert_eq!(escape_identifier("\nb"), r"\A b");
        assert_eq!(escape_identifier("\n1"), r"\A 1");
    }

    #[test]
    fn test_escape_keeps_space_before_escaped_space() {
        assert_eq!(escape_identifier("\n "), r"\A\ ");
    }

    #[test]
    fn test_escape_leading_digit() {
        assert_eq!(escape_identifier("1st"), r"\31st");
        assert_eq!(escape_identifier("9"), r"\39");
        assert_eq!(escape_identifier("1a"), r"\31 a");
    }

    #[test]
    fn test_escape_leading_dashes() {
        assert_eq!(escape_identifier("--x"), r"\--x");
        assert_eq!(escape_identifier("-1"), r"\-1");
        assert_eq!(escape_identifier("-x"), "-x");
        assert_eq!(escape_identifier("-"), r"\-");
    }

    #[test]
    fn test_escape_nul() {
        assert_eq!(escape_identifier("a\0"), "a\u{FFFD}");
    }

    #[test]
    fn test_escaped_backslash_before_newline() {
        // literal backslash followed by a newline: `\\` then `\A `
        assert_eq!(escape_identifier("\\\nq"), r"\\\Aq");
    }

    #[test]
    fn test_local_ident_reserved_characters() {
        assert_eq!(escape_local_ident("a*b?c|d"), "a-b-c-d");
        assert_eq!(escape_local_ident("a<b>c\"d"), "a-b-c-d");
        assert_eq!(escape_local_ident(r"src\app.css"), "src-app-css");
    }

    #[test]
    fn test_local_ident_control_characters() {
        assert_eq!(escape_local_ident("a\u{1}b\u{85}c\u{7f}"), "a-b-c-");
    }

    #[test]
    fn test_local_ident_prefixes() {
        assert_eq!(escape_local_ident("1abc"), "_1abc");
        assert_eq!(escape_local_ident("-1abc"), "_-1abc");
        assert_eq!(escape_local_ident("--abc"), "_--abc");
        assert_eq!(escape_local_ident("-abc"), "-abc");
    }

    #[test]
    fn test_local_ident_hash_with_plus_and_space() {
        assert_eq!(escape_local_ident("a+b c"), r"a\+b\ c");
    }
}
