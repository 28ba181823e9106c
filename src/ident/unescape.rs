//! Reading CSS escapes back into characters.

/// Resolves CSS escapes in `escaped`.
///
/// `\XXXXXX` hex escapes (1 to 6 hex digits, optionally followed by one space
/// that belongs to the escape) become the code point they name. Zero,
/// surrogates and values above U+10FFFF become U+FFFD. Any other escaped
/// character stands for itself. A doubled backslash and a trailing lone
/// backslash are kept as a literal `\`.
///
/// # Example
///
/// ```rust
/// use stylename::unescape;
///
/// assert_eq!(unescape(r"\31 st"), "1st");
/// assert_eq!(unescape(r"a\.b"), "a.b");
/// assert_eq!(unescape(r"\0 "), "\u{FFFD}");
/// ```
pub fn unescape(escaped: &str) -> String {
    if !escaped.contains('\\') {
        return escaped.to_string();
    }

    let chars: Vec<char> = escaped.chars().collect();
    let mut output = String::with_capacity(escaped.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            output.push(chars[i]);
            i += 1;
            continue;
        }

        let window = &chars[i + 1..chars.len().min(i + 7)];
        if let Some((decoded, consumed)) = gobble_hex(window) {
            output.push(decoded);
            i += 1 + consumed;
        } else if chars.get(i + 1) == Some(&'\\') {
            output.push('\\');
            i += 2;
        } else if i + 1 == chars.len() {
            output.push('\\');
            i += 1;
        } else {
            // The escaped character is pushed verbatim on the next iteration.
            i += 1;
        }
    }

    output
}

/// Consumes up to six hex digits and an optional terminating space.
///
/// Returns the decoded character and the number of characters consumed, or
/// `None` when `window` does not start with a hex digit.
fn gobble_hex(window: &[char]) -> Option<(char, usize)> {
    let mut hex = String::new();
    let mut space_terminated = false;

    for &c in window {
        space_terminated = c == ' ';
        if !c.is_ascii_hexdigit() {
            break;
        }
        hex.push(c);
    }

    if hex.is_empty() {
        return None;
    }

    let code_point = u32::from_str_radix(&hex, 16).ok()?;
    let decoded = char::from_u32(code_point)
        .filter(|_| code_point != 0)
        .unwrap_or('\u{FFFD}');

    Some((decoded, hex.len() + usize::from(space_terminated)))
}
