/// Bytes literal escaping and unescaping.
///
/// This module provides utilities for converting between:
/// - Runtime bytes (e.g., `[104, 105]` for "hi")
/// - Source code bytes literals (e.g., `b'hi'` or `b'\x68\x69'`)
use core::fmt;

use super::string_literal::{
    CommonEscape, NormalizedChars, UnescapeError, preferred_quote, read_common_escape,
};

/// Escape bytes as a `b'...'` literal.
///
/// - Printable ASCII characters (0x20-0x7E) are shown directly
/// - `\\`, the chosen quote, `\t`, `\n` and `\r` use backslash notation
/// - Everything else uses hex notation (`\xNN`)
///
/// # Example
///
/// ```ignore
/// let mut output = String::new();
/// escape_bytes(&mut output, b"hi\n\xff").unwrap();
/// assert_eq!(output, r"b'hi\n\xff'");
/// ```
pub fn escape_bytes(f: &mut impl fmt::Write, bytes: &[u8]) -> fmt::Result {
    let quote = preferred_quote(bytes.contains(&b'\''), bytes.contains(&b'"')) as u8;

    write!(f, "b{}", quote as char)?;
    for &byte in bytes {
        match byte {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if b == quote => write!(f, "\\{}", b as char)?,
            // Printable ASCII characters (excluding control characters)
            0x20..=0x7E => f.write_char(byte as char)?,
            // Non-printable bytes as hex
            _ => write!(f, "\\x{:02x}", byte)?,
        }
    }
    f.write_char(quote as char)
}

/// Unescape the body of a bytes literal (without prefix or quotes).
///
/// Accepts the escapes strings accept except the Unicode ones: `\u`, `\U` and
/// `\N` are ordinary unknown escapes in bytes and are kept as written. Only
/// ASCII may appear literally.
pub fn unescape_bytes(input: &str, raw: bool) -> Result<Vec<u8>, UnescapeError> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = NormalizedChars::new(input);

    while let Some((pos, ch)) = chars.next() {
        if !ch.is_ascii() {
            return Err(UnescapeError::NonAsciiInBytes { pos, ch });
        }
        if ch != '\\' || raw {
            out.push(ch as u8);
            continue;
        }

        match read_common_escape(&mut chars, pos)? {
            CommonEscape::Nothing => {}
            CommonEscape::Value(value) => {
                let byte = u8::try_from(value)
                    .map_err(|_| UnescapeError::OctalOutOfRange { pos, value })?;
                out.push(byte);
            }
            CommonEscape::Trailing => out.push(b'\\'),
            CommonEscape::Other(other) => {
                if !other.is_ascii() {
                    return Err(UnescapeError::NonAsciiInBytes {
                        pos: pos + 1,
                        ch: other,
                    });
                }
                out.push(b'\\');
                out.push(other as u8);
            }
        }
    }

    Ok(out)
}
