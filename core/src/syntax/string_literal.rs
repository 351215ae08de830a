/// String literal escaping and unescaping.
///
/// This module provides utilities for converting between:
/// - Runtime strings (e.g., "hello\n" with an actual newline character)
/// - Source code string literals (e.g., 'hello\n' with a backslash-n sequence)
use core::fmt;

/// Errors that can occur when unescaping string or bytes literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnescapeError {
    /// Escape needing a fixed number of hex digits got fewer (e.g., `\x4`)
    TruncatedEscape { pos: usize, seq: String },
    /// Invalid Unicode scalar value (surrogates, values above U+10FFFF)
    InvalidUnicodeScalar { pos: usize, value: u32 },
    /// `\N{...}` escapes are not supported
    NamedEscape { pos: usize },
    /// A bytes literal containing a character outside ASCII
    NonAsciiInBytes { pos: usize, ch: char },
    /// An octal escape in a bytes literal above `\377`
    OctalOutOfRange { pos: usize, value: u32 },
}

impl fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnescapeError::TruncatedEscape { pos, seq } => {
                write!(f, "truncated '{}' escape at position {}", seq, pos)
            }
            UnescapeError::InvalidUnicodeScalar { pos, value } => {
                write!(
                    f,
                    "invalid Unicode scalar value U+{:X} at position {}",
                    value, pos
                )
            }
            UnescapeError::NamedEscape { pos } => {
                write!(f, "named Unicode escapes are not supported (position {})", pos)
            }
            UnescapeError::NonAsciiInBytes { pos, ch } => {
                write!(
                    f,
                    "bytes can only contain ASCII literal characters, found {:?} at position {}",
                    ch, pos
                )
            }
            UnescapeError::OctalOutOfRange { pos, value } => {
                write!(
                    f,
                    "octal escape value \\{:o} out of range at position {}",
                    value, pos
                )
            }
        }
    }
}

/// Characters that are printed escaped even though they are not control
/// characters: separators and invisible formatting characters.
fn is_unprintable(ch: char) -> bool {
    ch.is_control()
        || matches!(
            ch,
            '\u{a0}'
                | '\u{ad}'
                | '\u{1680}'
                | '\u{2000}'..='\u{200f}'
                | '\u{2028}'..='\u{202f}'
                | '\u{205f}'..='\u{2064}'
                | '\u{3000}'
                | '\u{feff}'
                | '\u{e000}'..='\u{f8ff}'
        )
}

/// Picks the quote character a string repr uses: single quotes, unless the
/// text contains a single quote and no double quote.
pub fn preferred_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

/// Escape a runtime string as a quoted string literal.
///
/// The output matches the canonical repr of the string:
/// - Single quotes unless the text contains `'` but not `"`
/// - `\\`, the chosen quote, `\t`, `\n` and `\r` use backslash escapes
/// - Other unprintable characters use `\xhh`, `\uhhhh` or `\Uhhhhhhhh`
///
/// # Example
///
/// ```ignore
/// let mut output = String::new();
/// escape_string(&mut output, "it's\n").unwrap();
/// assert_eq!(output, r#""it's\n""#);
/// ```
pub fn escape_string(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    let quote = preferred_quote(s.contains('\''), s.contains('"'));

    f.write_char(quote)?;
    for ch in s.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c if is_unprintable(c) => {
                let code = c as u32;
                if code <= 0xff {
                    write!(f, "\\x{:02x}", code)?
                } else if code <= 0xffff {
                    write!(f, "\\u{:04x}", code)?
                } else {
                    write!(f, "\\U{:08x}", code)?
                }
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Iterator over the characters of a literal body with every line ending
/// (`\r\n` or a bare `\r`) reported as `\n`.
pub(crate) struct NormalizedChars<'s> {
    inner: core::iter::Peekable<core::str::CharIndices<'s>>,
}

impl<'s> NormalizedChars<'s> {
    pub(crate) fn new(input: &'s str) -> Self {
        Self {
            inner: input.char_indices().peekable(),
        }
    }

    pub(crate) fn peek(&mut self) -> Option<char> {
        self.inner
            .peek()
            .map(|&(_, c)| if c == '\r' { '\n' } else { c })
    }
}

impl Iterator for NormalizedChars<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<(usize, char)> {
        let (pos, ch) = self.inner.next()?;
        if ch == '\r' {
            self.inner.next_if(|&(_, c)| c == '\n');
            return Some((pos, '\n'));
        }
        Some((pos, ch))
    }
}

/// The result of reading one backslash escape that means the same thing in
/// string and bytes literals.
pub(crate) enum CommonEscape {
    /// Line continuation: produces nothing.
    Nothing,
    /// A single character (or byte) value.
    Value(u32),
    /// Not a shared escape; the caller decides.
    Other(char),
    /// A backslash at the very end of the input.
    Trailing,
}

/// Reads the escape following a backslash at `pos`: simple escapes, octal
/// escapes and `\xhh`.
pub(crate) fn read_common_escape(
    chars: &mut NormalizedChars<'_>,
    pos: usize,
) -> Result<CommonEscape, UnescapeError> {
    let Some((_, ch)) = chars.next() else {
        return Ok(CommonEscape::Trailing);
    };
    let value = match ch {
        '\n' => return Ok(CommonEscape::Nothing),
        '\\' | '\'' | '"' => ch as u32,
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => 0x0a,
        'r' => 0x0d,
        't' => 0x09,
        'v' => 0x0b,
        '0'..='7' => {
            let mut value = ch as u32 - '0' as u32;
            for _ in 0..2 {
                match chars.peek() {
                    Some(d @ '0'..='7') => {
                        chars.next();
                        value = value * 8 + (d as u32 - '0' as u32);
                    }
                    _ => break,
                }
            }
            value
        }
        'x' => read_hex_digits(chars, pos, 'x', 2)?,
        other => return Ok(CommonEscape::Other(other)),
    };
    Ok(CommonEscape::Value(value))
}

/// Reads exactly `count` hex digits for a `\x`, `\u` or `\U` escape.
pub(crate) fn read_hex_digits(
    chars: &mut NormalizedChars<'_>,
    pos: usize,
    letter: char,
    count: usize,
) -> Result<u32, UnescapeError> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars.peek().and_then(|c| c.to_digit(16)).ok_or_else(|| {
            UnescapeError::TruncatedEscape {
                pos,
                seq: format!("\\{}{}", letter, "X".repeat(count)),
            }
        })?;
        chars.next();
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Unescape the body of a string literal (without prefix or quotes),
/// appending the result to `out`.
///
/// Implicitly concatenated pieces are decoded one after the other into the
/// same buffer. Supported escapes:
/// - Simple escapes: `\\`, `\'`, `\"`, `\a`, `\b`, `\f`, `\n`, `\r`, `\t`, `\v`
/// - Octal escapes of up to three digits (`\0`, `\101`)
/// - Hex and Unicode escapes: `\xhh`, `\uhhhh`, `\Uhhhhhhhh`
/// - Line continuation: `\` followed by a line break (removes both)
///
/// Unknown escapes such as `\q` are kept as written. Line breaks in the body
/// are normalized to `\n`. With `raw` set only the line breaks are touched.
///
/// # Example
///
/// ```ignore
/// let mut out = String::new();
/// unescape_string_into(&mut out, r"caf\xe9\n", false).unwrap();
/// assert_eq!(out, "café\n");
/// ```
pub fn unescape_string_into(out: &mut String, input: &str, raw: bool) -> Result<(), UnescapeError> {
    let mut chars = NormalizedChars::new(input);

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' || raw {
            out.push(ch);
            continue;
        }

        let code = match read_common_escape(&mut chars, pos)? {
            CommonEscape::Nothing => continue,
            CommonEscape::Value(code) => code,
            CommonEscape::Trailing => {
                out.push('\\');
                continue;
            }
            CommonEscape::Other('u') => read_hex_digits(&mut chars, pos, 'u', 4)?,
            CommonEscape::Other('U') => read_hex_digits(&mut chars, pos, 'U', 8)?,
            CommonEscape::Other('N') => return Err(UnescapeError::NamedEscape { pos }),
            CommonEscape::Other(other) => {
                out.push('\\');
                out.push(other);
                continue;
            }
        };

        let unicode_char =
            char::from_u32(code).ok_or(UnescapeError::InvalidUnicodeScalar { pos, value: code })?;
        out.push(unicode_char);
    }

    Ok(())
}
