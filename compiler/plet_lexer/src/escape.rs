//! Escape sequences in quoted strings.

use crate::cursor::Cursor;
use crate::lex_error::LexErrorKind;

const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// Decode one escape sequence; the backslash has already been consumed.
///
/// `interpolated` enables `\{` and `\}`, which only make sense inside a
/// `"..."` string where a bare brace would open a code block.
pub(crate) fn read_escape(
    cursor: &mut Cursor<'_>,
    buf: &mut Vec<u8>,
    interpolated: bool,
) -> Result<(), LexErrorKind> {
    let Some(c) = cursor.bump() else {
        return Err(LexErrorKind::EofInEscape);
    };
    match c {
        b'{' | b'}' if interpolated => buf.push(c),
        b'"' | b'\'' | b'\\' | b'/' => buf.push(c),
        b'b' => buf.push(0x08),
        b'f' => buf.push(0x0c),
        b'n' => buf.push(b'\n'),
        b'r' => buf.push(b'\r'),
        b't' => buf.push(b'\t'),
        b'x' => {
            let byte = read_hex(cursor, 2)?;
            buf.push(u8::try_from(byte).map_err(|_| LexErrorKind::InvalidHexEscape)?);
        }
        b'u' => encode_utf8(read_hex(cursor, 4)?, buf)?,
        b'U' => encode_utf8(read_hex(cursor, 8)?, buf)?,
        other => return Err(LexErrorKind::UnknownEscape(other)),
    }
    Ok(())
}

/// Read exactly `len` hex digits. An invalid digit is left unconsumed.
fn read_hex(cursor: &mut Cursor<'_>, len: usize) -> Result<u32, LexErrorKind> {
    let mut value: u32 = 0;
    for _ in 0..len {
        let digit = match cursor.peek() {
            None => return Err(LexErrorKind::EofInEscape),
            Some(byte) => char::from(byte)
                .to_digit(16)
                .ok_or(LexErrorKind::InvalidHexEscape)?,
        };
        cursor.bump();
        value = (value << 4) | digit;
    }
    Ok(value)
}

/// Pack a code point as UTF-8.
///
/// Surrogate code points are encoded like any other value: the output is
/// raw bytes, not validated text.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn encode_utf8(cp: u32, buf: &mut Vec<u8>) -> Result<(), LexErrorKind> {
    match cp {
        0..=0x7F => buf.push(cp as u8),
        0x80..=0x7FF => {
            buf.push(0xC0 | (cp >> 6) as u8);
            buf.push(0x80 | (cp & 0x3F) as u8);
        }
        0x800..=0xFFFF => {
            buf.push(0xE0 | (cp >> 12) as u8);
            buf.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            buf.push(0x80 | (cp & 0x3F) as u8);
        }
        0x1_0000..=MAX_CODE_POINT => {
            buf.push(0xF0 | (cp >> 18) as u8);
            buf.push(0x80 | ((cp >> 12) & 0x3F) as u8);
            buf.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            buf.push(0x80 | (cp & 0x3F) as u8);
        }
        _ => return Err(LexErrorKind::CodePointOutOfRange(cp)),
    }
    Ok(())
}
