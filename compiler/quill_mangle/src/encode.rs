//! Token-level encoding: identifiers, indices and back-references.

use std::fmt::Write;

/// Number of back-references with a single-letter spelling.
const SHORT_BACK_REFERENCES: u32 = 26;

fn is_plain_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Append `text` as a length-prefixed identifier.
///
/// Identifiers that are empty, start with a digit or contain bytes
/// outside `[A-Za-z0-9_]` are escaped: `0`, then the escaped length, then
/// the text with each such byte written as `$` and two hex digits.
pub(crate) fn push_identifier(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let needs_escape = bytes.first().map_or(true, u8::is_ascii_digit)
        || !bytes.iter().copied().all(is_plain_byte);
    if !needs_escape {
        let _ = write!(out, "{}{text}", text.len());
        return;
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for (i, &byte) in bytes.iter().enumerate() {
        if is_plain_byte(byte) && !(i == 0 && byte.is_ascii_digit()) {
            escaped.push(char::from(byte));
        } else {
            let _ = write!(escaped, "${byte:02x}");
        }
    }
    let _ = write!(out, "0{}{escaped}", escaped.len());
}

/// Append an index: `_` for zero, `n-1` followed by `_` otherwise.
pub(crate) fn push_index(out: &mut String, index: u32) {
    if index > 0 {
        let _ = write!(out, "{}", index - 1);
    }
    out.push('_');
}

/// Append the back-reference token for substitution `index`.
///
/// The first 26 are `A` plus a lowercase letter; later ones are `A`, the
/// index counted from 26, and `_`.
pub(crate) fn push_back_reference(out: &mut String, index: u32) {
    out.push('A');
    if index < SHORT_BACK_REFERENCES {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "index is below 26 in this branch"
        )]
        let letter = b'a' + index as u8;
        out.push(char::from(letter));
    } else {
        let _ = write!(out, "{}_", index - SHORT_BACK_REFERENCES);
    }
}
