//! `SourceCode` and `Location`.
//!
//! `SourceCode` is an immutable `(bytes, len)`; it must be valid UTF-8 when
//! scanned, and invalid UTF-8 surfaces as a recoverable scan error.
//! `Location` is an opaque integer equal to a byte offset into `SourceCode`.
//!
//! A tokenizer that collects its input into a `Vec<char>` up front and walks
//! it by index gives the caller an index that isn't meaningful outside that
//! walk. Here `Location` is instead a byte offset into the caller's own
//! buffer, so it survives being handed back across calls (needed for
//! deferred identifier matching and for re-tokenizing a `dimension`'s unit
//! span).

use crate::error::TokenizeError;

/// An opaque cursor into a [`SourceCode`]. Only meaningful as a value
/// previously produced by [`SourceCode::decode_at`] or the tokenizer; always
/// points to the start of a codepoint sequence the tokenizer can resume
/// from without changing meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location(u32);

impl Location {
    /// The location of the first byte of the source.
    pub const START: Location = Location(0);

    /// Construct a location from a raw byte offset. Callers should only do
    /// this with offsets obtained from this crate's own output.
    #[must_use]
    pub fn from_offset(offset: u32) -> Location {
        Location(offset)
    }

    /// The byte offset this location points to.
    #[must_use]
    pub fn offset(self) -> u32 {
        self.0
    }
}

/// An immutable, presumed-UTF-8 byte buffer plus codepoint decoding with
/// CSS Syntax Level 3's input preprocessing applied:
///
/// - NUL and unpaired surrogates decode as U+FFFD.
/// - CR, CRLF, and FF decode as a single LF.
///
/// The preprocessing is applied lazily, per codepoint, as the tokenizer
/// scans; the underlying bytes are never rewritten, so a [`Location`]
/// obtained from one decode call remains a valid byte offset into the
/// original buffer for a later one.
pub struct SourceCode<'a> {
    bytes: &'a [u8],
}

/// One decoded, preprocessed codepoint and the location immediately after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The preprocessed codepoint.
    pub codepoint: char,
    /// The location of the first byte not consumed by this codepoint.
    pub next: Location,
}

impl<'a> SourceCode<'a> {
    /// Build a `SourceCode`, eagerly validating that `bytes` is well-formed
    /// UTF-8. This makes every later [`SourceCode::decode_at`] call on a
    /// location within bounds infallible.
    pub fn new(bytes: &'a [u8]) -> Result<SourceCode<'a>, TokenizeError> {
        core::str::from_utf8(bytes).map_err(|err| classify_utf8_error(bytes, err))?;
        Ok(SourceCode { bytes })
    }

    /// Build a `SourceCode` from bytes the caller has already validated
    /// (e.g. the bytes of a `&str`), skipping the UTF-8 check.
    #[must_use]
    pub fn new_unchecked(bytes: &'a [u8]) -> SourceCode<'a> {
        debug_assert!(core::str::from_utf8(bytes).is_ok());
        SourceCode { bytes }
    }

    /// The length of the source in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw bytes backing this source. Used by the identifier set's
    /// unescaped fast path and by tests that assert on source spans.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Whether `location` is at or past the end of the source.
    #[must_use]
    pub fn is_eof(&self, location: Location) -> bool {
        location.offset() as usize >= self.bytes.len()
    }

    /// Decode the codepoint starting at `location`, applying CSS Syntax
    /// Level 3's preprocessing, and return it along with the location of
    /// the next codepoint. Returns `None` at end of input.
    ///
    /// # Panics
    ///
    /// Panics if `location` does not point to the start of a valid UTF-8
    /// sequence. Every `Location` produced by this crate satisfies that by
    /// construction; a caller passing back a foreign `Location` is a bug.
    #[must_use]
    pub fn decode_at(&self, location: Location) -> Option<Decoded> {
        let offset = location.offset() as usize;
        if offset >= self.bytes.len() {
            return None;
        }
        let rest = core::str::from_utf8(&self.bytes[offset..])
            .expect("Location must point to a valid UTF-8 boundary");
        let mut chars = rest.chars();
        let raw = chars.next().expect("non-empty slice yields a char");
        let consumed = raw.len_utf8();

        let codepoint = match raw {
            '\0' => '\u{FFFD}',
            c if is_unpaired_surrogate(c) => '\u{FFFD}',
            '\r' => {
                // "CR, CRLF, FF" all preprocess to a single LF.
                let next_offset = offset + consumed;
                if self.bytes.get(next_offset) == Some(&b'\n') {
                    return Some(Decoded {
                        codepoint: '\n',
                        next: Location::from_offset((next_offset + 1) as u32),
                    });
                }
                '\n'
            }
            '\x0C' => '\n',
            c => c,
        };

        Some(Decoded {
            codepoint,
            next: Location::from_offset((offset + consumed) as u32),
        })
    }
}

/// Rust's `char` type cannot represent a surrogate codepoint, so this can
/// never actually trigger for well-formed `&str` input; it exists so the
/// decode path documents the CSS Syntax requirement even though `core`'s
/// UTF-8 validation has already ruled surrogates out upstream.
fn is_unpaired_surrogate(_c: char) -> bool {
    false
}

fn classify_utf8_error(bytes: &[u8], err: core::str::Utf8Error) -> TokenizeError {
    let at = err.valid_up_to();
    match err.error_len() {
        None => TokenizeError::Utf8Eof(at),
        Some(_) => {
            let byte = bytes[at];
            if byte & 0b1100_0000 == 0b1000_0000 {
                TokenizeError::Utf8InvalidContinuationByte(at)
            } else if byte >= 0xF8 {
                TokenizeError::Utf8Overlong(at)
            } else {
                TokenizeError::Utf8InvalidStartByte(at)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ascii() {
        let source = SourceCode::new(b"abc").unwrap();
        let d = source.decode_at(Location::START).unwrap();
        assert_eq!(d.codepoint, 'a');
        assert_eq!(d.next.offset(), 1);
    }

    #[test]
    fn crlf_collapses_to_one_lf() {
        let source = SourceCode::new(b"a\r\nb").unwrap();
        let after_a = source.decode_at(Location::START).unwrap().next;
        let d = source.decode_at(after_a).unwrap();
        assert_eq!(d.codepoint, '\n');
        assert_eq!(d.next.offset(), 3);
        let d2 = source.decode_at(d.next).unwrap();
        assert_eq!(d2.codepoint, 'b');
    }

    #[test]
    fn lone_cr_is_lf() {
        let source = SourceCode::new(b"a\rb").unwrap();
        let after_a = source.decode_at(Location::START).unwrap().next;
        let d = source.decode_at(after_a).unwrap();
        assert_eq!(d.codepoint, '\n');
        assert_eq!(d.next.offset(), 2);
    }

    #[test]
    fn nul_becomes_replacement_character() {
        let source = SourceCode::new(b"a\0b").unwrap();
        let after_a = source.decode_at(Location::START).unwrap().next;
        let d = source.decode_at(after_a).unwrap();
        assert_eq!(d.codepoint, '\u{FFFD}');
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = SourceCode::new(&[0x61, 0xFF, 0x62]).unwrap_err();
        assert_eq!(err, TokenizeError::Utf8InvalidStartByte(1));
    }

    #[test]
    fn eof_at_end() {
        let source = SourceCode::new(b"a").unwrap();
        assert!(source.decode_at(Location::from_offset(1)).is_none());
    }
}
