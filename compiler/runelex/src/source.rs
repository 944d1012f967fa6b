//! Immutable scan source with on-demand code point decoding.
//!
//! The source is stored as raw bytes and addressed by byte offset. Code points
//! are decoded lazily, one at a time, as the lexer advances. Only the true end
//! of the input decodes as EOF; malformed UTF-8 decodes to
//! [`char::REPLACEMENT_CHARACTER`] covering the maximal invalid subpart, so a
//! bad byte in the middle of the input never ends the scan early.
//!
//! # Encoding Detection
//!
//! During construction the source records encoding problems:
//! - UTF-8 BOM at the start (kept in the input, reported so callers can skip it)
//! - Malformed UTF-8 sequences (only possible via [`Source::from_bytes`])
//!
//! Issues are recorded as [`EncodingIssue`] values.

use std::sync::Arc;

/// Read-only source text shared between a lexer and its caller.
///
/// Cloning is cheap: the bytes live behind an [`Arc`].
#[derive(Clone, Debug)]
pub struct Source {
    bytes: Arc<[u8]>,
    encoding_issues: Arc<[EncodingIssue]>,
}

/// Encoding issue detected during source construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingIssue {
    /// What kind of encoding issue was detected.
    pub kind: EncodingIssueKind,
    /// Byte position in the source where the issue was found.
    pub pos: usize,
    /// Byte length of the problematic sequence.
    pub len: usize,
}

/// Kind of encoding issue detected in a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingIssueKind {
    /// UTF-8 BOM (`0xEF 0xBB 0xBF`) at start.
    Utf8Bom,
    /// Bytes that do not form valid UTF-8. Decoded as U+FFFD.
    InvalidUtf8,
}

impl Source {
    /// Create a source from text. The text is always valid UTF-8, so the only
    /// issue that can be recorded is a leading BOM.
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let mut issues = Vec::new();
        detect_bom(text.as_bytes(), &mut issues);
        Self {
            bytes: Arc::from(text.into_bytes()),
            encoding_issues: Arc::from(issues),
        }
    }

    /// Create a source from raw bytes that may not be valid UTF-8.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        let mut issues = Vec::new();
        detect_bom(&bytes, &mut issues);
        if std::str::from_utf8(&bytes).is_err() {
            detect_invalid_utf8(&bytes, &mut issues);
        }
        Self {
            bytes: Arc::from(bytes),
            encoding_issues: Arc::from(issues),
        }
    }

    /// Returns the source bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the source in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode one code point starting at byte offset `pos`.
    ///
    /// Returns `(None, 0)` exactly when `pos` is at or past the end of input.
    /// Otherwise returns the decoded character and its width in bytes, which
    /// is always at least 1. Malformed sequences yield U+FFFD with the width
    /// of the invalid subpart.
    #[inline]
    pub fn decode_at(&self, pos: usize) -> (Option<char>, usize) {
        let Some(rest) = self.bytes.get(pos..).filter(|rest| !rest.is_empty()) else {
            return (None, 0);
        };
        let (ch, width) = bstr::decode_utf8(rest);
        (Some(ch.unwrap_or(char::REPLACEMENT_CHARACTER)), width)
    }

    /// Encoding issues detected during construction.
    pub fn encoding_issues(&self) -> &[EncodingIssue] {
        &self.encoding_issues
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

/// Detect a UTF-8 byte order mark at the start of the source.
fn detect_bom(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    if source.starts_with(&[0xEF, 0xBB, 0xBF]) {
        issues.push(EncodingIssue {
            kind: EncodingIssueKind::Utf8Bom,
            pos: 0,
            len: 3,
        });
    }
}

/// Record every malformed sequence, using the same subpart widths the lexer
/// will see when it decodes them.
fn detect_invalid_utf8(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    let mut pos = 0;
    while pos < source.len() {
        let (ch, width) = bstr::decode_utf8(&source[pos..]);
        if ch.is_none() {
            issues.push(EncodingIssue {
                kind: EncodingIssueKind::InvalidUtf8,
                pos,
                len: width,
            });
        }
        pos += width.max(1);
    }
}
