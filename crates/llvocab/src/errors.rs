//! # Error Types

/// Errors from llvocab operations.
#[derive(Debug, thiserror::Error)]
pub enum LLVocabError {
    /// Two non-placeholder tokens claim the same id.
    #[error("duplicated token id {id}")]
    DuplicateTokenId {
        /// The contested id.
        id: usize,
    },

    /// A token was appended out of position.
    #[error("token id ({id}) does not match table position ({expected})")]
    TokenIdMismatch {
        /// The id carried by the token.
        id: usize,

        /// The position it would have been appended at.
        expected: usize,
    },

    /// A base vocabulary token lies outside the declared vocab size.
    #[error("token id {id} is out of range for vocab size {vocab_size}")]
    TokenIdOutOfRange {
        /// The offending id.
        id: usize,

        /// The declared vocab size.
        vocab_size: usize,
    },

    /// A raw piece does not fit the single-byte length prefix.
    #[error("token {id} piece is {len} bytes; the limit is 255")]
    PieceTooLong {
        /// The token id.
        id: usize,

        /// The piece length in bytes.
        len: usize,
    },

    /// The token table does not fit the signed 32-bit token count.
    #[error("vocab size ({size}) exceeds the binary format capacity")]
    VocabTooLarge {
        /// The vocab size.
        size: usize,
    },

    /// A character of a byte-level piece has no byte mapping.
    #[error("invalid character {ch:?} in byte-level piece {piece:?}")]
    UnmappableChar {
        /// The unmapped character.
        ch: char,

        /// The piece it was found in.
        piece: String,
    },

    /// A byte-fallback piece is not of the form ``<0xNN>``.
    #[error("invalid byte piece: {0}")]
    InvalidBytePiece(String),

    /// The binary vocabulary does not start with the expected magic.
    #[error("bad magic: {found:?}")]
    BadMagic {
        /// The four bytes found.
        found: [u8; 4],
    },

    /// A format guard did not hold the expected value.
    #[error("bad format guard: {found:#06x}")]
    BadFormatGuard {
        /// The value found.
        found: u16,
    },

    /// The binary vocabulary ended early.
    #[error("truncated vocabulary stream")]
    Truncated,

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (base64, integer, json, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

impl LLVocabError {
    /// Is this a violation of the token table structure?
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTokenId { .. }
                | Self::TokenIdMismatch { .. }
                | Self::TokenIdOutOfRange { .. }
                | Self::PieceTooLong { .. }
                | Self::VocabTooLarge { .. }
        )
    }

    /// Does this error come from source data the adapters can't interpret?
    pub fn is_source_data(&self) -> bool {
        matches!(
            self,
            Self::UnmappableChar { .. } | Self::InvalidBytePiece(_)
        )
    }
}

impl From<serde_json::Error> for LLVocabError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for llvocab operations.
pub type LLResult<T> = core::result::Result<T, LLVocabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(LLVocabError::DuplicateTokenId { id: 3 }.is_structural());
        assert!(LLVocabError::TokenIdMismatch { id: 3, expected: 2 }.is_structural());
        assert!(!LLVocabError::Truncated.is_structural());

        let err = LLVocabError::UnmappableChar {
            ch: '\u{4e00}',
            piece: "a\u{4e00}".to_string(),
        };
        assert!(err.is_source_data());
        assert!(!err.is_structural());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LLVocabError::DuplicateTokenId { id: 7 }.to_string(),
            "duplicated token id 7"
        );
        assert_eq!(
            LLVocabError::BadFormatGuard { found: 0x1234 }.to_string(),
            "bad format guard: 0x1234"
        );
    }
}
