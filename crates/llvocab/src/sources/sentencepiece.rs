//! # `SentencePiece` Vocabulary Source

use crate::{
    display::SPACE_MARKER,
    errors::{LLResult, LLVocabError},
    model::{TokenFlags, TokenizerConfig},
    sources::{DraftToken, DraftVocab, VocabSource},
};

/// Read access to a `SentencePiece` model's vocabulary.
///
/// Ids are dense, ``0..vocab_size()``.
pub trait SentencePieceReader {
    /// The number of pieces.
    fn vocab_size(&self) -> usize;

    /// The native piece text for `id`.
    fn id_to_piece(
        &self,
        id: usize,
    ) -> &str;

    /// The score for `id`.
    fn score(
        &self,
        id: usize,
    ) -> f32;

    /// Is `id` the unknown piece?
    fn is_unknown(
        &self,
        id: usize,
    ) -> bool;

    /// Is `id` a control piece?
    fn is_control(
        &self,
        id: usize,
    ) -> bool;

    /// Is `id` an unused piece?
    fn is_unused(
        &self,
        id: usize,
    ) -> bool;

    /// Is `id` a byte-fallback piece?
    fn is_byte(
        &self,
        id: usize,
    ) -> bool;
}

/// Parse a byte-fallback piece, ``<0xNN>``, into its byte.
pub fn parse_byte_piece(piece: &str) -> LLResult<u8> {
    piece
        .strip_prefix("<0x")
        .or_else(|| piece.strip_prefix("<0X"))
        .and_then(|rest| rest.strip_suffix('>'))
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        .ok_or_else(|| LLVocabError::InvalidBytePiece(piece.to_string()))
}

/// [`VocabSource`] adapter over a [`SentencePieceReader`].
///
/// * unknown, control and unused pieces have an empty raw piece;
/// * byte-fallback pieces decode to their single byte;
/// * ordinary pieces have ``▁`` replaced by a space;
/// * every token's display is the native piece text, and its weight the score.
pub struct SentencePieceSource<'a, R: SentencePieceReader + ?Sized> {
    reader: &'a R,
}

impl<'a, R: SentencePieceReader + ?Sized> SentencePieceSource<'a, R> {
    /// Wrap a reader.
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    fn draft_token(
        &self,
        id: usize,
    ) -> LLResult<DraftToken> {
        let reader = self.reader;
        let native = reader.id_to_piece(id);

        let mut flags = TokenFlags::NONE;
        let mut piece = Vec::new();
        if reader.is_unknown(id) {
            flags |= TokenFlags::UNKNOWN;
            log::info!("unk token: {id}: {native}");
        }
        if reader.is_control(id) {
            flags |= TokenFlags::CONTROL;
        }
        if reader.is_unused(id) {
            flags |= TokenFlags::UNUSED;
        }
        if reader.is_byte(id) {
            flags |= TokenFlags::BYTE;
            piece = vec![parse_byte_piece(native)?];
        }
        if flags.is_empty() {
            piece = native.replace(SPACE_MARKER, " ").into_bytes();
        }

        Ok(DraftToken::new(
            id,
            flags,
            piece,
            native,
            Some(reader.score(id)),
        ))
    }
}

impl<R: SentencePieceReader + ?Sized> VocabSource for SentencePieceSource<'_, R> {
    fn draft_vocab(&self) -> LLResult<DraftVocab> {
        let vocab_size = self.reader.vocab_size();
        let tokens = (0..vocab_size)
            .map(|id| self.draft_token(id))
            .collect::<LLResult<Vec<_>>>()?;

        Ok(DraftVocab {
            vocab_size,
            tokens,
            specials: Vec::new(),
            unk_id: None,
            config: TokenizerConfig::default(),
        })
    }
}

/// The type of a `SentencePiece` piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentencePieceType {
    /// An ordinary piece.
    #[default]
    Normal,

    /// The unknown piece.
    Unknown,

    /// A control piece.
    Control,

    /// A user-defined piece; treated as an ordinary piece.
    UserDefined,

    /// A byte-fallback piece.
    Byte,

    /// An unused piece.
    Unused,
}

/// One entry of a [`SentencePiecePieces`] table.
#[derive(Debug, Clone, PartialEq)]
pub struct SentencePieceEntry {
    /// The native piece text.
    pub piece: String,

    /// The piece score.
    pub score: f32,

    /// The piece type.
    pub kind: SentencePieceType,
}

impl SentencePieceEntry {
    /// Construct a new entry.
    pub fn new(
        piece: impl Into<String>,
        score: f32,
        kind: SentencePieceType,
    ) -> Self {
        Self {
            piece: piece.into(),
            score,
            kind,
        }
    }
}

/// An in-memory `SentencePiece` piece table, indexed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentencePiecePieces {
    entries: Vec<SentencePieceEntry>,
}

impl From<Vec<SentencePieceEntry>> for SentencePiecePieces {
    fn from(entries: Vec<SentencePieceEntry>) -> Self {
        Self { entries }
    }
}

impl SentencePiecePieces {
    /// Append a piece, returning its id.
    pub fn push(
        &mut self,
        piece: impl Into<String>,
        score: f32,
        kind: SentencePieceType,
    ) -> usize {
        self.entries
            .push(SentencePieceEntry::new(piece, score, kind));
        self.entries.len() - 1
    }

    /// The entries, in id order.
    pub fn entries(&self) -> &[SentencePieceEntry] {
        &self.entries
    }

    fn kind(
        &self,
        id: usize,
    ) -> Option<SentencePieceType> {
        self.entries.get(id).map(|e| e.kind)
    }
}

impl SentencePieceReader for SentencePiecePieces {
    fn vocab_size(&self) -> usize {
        self.entries.len()
    }

    fn id_to_piece(
        &self,
        id: usize,
    ) -> &str {
        self.entries.get(id).map_or("", |e| e.piece.as_str())
    }

    fn score(
        &self,
        id: usize,
    ) -> f32 {
        self.entries.get(id).map_or(0.0, |e| e.score)
    }

    fn is_unknown(
        &self,
        id: usize,
    ) -> bool {
        self.kind(id) == Some(SentencePieceType::Unknown)
    }

    fn is_control(
        &self,
        id: usize,
    ) -> bool {
        self.kind(id) == Some(SentencePieceType::Control)
    }

    fn is_unused(
        &self,
        id: usize,
    ) -> bool {
        self.kind(id) == Some(SentencePieceType::Unused)
    }

    fn is_byte(
        &self,
        id: usize,
    ) -> bool {
        self.kind(id) == Some(SentencePieceType::Byte)
    }
}
