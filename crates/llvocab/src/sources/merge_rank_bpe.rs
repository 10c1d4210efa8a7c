//! # Merge-Rank BPE Vocabulary Source

use crate::{
    display::bytes_to_display,
    errors::LLResult,
    model::{TokenFlags, TokenizerConfig},
    sources::{
        ByteLevelDecoder,
        ByteLevelMap,
        DraftToken,
        DraftVocab,
        VocabSource,
        byte_level_decoder,
        rank_weight,
    },
    types::{LLHashMap, PieceIdMap, PiecePair},
};

/// A byte-level BPE vocabulary: an encoder map and a ranked merge list.
///
/// Pieces are byte-level strings (see [`crate::sources::byte_level_alphabet`]);
/// merges are listed in rank order, so a merge's rank is its position.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRankBpeVocab {
    /// `{ piece -> id }` map.
    pub encoder: PieceIdMap,

    /// Merge pairs, in rank order.
    pub merges: Vec<PiecePair>,

    /// The base vocabulary size.
    pub vocab_size: usize,

    /// Special tokens as `(id, text)`.
    pub specials: Vec<(usize, String)>,

    /// The unknown-token id.
    pub unk_id: Option<usize>,

    /// The byte-level character to byte map.
    pub byte_decoder: ByteLevelMap,
}

impl MergeRankBpeVocab {
    /// Build from an encoder and merge list.
    ///
    /// The vocab size defaults to one past the largest encoder id,
    /// and the byte decoder to [`byte_level_decoder`].
    pub fn new(
        encoder: PieceIdMap,
        merges: Vec<PiecePair>,
    ) -> Self {
        let vocab_size = encoder.values().max().map_or(0, |&id| id + 1);
        Self {
            encoder,
            merges,
            vocab_size,
            specials: Vec::new(),
            unk_id: None,
            byte_decoder: byte_level_decoder(),
        }
    }

    /// Set the base vocabulary size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Extend the special tokens with `(id, text)` pairs.
    pub fn with_specials<W, S>(
        self,
        specials: W,
    ) -> Self
    where
        W: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut vocab = self;
        vocab.specials.extend(
            specials
                .into_iter()
                .map(|(id, text)| (id, text.as_ref().to_string())),
        );
        vocab
    }

    /// Set the unknown-token id.
    pub fn with_unk_id(
        self,
        unk_id: Option<usize>,
    ) -> Self {
        Self { unk_id, ..self }
    }

    /// Set the byte-level character to byte map.
    pub fn with_byte_decoder(
        self,
        byte_decoder: ByteLevelMap,
    ) -> Self {
        Self {
            byte_decoder,
            ..self
        }
    }
}

impl VocabSource for MergeRankBpeVocab {
    fn draft_vocab(&self) -> LLResult<DraftVocab> {
        let mut pieces: LLHashMap<&str, DraftToken> = LLHashMap::with_capacity(self.encoder.len());
        for (piece, &id) in &self.encoder {
            let bytes = self.byte_decoder.decode_byte_level(piece)?;
            let display = bytes_to_display(&bytes);
            pieces.insert(
                piece.as_str(),
                DraftToken::new(id, TokenFlags::NONE, bytes, display, None),
            );
        }

        let mut prev_piece: Option<String> = None;
        for (rank, (left, right)) in self.merges.iter().enumerate() {
            let piece = format!("{left}{right}");
            match pieces.get_mut(piece.as_str()) {
                Some(token) => {
                    if token.weight.is_some() && prev_piece.as_deref() != Some(piece.as_str()) {
                        log::warn!(
                            "pair for {piece:?} ({left:?}, {right:?}) already exists: token {}",
                            token.id
                        );
                    }
                    token.weight = Some(rank_weight(rank));
                }
                None => {
                    log::debug!("merge {rank} ({left:?}, {right:?}) has no vocabulary slot");
                }
            }
            prev_piece = Some(piece);
        }

        let mut tokens: Vec<DraftToken> = pieces.into_iter().map(|(_, token)| token).collect();
        tokens.sort_by_key(|t| t.id);

        Ok(DraftVocab {
            vocab_size: self.vocab_size,
            tokens,
            specials: self.specials.clone(),
            unk_id: self.unk_id,
            config: TokenizerConfig::default(),
        })
    }
}
