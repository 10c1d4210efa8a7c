//! # Draft Vocabularies

use crate::{
    errors::{LLResult, LLVocabError},
    model::{Token, TokenFlags, TokenizerConfig, TokenizerModel},
};

/// The largest token table the binary vocabulary count can describe.
pub const MAX_VOCAB_SIZE: usize = i32::MAX as usize;

/// The weight of a merge of the given rank.
///
/// Earlier (lower rank) merges get larger weights.
pub fn rank_weight(rank: usize) -> f32 {
    // `0.0 - 0.0` is `+0.0`; rank 0 must not export as `-0.0`.
    0.0 - rank as f32
}

/// A token as extracted from a source, before weights are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftToken {
    /// The token id.
    pub id: usize,

    /// The token flags.
    pub flags: TokenFlags,

    /// The raw piece bytes.
    pub piece: Vec<u8>,

    /// The display string.
    pub display: String,

    /// The weight, if the source determined one.
    pub weight: Option<f32>,
}

impl DraftToken {
    /// Construct a new draft token.
    pub fn new(
        id: usize,
        flags: TokenFlags,
        piece: impl Into<Vec<u8>>,
        display: impl Into<String>,
        weight: Option<f32>,
    ) -> Self {
        Self {
            id,
            flags,
            piece: piece.into(),
            display: display.into(),
            weight,
        }
    }

    /// Resolve into a [`Token`]; an undetermined weight becomes `0.0`.
    pub fn into_token(self) -> Token {
        Token {
            id: self.id,
            flags: self.flags,
            piece: self.piece,
            display: self.display,
            weight: self.weight.unwrap_or(0.0),
        }
    }
}

/// Everything a source contributes to a [`TokenizerModel`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftVocab {
    /// The base vocabulary size; base token ids must be below it.
    pub vocab_size: usize,

    /// The base vocabulary tokens, in any order.
    pub tokens: Vec<DraftToken>,

    /// Special (control) tokens as `(id, text)`, applied after the base tokens.
    pub specials: Vec<(usize, String)>,

    /// The designated unknown-token id.
    pub unk_id: Option<usize>,

    /// The tokenizer config of the source.
    pub config: TokenizerConfig,
}

impl DraftVocab {
    /// Assemble the dense token table.
    ///
    /// * Base tokens are placed by id into a table of `vocab_size` slots.
    /// * Special tokens overwrite their slot with a control token,
    ///   growing the table if needed.
    /// * Empty slots become unused placeholders.
    /// * The unknown flag is added to the token at `unk_id`.
    ///
    /// ## Errors
    /// * [`LLVocabError::DuplicateTokenId`] if two base tokens share an id.
    /// * [`LLVocabError::TokenIdOutOfRange`] for a base token id ``>= vocab_size``,
    ///   or an `unk_id` outside the table.
    /// * [`LLVocabError::VocabTooLarge`] if `vocab_size`, or a special token id,
    ///   would grow the table past [`MAX_VOCAB_SIZE`].
    pub fn assemble(self) -> LLResult<TokenizerModel> {
        if self.vocab_size > MAX_VOCAB_SIZE {
            return Err(LLVocabError::VocabTooLarge {
                size: self.vocab_size,
            });
        }
        if let Some(&(id, _)) = self.specials.iter().find(|(id, _)| *id >= MAX_VOCAB_SIZE) {
            return Err(LLVocabError::VocabTooLarge {
                size: id.saturating_add(1),
            });
        }

        let mut slots: Vec<Option<DraftToken>> = vec![None; self.vocab_size];

        for token in self.tokens {
            let id = token.id;
            let slot = slots
                .get_mut(id)
                .ok_or(LLVocabError::TokenIdOutOfRange {
                    id,
                    vocab_size: self.vocab_size,
                })?;
            if slot.is_some() {
                return Err(LLVocabError::DuplicateTokenId { id });
            }
            *slot = Some(token);
        }

        for (id, text) in self.specials {
            if id >= slots.len() {
                slots.resize(id + 1, None);
            }
            if let Some(existing) = &slots[id] {
                log::warn!(
                    "special token {text:?} replaces token {id} ({:?})",
                    existing.display
                );
            }
            log::debug!("special symbol {id}: {text:?}");
            slots[id] = Some(DraftToken::new(
                id,
                TokenFlags::CONTROL,
                Vec::new(),
                text,
                Some(0.0),
            ));
        }

        let mut tokens: Vec<Token> = slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| match slot {
                Some(draft) => draft.into_token(),
                None => Token::unused(id),
            })
            .collect();

        if let Some(unk_id) = self.unk_id {
            let vocab_size = tokens.len();
            let token = tokens
                .get_mut(unk_id)
                .ok_or(LLVocabError::TokenIdOutOfRange {
                    id: unk_id,
                    vocab_size,
                })?;
            log::info!("unk token: {unk_id}: {:?}", token.display);
            token.flags |= TokenFlags::UNKNOWN;
        }

        let model = TokenizerModel::from_tokens(self.config, tokens)?;
        log::info!("vocab_size={}", model.len());
        Ok(model)
    }
}

/// A vocabulary format which can be normalized into a [`TokenizerModel`].
pub trait VocabSource {
    /// Extract the draft vocabulary.
    fn draft_vocab(&self) -> LLResult<DraftVocab>;

    /// Extract and assemble the [`TokenizerModel`].
    fn to_tokenizer_model(&self) -> LLResult<TokenizerModel> {
        self.draft_vocab()?.assemble()
    }
}
