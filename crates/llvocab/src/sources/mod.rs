//! # Vocabulary Sources
//!
//! Each supported vocabulary format is exposed as a [`VocabSource`],
//! which extracts a [`DraftVocab`]: the pieces, flags, weight hints,
//! specials and unknown-token id of the source.
//!
//! Turning a draft into a dense [`crate::model::TokenizerModel`] is shared
//! policy, see [`DraftVocab::assemble`].
//!
//! Sources:
//! * [`SentencePieceSource`] - piece/score tables with per-id type predicates.
//! * [`MergeRankBpeVocab`] - byte-level encoder maps and ranked merge lists.
//! * [`TiktokenVocab`] - mergeable rank tables keyed by raw bytes.

mod byte_level;
mod draft;
mod hf_files;
mod merge_rank_bpe;
mod sentencepiece;
mod tiktoken;

#[doc(inline)]
pub use byte_level::*;
#[doc(inline)]
pub use draft::{DraftToken, DraftVocab, MAX_VOCAB_SIZE, VocabSource, rank_weight};
#[doc(inline)]
pub use hf_files::*;
#[doc(inline)]
pub use merge_rank_bpe::MergeRankBpeVocab;
#[doc(inline)]
pub use sentencepiece::*;
#[doc(inline)]
pub use tiktoken::*;
