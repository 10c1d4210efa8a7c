//! # `llvocab` Tokenizer Vocabulary Converter
//!
//! This converts trained LLM tokenizer vocabularies into a compact,
//! versioned binary vocabulary format for inference runtimes.
//!
//! Three source families are normalized into one canonical [`TokenizerModel`]:
//! * `SentencePiece` piece/score tables, see [`sources::SentencePieceSource`];
//! * byte-level BPE encoder maps and merge lists (Hugging-Face style),
//!   see [`sources::MergeRankBpeVocab`];
//! * tiktoken mergeable rank tables, see [`sources::TiktokenVocab`].
//!
//! See:
//! * [`display`] for piece display strings.
//! * [`model`] for the canonical token table.
//! * [`sources`] for the vocabulary sources.
//! * [`export`] for the binary format and the tokenizer file pair.
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap implementations for ``ahash``.
//! Enabled by default.
//!
//! ## Converting A Vocabulary
//!
//! ```rust,no_run
//! use llvocab::{
//!     export::save_tokenizer_files,
//!     sources::{VocabSource, load_hf_bpe_dir},
//! };
//!
//! fn example() -> llvocab::LLResult<()> {
//!     let vocab = load_hf_bpe_dir("gpt2/")?
//!         .with_specials([(50256, "<|endoftext|>")]);
//!
//!     let model = vocab.to_tokenizer_model()?;
//!     save_tokenizer_files(&model, "out/", "gpt2")?;
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, unused)]

pub mod display;
pub mod errors;
pub mod export;
pub mod model;
pub mod sources;
pub mod types;

#[doc(inline)]
pub use errors::{LLResult, LLVocabError};
#[doc(inline)]
pub use model::{Token, TokenFlags, TokenizerConfig, TokenizerModel};
#[doc(inline)]
pub use sources::VocabSource;
