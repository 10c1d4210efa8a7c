//! # Canonical Token Model
//!
//! Every vocabulary source is normalized into a [`TokenizerModel`]:
//! a dense table of [`Token`] records, where each token's id is its
//! position in the table, plus the [`TokenizerConfig`] side-car settings.
//!
//! The model only ever grows by appending the next id, see
//! [`TokenizerModel::add_token`].

mod token;
mod tokenizer_config;
mod tokenizer_model;

#[doc(inline)]
pub use token::{Token, TokenFlags, UNUSED_DISPLAY};
#[doc(inline)]
pub use tokenizer_config::TokenizerConfig;
#[doc(inline)]
pub use tokenizer_model::TokenizerModel;
