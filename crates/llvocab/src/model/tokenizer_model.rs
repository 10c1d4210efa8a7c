//! # Tokenizer Model

use crate::{
    errors::{LLResult, LLVocabError},
    model::{Token, TokenizerConfig},
};

/// A normalized vocabulary: a dense token table and its config.
///
/// Token ids are always equal to their table position; the only way in
/// is [`TokenizerModel::add_token`], which appends the next id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizerModel {
    tokens: Vec<Token>,
    config: TokenizerConfig,
}

impl TokenizerModel {
    /// Create an empty model.
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            tokens: Vec::new(),
            config,
        }
    }

    /// Build a model by appending `tokens` in order.
    ///
    /// ## Errors
    /// [`LLVocabError::TokenIdMismatch`] at the first token out of position.
    pub fn from_tokens<I>(
        config: TokenizerConfig,
        tokens: I,
    ) -> LLResult<Self>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut model = Self::new(config);
        for token in tokens {
            model.add_token(token)?;
        }
        Ok(model)
    }

    /// Append a token.
    ///
    /// ## Errors
    /// [`LLVocabError::TokenIdMismatch`] unless `token.id == self.len()`.
    pub fn add_token(
        &mut self,
        token: Token,
    ) -> LLResult<()> {
        let expected = self.tokens.len();
        if token.id != expected {
            return Err(LLVocabError::TokenIdMismatch {
                id: token.id,
                expected,
            });
        }
        self.tokens.push(token);
        Ok(())
    }

    /// The token table, in id order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The tokenizer config.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Look up a token by id.
    pub fn get(
        &self,
        id: usize,
    ) -> Option<&Token> {
        self.tokens.get(id)
    }

    /// The vocabulary size.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is the token table empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
