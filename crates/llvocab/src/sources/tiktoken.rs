//! # Tiktoken Vocabulary Source

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::{
    display::bytes_to_display,
    errors::{LLResult, LLVocabError},
    model::{TokenFlags, TokenizerConfig},
    sources::{DraftToken, DraftVocab, VocabSource, rank_weight},
    types::SpanRankMap,
};

/// Load a [`SpanRankMap`] from a tiktoken rank file.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 SPAN} {RANK}
/// ```
pub fn load_tiktoken_ranks_path(path: impl AsRef<Path>) -> LLResult<SpanRankMap> {
    let reader = BufReader::new(File::open(path)?);
    read_tiktoken_ranks(reader)
}

/// Read a [`SpanRankMap`] from a tiktoken rank line reader.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 SPAN} {RANK}
/// ```
pub fn read_tiktoken_ranks<R: BufRead>(reader: R) -> LLResult<SpanRankMap> {
    let mut ranks = SpanRankMap::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (span, rank) = line
            .split_once(' ')
            .ok_or_else(|| LLVocabError::Parse(format!("malformed tiktoken line: {line:?}")))?;

        let span = BASE64_STANDARD
            .decode(span)
            .map_err(|e| LLVocabError::Parse(e.to_string()))?;

        let rank: usize = rank
            .trim()
            .parse()
            .map_err(|e: core::num::ParseIntError| LLVocabError::Parse(e.to_string()))?;

        ranks.insert(span, rank);
    }

    Ok(ranks)
}

/// A tiktoken vocabulary: mergeable ranks and id-keyed special tokens.
///
/// Each span's rank is its token id; merge weights are the negated rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TiktokenVocab {
    /// `{ span -> rank }` map.
    pub mergeable_ranks: SpanRankMap,

    /// Special tokens as `(text, id)`.
    pub special_tokens: Vec<(String, usize)>,
}

impl TiktokenVocab {
    /// Build from mergeable ranks.
    pub fn new(mergeable_ranks: SpanRankMap) -> Self {
        Self {
            mergeable_ranks,
            special_tokens: Vec::new(),
        }
    }

    /// Extend the special tokens.
    pub fn with_special_tokens<W, S>(
        self,
        special_tokens: W,
    ) -> Self
    where
        W: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let mut vocab = self;
        vocab.special_tokens.extend(
            special_tokens
                .into_iter()
                .map(|(text, id)| (text.as_ref().to_string(), id)),
        );
        vocab
    }
}

impl VocabSource for TiktokenVocab {
    fn draft_vocab(&self) -> LLResult<DraftVocab> {
        let mut tokens: Vec<DraftToken> = self
            .mergeable_ranks
            .iter()
            .map(|(span, &rank)| {
                DraftToken::new(
                    rank,
                    TokenFlags::NONE,
                    span.clone(),
                    bytes_to_display(span),
                    Some(rank_weight(rank)),
                )
            })
            .collect();
        tokens.sort_by_key(|t| t.id);

        let vocab_size = tokens.last().map_or(0, |t| t.id + 1);

        Ok(DraftVocab {
            vocab_size,
            tokens,
            specials: self
                .special_tokens
                .iter()
                .map(|(text, id)| (*id, text.clone()))
                .collect(),
            unk_id: None,
            config: TokenizerConfig::default().with_add_prefix_space(false),
        })
    }
}
