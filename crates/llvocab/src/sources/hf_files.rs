//! # Hugging-Face BPE Model Files
//!
//! A Hugging-Face BPE model is saved as a pair of files:
//! * ``vocab.json`` - a json object of ``{ piece: id }``;
//! * ``merges.txt`` - one ``{left} {right}`` merge per line, in rank order,
//!   with an optional ``#version`` header.
//!
//! Tokenizers which can only dump their model to disk are read through
//! [`stage_bpe_model`], which round-trips the files via a temporary directory.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde_json::Value;

use crate::{
    errors::{LLResult, LLVocabError},
    sources::MergeRankBpeVocab,
    types::{PieceIdMap, PiecePair},
};

/// The vocabulary file name of a saved BPE model.
pub const HF_VOCAB_JSON: &str = "vocab.json";

/// The merges file name of a saved BPE model.
pub const HF_MERGES_TXT: &str = "merges.txt";

/// Read a ``vocab.json`` encoder map.
pub fn read_hf_vocab_json<R: Read>(reader: R) -> LLResult<PieceIdMap> {
    let vocab_json: Value = serde_json::from_reader(reader)?;
    let object = vocab_json
        .as_object()
        .ok_or_else(|| LLVocabError::Parse(format!("{HF_VOCAB_JSON} is not an object")))?;

    object
        .iter()
        .map(|(piece, id)| -> LLResult<(String, usize)> {
            let id = id
                .as_u64()
                .and_then(|id| usize::try_from(id).ok())
                .ok_or_else(|| {
                    LLVocabError::Parse(format!("invalid id for piece {piece:?}: {id}"))
                })?;
            Ok((piece.clone(), id))
        })
        .collect()
}

/// Read a ``merges.txt`` merge list, in rank order.
pub fn read_hf_merges_txt<R: BufRead>(reader: R) -> LLResult<Vec<PiecePair>> {
    let mut merges = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with("#version") || line.trim().is_empty() {
            continue;
        }

        let parts = line.split(' ').collect::<Vec<&str>>();
        let [left, right] = parts[..] else {
            return Err(LLVocabError::Parse(format!(
                "{HF_MERGES_TXT}:{}: expected two pieces: {line:?}",
                idx + 1
            )));
        };
        merges.push((left.to_string(), right.to_string()));
    }
    Ok(merges)
}

/// Write a ``vocab.json`` encoder map.
pub fn write_hf_vocab_json<W: Write>(
    encoder: &PieceIdMap,
    writer: &mut W,
) -> LLResult<()> {
    let object: serde_json::Map<String, Value> = encoder
        .iter()
        .map(|(piece, &id)| (piece.clone(), Value::from(id)))
        .collect();
    serde_json::to_writer(&mut *writer, &object)?;
    Ok(())
}

/// Write a ``merges.txt`` merge list.
pub fn write_hf_merges_txt<W: Write>(
    merges: &[PiecePair],
    writer: &mut W,
) -> LLResult<()> {
    writeln!(writer, "#version: 0.2")?;
    for (left, right) in merges {
        writeln!(writer, "{left} {right}")?;
    }
    Ok(())
}

/// Read the ``vocab.json`` / ``merges.txt`` pair from a directory.
pub fn read_hf_bpe_dir(dir: impl AsRef<Path>) -> LLResult<(PieceIdMap, Vec<PiecePair>)> {
    let dir = dir.as_ref();
    let encoder = read_hf_vocab_json(BufReader::new(File::open(dir.join(HF_VOCAB_JSON))?))?;
    let merges = read_hf_merges_txt(BufReader::new(File::open(dir.join(HF_MERGES_TXT))?))?;
    Ok((encoder, merges))
}

/// Write the ``vocab.json`` / ``merges.txt`` pair into a directory.
pub fn write_hf_bpe_dir(
    encoder: &PieceIdMap,
    merges: &[PiecePair],
    dir: impl AsRef<Path>,
) -> LLResult<()> {
    let dir = dir.as_ref();

    let mut writer = BufWriter::new(File::create(dir.join(HF_VOCAB_JSON))?);
    write_hf_vocab_json(encoder, &mut writer)?;
    writer.flush()?;

    let mut writer = BufWriter::new(File::create(dir.join(HF_MERGES_TXT))?);
    write_hf_merges_txt(merges, &mut writer)?;
    writer.flush()?;

    Ok(())
}

/// Load a [`MergeRankBpeVocab`] from a saved BPE model directory.
pub fn load_hf_bpe_dir(dir: impl AsRef<Path>) -> LLResult<MergeRankBpeVocab> {
    let (encoder, merges) = read_hf_bpe_dir(dir)?;
    Ok(MergeRankBpeVocab::new(encoder, merges))
}

/// A BPE model which can save itself as ``vocab.json`` and ``merges.txt``.
pub trait BpeModelDump {
    /// Save the model files into `dir`.
    fn save_model_files(
        &self,
        dir: &Path,
    ) -> LLResult<()>;
}

/// Load a [`MergeRankBpeVocab`] by staging a model dump in a temporary directory.
///
/// The directory is removed on every exit path.
pub fn stage_bpe_model<D: BpeModelDump + ?Sized>(dump: &D) -> LLResult<MergeRankBpeVocab> {
    let staging = tempdir::TempDir::new("llvocab_bpe")?;
    dump.save_model_files(staging.path())?;
    let vocab = load_hf_bpe_dir(staging.path())?;
    staging.close()?;
    Ok(vocab)
}
