//! # Binary Vocabulary IO

use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind, Read, Write},
    path::Path,
};

use crate::{
    display::truncate_display,
    errors::{LLResult, LLVocabError},
    model::{Token, TokenFlags, TokenizerModel},
};

/// The leading magic of a binary vocabulary.
pub const VOCAB_MAGIC: [u8; 4] = *b"LLsp";

/// The format guard written before and after the token records.
pub const FORMAT_GUARD: u16 = 0x55aa;

/// The maximum raw piece length.
pub const PIECE_LIMIT: usize = u8::MAX as usize;

// Caps the reservation taken from an untrusted header count.
const READ_RESERVE_LIMIT: usize = 1 << 16;

fn check_exportable(tokens: &[Token]) -> LLResult<i32> {
    for token in tokens {
        if token.piece.len() > PIECE_LIMIT {
            return Err(LLVocabError::PieceTooLong {
                id: token.id,
                len: token.piece.len(),
            });
        }
    }
    i32::try_from(tokens.len()).map_err(|_| LLVocabError::VocabTooLarge { size: tokens.len() })
}

/// Write a token table as a binary vocabulary.
///
/// The whole table is checked before the first byte is written.
///
/// ## Errors
/// [`LLVocabError::PieceTooLong`] if any raw piece exceeds [`PIECE_LIMIT`] bytes.
pub fn write_vocab<W: Write>(
    tokens: &[Token],
    writer: &mut W,
) -> LLResult<()> {
    let count = check_exportable(tokens)?;

    writer.write_all(&VOCAB_MAGIC)?;
    writer.write_all(&count.to_le_bytes())?;
    writer.write_all(&FORMAT_GUARD.to_le_bytes())?;

    for token in tokens {
        let display = truncate_display(&token.display);

        // flags are a signed byte on disk; the bit pattern is the same.
        writer.write_all(&[token.flags.bits()])?;
        writer.write_all(&[token.piece.len() as u8])?;
        writer.write_all(&token.piece)?;
        writer.write_all(&[display.len() as u8])?;
        writer.write_all(&display)?;
        writer.write_all(&token.weight.to_le_bytes())?;
    }

    writer.write_all(&FORMAT_GUARD.to_le_bytes())?;
    Ok(())
}

/// Encode a model's token table as a binary vocabulary.
pub fn encode_vocab(model: &TokenizerModel) -> LLResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_vocab(model.tokens(), &mut buf)?;
    Ok(buf)
}

/// Save a model's token table as a binary vocabulary file.
///
/// The vocabulary is fully encoded before the file is created;
/// a failed export leaves no file behind.
pub fn save_vocab_path(
    model: &TokenizerModel,
    path: impl AsRef<Path>,
) -> LLResult<()> {
    let buf = encode_vocab(model)?;
    fs::write(path, buf)?;
    Ok(())
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> LLResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => LLVocabError::Truncated,
        _ => LLVocabError::Io(err),
    })?;
    Ok(buf)
}

fn read_bytes<R: Read>(
    reader: &mut R,
    len: usize,
) -> LLResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => LLVocabError::Truncated,
        _ => LLVocabError::Io(err),
    })?;
    Ok(buf)
}

fn read_guard<R: Read>(reader: &mut R) -> LLResult<()> {
    let found = u16::from_le_bytes(read_array(reader)?);
    if found != FORMAT_GUARD {
        return Err(LLVocabError::BadFormatGuard { found });
    }
    Ok(())
}

/// Read a binary vocabulary back into a token table.
///
/// ## Errors
/// * [`LLVocabError::BadMagic`] / [`LLVocabError::BadFormatGuard`] on a format mismatch.
/// * [`LLVocabError::Truncated`] if the stream ends early.
pub fn read_vocab<R: Read>(reader: &mut R) -> LLResult<Vec<Token>> {
    let magic: [u8; 4] = read_array(reader)?;
    if magic != VOCAB_MAGIC {
        return Err(LLVocabError::BadMagic { found: magic });
    }

    let count = i32::from_le_bytes(read_array(reader)?);
    let count = usize::try_from(count)
        .map_err(|_| LLVocabError::Parse(format!("negative token count: {count}")))?;
    read_guard(reader)?;

    let mut tokens = Vec::with_capacity(count.min(READ_RESERVE_LIMIT));
    for id in 0..count {
        let [flags] = read_array::<_, 1>(reader)?;
        let [piece_len] = read_array::<_, 1>(reader)?;
        let piece = read_bytes(reader, piece_len as usize)?;
        let [display_len] = read_array::<_, 1>(reader)?;
        let display = String::from_utf8(read_bytes(reader, display_len as usize)?)
            .map_err(|e| LLVocabError::Parse(format!("token {id} display: {e}")))?;
        let weight = f32::from_le_bytes(read_array(reader)?);

        tokens.push(Token::new(
            id,
            TokenFlags::from_bits(flags),
            piece,
            display,
            weight,
        ));
    }

    read_guard(reader)?;
    Ok(tokens)
}

/// Load a binary vocabulary file into a token table.
pub fn load_vocab_path(path: impl AsRef<Path>) -> LLResult<Vec<Token>> {
    let mut reader = BufReader::new(File::open(path)?);
    read_vocab(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TokenizerConfig;

    fn sample_model() -> TokenizerModel {
        TokenizerModel::from_tokens(
            TokenizerConfig::default(),
            [
                Token::new(0, TokenFlags::UNKNOWN, "", "<unk>", 0.0),
                Token::control(1, "<s>"),
                Token::new(2, TokenFlags::BYTE, [0x0Au8], "<0x0A>", 0.0),
                Token::new(3, TokenFlags::NONE, " the", "\u{2581}the", -1.5),
                Token::unused(4),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_layout() {
        let model = TokenizerModel::from_tokens(
            TokenizerConfig::default(),
            [Token::new(0, TokenFlags::BYTE, [0xE6u8], "<0xE6>", -2.0)],
        )
        .unwrap();
        let buf = encode_vocab(&model).unwrap();

        let mut expected: Vec<u8> = Vec::new();
        expected.extend_from_slice(b"LLsp");
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(&[0xaa, 0x55]);
        expected.extend_from_slice(&[4, 1, 0xE6, 6]);
        expected.extend_from_slice(b"<0xE6>");
        expected.extend_from_slice(&(-2.0f32).to_le_bytes());
        expected.extend_from_slice(&[0xaa, 0x55]);

        assert_eq!(buf, expected);
    }

    #[test]
    fn test_unused_layout() {
        let model =
            TokenizerModel::from_tokens(TokenizerConfig::default(), [Token::unused(0)]).unwrap();
        let buf = encode_vocab(&model).unwrap();

        let mut expected: Vec<u8> = Vec::new();
        expected.extend_from_slice(b"LLsp");
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(&[0xaa, 0x55]);
        expected.extend_from_slice(&[8, 0, 8]);
        expected.extend_from_slice(b"<UNUSED>");
        expected.extend_from_slice(&0.0f32.to_le_bytes());
        expected.extend_from_slice(&[0xaa, 0x55]);

        assert_eq!(buf, expected);
    }

    #[test]
    fn test_roundtrip() {
        let model = sample_model();
        let buf = encode_vocab(&model).unwrap();

        let tokens = read_vocab(&mut buf.as_slice()).unwrap();
        assert_eq!(tokens, model.tokens());
        assert!(tokens[4].is_unused());
        assert!(tokens[4].piece.is_empty());
    }

    #[test]
    fn test_truncated_display() {
        let model = TokenizerModel::from_tokens(
            TokenizerConfig::default(),
            [Token::new(0, TokenFlags::NONE, "x", "x".repeat(400), 0.0)],
        )
        .unwrap();
        let buf = encode_vocab(&model).unwrap();

        let tokens = read_vocab(&mut buf.as_slice()).unwrap();
        assert_eq!(tokens[0].display.len(), 255);
        assert!(tokens[0].display.ends_with("...(truncated)"));
    }

    #[test]
    fn test_piece_too_long() {
        let model = TokenizerModel::from_tokens(
            TokenizerConfig::default(),
            [
                Token::unused(0),
                Token::new(1, TokenFlags::NONE, vec![b'a'; 256], "a", 0.0),
            ],
        )
        .unwrap();

        let mut buf = Vec::new();
        let err = write_vocab(model.tokens(), &mut buf).unwrap_err();
        assert!(matches!(err, LLVocabError::PieceTooLong { id: 1, len: 256 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_read_errors() {
        let buf = encode_vocab(&sample_model()).unwrap();

        let mut bad_magic = buf.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            read_vocab(&mut bad_magic.as_slice()),
            Err(LLVocabError::BadMagic { .. })
        ));

        let mut bad_guard = buf.clone();
        let last = bad_guard.len() - 1;
        bad_guard[last] = 0;
        assert!(matches!(
            read_vocab(&mut bad_guard.as_slice()),
            Err(LLVocabError::BadFormatGuard { found: 0x00aa })
        ));

        let truncated = &buf[..buf.len() - 3];
        assert!(matches!(
            read_vocab(&mut &truncated[..]),
            Err(LLVocabError::Truncated)
        ));

        let mut huge_count: Vec<u8> = Vec::new();
        huge_count.extend_from_slice(&VOCAB_MAGIC);
        huge_count.extend_from_slice(&i32::MAX.to_le_bytes());
        huge_count.extend_from_slice(&FORMAT_GUARD.to_le_bytes());
        assert!(matches!(
            read_vocab(&mut huge_count.as_slice()),
            Err(LLVocabError::Truncated)
        ));

        let mut negative_count: Vec<u8> = Vec::new();
        negative_count.extend_from_slice(&VOCAB_MAGIC);
        negative_count.extend_from_slice(&(-1i32).to_le_bytes());
        negative_count.extend_from_slice(&FORMAT_GUARD.to_le_bytes());
        assert!(matches!(
            read_vocab(&mut negative_count.as_slice()),
            Err(LLVocabError::Parse(_))
        ));
    }

    #[test]
    fn test_save_load_path() {
        let model = sample_model();

        tempdir::TempDir::new("vocab_test")
            .and_then(|dir| {
                let path = dir.path().join("sample.tokenizer.bin");

                save_vocab_path(&model, &path).expect("Failed to save vocab");

                let loaded = load_vocab_path(&path).expect("Failed to load vocab");
                assert_eq!(loaded, model.tokens());

                Ok(())
            })
            .unwrap();
    }

    fn token_strategy() -> impl proptest::strategy::Strategy<Value = (u8, Vec<u8>, String, f32)> {
        (
            proptest::prelude::any::<u8>(),
            proptest::collection::vec(proptest::prelude::any::<u8>(), 0..=PIECE_LIMIT),
            "\\PC{0,120}",
            proptest::prelude::any::<f32>(),
        )
    }

    proptest::proptest! {
        #[test]
        fn encode_read_roundtrip(
            records in proptest::collection::vec(token_strategy(), 0..24),
        ) {
            let model = TokenizerModel::from_tokens(
                TokenizerConfig::default(),
                records
                    .into_iter()
                    .enumerate()
                    .map(|(id, (flags, piece, display, weight))| {
                        Token::new(id, TokenFlags::from_bits(flags), piece, display, weight)
                    }),
            )
            .unwrap();

            let buf = encode_vocab(&model).unwrap();
            let tokens = read_vocab(&mut buf.as_slice()).unwrap();

            proptest::prop_assert_eq!(tokens.len(), model.len());
            for (read, orig) in tokens.iter().zip(model.tokens()) {
                let display = String::from_utf8(truncate_display(&orig.display)).unwrap();

                proptest::prop_assert_eq!(read.id, orig.id);
                proptest::prop_assert_eq!(read.flags, orig.flags);
                proptest::prop_assert_eq!(&read.piece, &orig.piece);
                proptest::prop_assert_eq!(&read.display, &display);
                proptest::prop_assert_eq!(read.weight.to_bits(), orig.weight.to_bits());
            }
        }
    }
}
