//! # Byte-Level Piece Alphabet
//!
//! Byte-level BPE vocabularies (GPT-2 and descendants) store their pieces
//! as unicode strings, where each character stands for one raw byte.
//!
//! Printable ISO/IEC 8859-1 bytes map to themselves:
//! ``[0x21-0x7E], [0xA1-0xAD), (0xAD-0xFF]``;
//! the remaining 68 bytes map, in order, to ``U+0100..``.

use crate::{
    errors::{LLResult, LLVocabError},
    types::LLHashMap,
};

/// A map from byte-level characters to the bytes they stand for.
pub type ByteLevelMap = LLHashMap<char, u8>;

/// Trait for decoding byte-level pieces.
pub trait ByteLevelDecoder {
    /// Decode a byte-level piece into raw bytes.
    ///
    /// ## Errors
    /// [`LLVocabError::UnmappableChar`] for a character outside the alphabet.
    fn decode_byte_level(
        &self,
        piece: &str,
    ) -> LLResult<Vec<u8>>;
}

impl ByteLevelDecoder for ByteLevelMap {
    fn decode_byte_level(
        &self,
        piece: &str,
    ) -> LLResult<Vec<u8>> {
        piece
            .chars()
            .map(|ch| {
                self.get(&ch)
                    .copied()
                    .ok_or_else(|| LLVocabError::UnmappableChar {
                        ch,
                        piece: piece.to_string(),
                    })
            })
            .collect()
    }
}

fn is_printable_byte(b: u8) -> bool {
    matches!(b, 0x21..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF)
}

/// The byte to byte-level character table.
pub fn byte_level_alphabet() -> [char; 256] {
    let mut spare = '\u{100}'..;
    core::array::from_fn(|idx| {
        let b = idx as u8;
        if is_printable_byte(b) {
            char::from(b)
        } else {
            spare.next().unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    })
}

/// Build the default byte-level character to byte map.
pub fn byte_level_decoder() -> ByteLevelMap {
    byte_level_alphabet()
        .into_iter()
        .enumerate()
        .map(|(b, ch)| (ch, b as u8))
        .collect()
}

/// Encode raw bytes as a byte-level piece.
pub fn encode_byte_level(bytes: &[u8]) -> String {
    let alphabet = byte_level_alphabet();
    bytes.iter().map(|&b| alphabet[b as usize]).collect()
}
