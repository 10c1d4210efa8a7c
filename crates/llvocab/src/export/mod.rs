//! # Vocabulary Export
//!
//! ## Binary Vocabulary Format
//!
//! Little-endian throughout:
//! ```terminaloutput
//! offset  size     field
//! 0       4        magic "LLsp"
//! 4       4        token count (i32)
//! 8       2        format guard (0x55aa)
//! ...     var      token records, in id order
//! end-2   2        format guard (0x55aa)
//! ```
//!
//! Each token record is:
//! ```terminaloutput
//! flags:i8, piece_len:u8, piece:[u8; piece_len], display_len:u8, display:[u8; display_len], weight:f32
//! ```
//!
//! The display string is truncated with [`crate::display::truncate_display`].
//!
//! ## Tokenizer Files
//!
//! [`save_tokenizer_files`] writes the binary vocabulary and its
//! ``[tokenizer]`` ini side-car next to each other.

mod binary_vocab;
mod tokenizer_files;

#[doc(inline)]
pub use binary_vocab::*;
#[doc(inline)]
pub use tokenizer_files::*;
