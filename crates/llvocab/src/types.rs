//! # Common Types

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type LLHashMap<K, V> = ahash::AHashMap<K, V>;

    } else {
        /// Type Alias for hash maps in this crate.
        pub type LLHashMap<K, V> = std::collections::HashMap<K, V>;
    }
}

/// `{ Vec<u8> -> usize }` map.
///
/// ## Style Hints
/// Instance names should prefer `span_map`, or `rank_map`.
pub type SpanRankMap = LLHashMap<Vec<u8>, usize>;

/// `{ String -> usize }` map.
///
/// ## Style Hints
/// Instance names should prefer `encoder`, or `piece_ids`.
pub type PieceIdMap = LLHashMap<String, usize>;

/// A pair of pieces, in merge order.
pub type PiecePair = (String, String);
