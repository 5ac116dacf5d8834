//! Unicode utilities for splitting input text into content units.

mod grapheme;

pub use grapheme::{Cluster, classify_clusters, is_emoji_char, is_emoji_cluster};
