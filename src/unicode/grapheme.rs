//! Grapheme cluster iteration and emoji detection.

use unicode_segmentation::UnicodeSegmentation;

const ZWJ: char = '\u{200D}';
const VARIATION_SELECTOR_16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

/// Check if a scalar value is a pictographic emoji base.
#[must_use]
pub fn is_emoji_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x231A..=0x231B
            | 0x23E9..=0x23FA
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
    )
}

/// Check if a grapheme cluster renders as an emoji.
///
/// A cluster is an emoji when it starts with a pictographic base, carries
/// an emoji presentation selector, forms a keycap, or joins pictographs with
/// a zero width joiner.
#[must_use]
pub fn is_emoji_cluster(cluster: &str) -> bool {
    let Some(first) = cluster.chars().next() else {
        return false;
    };
    if is_emoji_char(first) {
        return true;
    }
    let has_pictograph = cluster.chars().any(is_emoji_char);
    cluster
        .chars()
        .any(|c| c == VARIATION_SELECTOR_16 || c == KEYCAP || (c == ZWJ && has_pictograph))
}

/// A run of input text classified for unit conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cluster<'a> {
    /// Contiguous non-emoji text.
    Text(&'a str),
    /// A single emoji grapheme cluster.
    Emoji(&'a str),
}

/// Split text into maximal plain-text runs and single emoji clusters.
#[must_use]
pub fn classify_clusters(s: &str) -> Vec<Cluster<'_>> {
    let mut out = Vec::new();
    let mut text_start: Option<usize> = None;

    for (offset, cluster) in s.grapheme_indices(true) {
        if is_emoji_cluster(cluster) {
            if let Some(start) = text_start.take() {
                out.push(Cluster::Text(&s[start..offset]));
            }
            out.push(Cluster::Emoji(cluster));
        } else if text_start.is_none() {
            text_start = Some(offset);
        }
    }
    if let Some(start) = text_start {
        out.push(Cluster::Text(&s[start..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_segmentation::UnicodeSegmentation;

    #[test]
    fn test_graphemes_emoji_sequence() {
        // Family emoji (ZWJ sequence)
        assert_eq!("👨‍👩‍👧".graphemes(true).count(), 1);
        assert!(is_emoji_cluster("👨‍👩‍👧"));
    }

    #[test]
    fn test_emoji_detection() {
        assert!(is_emoji_cluster("😀"));
        assert!(is_emoji_cluster("👍🏽"));
        assert!(is_emoji_cluster("🇺🇸"));
        assert!(is_emoji_cluster("1\u{FE0F}\u{20E3}"));
        assert!(is_emoji_cluster("❤\u{FE0F}"));
        assert!(!is_emoji_cluster("a"));
        assert!(!is_emoji_cluster("e\u{0301}"));
        assert!(!is_emoji_cluster("中"));
        assert!(!is_emoji_cluster(""));
    }

    #[test]
    fn test_classify_runs() {
        let runs = classify_clusters("ab😀cd👍🏽");
        assert_eq!(
            runs,
            vec![
                Cluster::Text("ab"),
                Cluster::Emoji("😀"),
                Cluster::Text("cd"),
                Cluster::Emoji("👍🏽"),
            ]
        );
        assert!(classify_clusters("").is_empty());
    }

    #[test]
    fn test_classify_keeps_text_verbatim() {
        let input = "plain text\nwith e\u{0301} and 中文";
        assert_eq!(classify_clusters(input), vec![Cluster::Text(input)]);
        let joined: String = input.graphemes(true).collect();
        assert_eq!(joined, input);
    }
}
