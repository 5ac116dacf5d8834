//! Conversion of raw input text into content units.

use super::{BLOCK_END, BLOCK_START, ContentUnit, Emoji, OBJECT_ANCHOR, TABLE_SEPARATOR};
use crate::unicode::{Cluster, classify_clusters};

/// Split raw text into content units.
///
/// Emoji grapheme clusters become [`ContentUnit::Emoji`], the table
/// separator becomes a separator block, a `BLOCK_START token BLOCK_END`
/// sequence becomes a named block, and a bare object anchor becomes an image
/// placeholder whose URL is supplied by the image decoration covering it.
/// Everything else is gathered into maximal [`ContentUnit::Text`] runs, so
/// plain text comes back as exactly one unit equal to the input.
///
/// ```
/// use richtext_core::unit::{ContentUnit, convert_text_to_units};
///
/// let units = convert_text_to_units("Hi 👋!");
/// assert_eq!(units.len(), 3);
/// assert_eq!(units[0], ContentUnit::Text("Hi ".into()));
/// assert_eq!(units[1].text(), "👋");
/// ```
#[must_use]
pub fn convert_text_to_units(text: &str) -> Vec<ContentUnit> {
    let mut units = Vec::new();
    for cluster in classify_clusters(text) {
        match cluster {
            Cluster::Emoji(sequence) => units.push(ContentUnit::Emoji(Emoji::new(sequence))),
            Cluster::Text(run) => split_text_run(run, &mut units),
        }
    }
    units
}

fn split_text_run(run: &str, units: &mut Vec<ContentUnit>) {
    let mut current = String::new();
    let mut chars = run.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            TABLE_SEPARATOR => {
                flush(&mut current, units);
                units.push(ContentUnit::separator());
            }
            OBJECT_ANCHOR => {
                flush(&mut current, units);
                units.push(ContentUnit::Image(String::new()));
            }
            BLOCK_START => {
                let body = &run[offset + c.len_utf8()..];
                if let Some(close) = body.find(BLOCK_END) {
                    flush(&mut current, units);
                    units.push(ContentUnit::Block(body[..close].to_string()));
                    let resume = offset + c.len_utf8() + close + BLOCK_END.len_utf8();
                    while chars.peek().is_some_and(|&(i, _)| i < resume) {
                        chars.next();
                    }
                } else {
                    current.push(c);
                }
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, units);
}

fn flush(current: &mut String, units: &mut Vec<ContentUnit>) {
    if !current.is_empty() {
        units.push(ContentUnit::Text(std::mem::take(current)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_unit() {
        let units = convert_text_to_units("Hello World\nsecond line");
        assert_eq!(
            units,
            vec![ContentUnit::Text("Hello World\nsecond line".into())]
        );
        assert!(convert_text_to_units("").is_empty());
    }

    #[test]
    fn test_emoji_sequences() {
        let units = convert_text_to_units("a👨‍👩‍👧b");
        assert_eq!(units.len(), 3);
        assert_eq!(units[1], ContentUnit::Emoji(Emoji::new("👨‍👩‍👧")));
        let internal: usize = units.iter().map(ContentUnit::internal_len).sum();
        assert_eq!(internal, 3);
    }

    #[test]
    fn test_separators_and_blocks() {
        let input = format!("a{TABLE_SEPARATOR}b{BLOCK_START}page{BLOCK_END}c{OBJECT_ANCHOR}");
        let units = convert_text_to_units(&input);
        assert_eq!(
            units,
            vec![
                ContentUnit::Text("a".into()),
                ContentUnit::separator(),
                ContentUnit::Text("b".into()),
                ContentUnit::Block("page".into()),
                ContentUnit::Text("c".into()),
                ContentUnit::Image(String::new()),
            ]
        );
        let exported: String = units.iter().map(ContentUnit::text).collect();
        assert_eq!(exported, input);
    }

    #[test]
    fn test_unterminated_block_is_text() {
        let input = format!("x{BLOCK_START}y");
        assert_eq!(
            convert_text_to_units(&input),
            vec![ContentUnit::Text(input.clone())]
        );
    }
}
