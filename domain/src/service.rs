use std::ops::Range;

use crate::PiiEntity;

/// Replace every detected entity span in `source_text` with a
/// `[REDACTED_<CATEGORY>]` placeholder.
///
/// Spans are applied in descending offset order so offsets of spans that are
/// still pending stay valid; the stable sort keeps input order for equal
/// offsets, which makes the output deterministic. Spans are code point
/// indexed. Overlapping spans are applied best-effort against the current
/// text: the result may interleave placeholder fragments but never splits a
/// char boundary and never panics.
pub fn redact(source_text: &str, entities: &[PiiEntity]) -> String {
    if entities.is_empty() {
        return source_text.to_owned();
    }

    let mut order: Vec<&PiiEntity> = entities.iter().collect();
    order.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut text = source_text.to_owned();
    for entity in order {
        let Some(range) = byte_range(&text, entity.offset, entity.length) else {
            continue;
        };
        text.replace_range(range, &placeholder(&entity.category));
    }
    text
}

pub fn placeholder(category: &str) -> String {
    format!("[REDACTED_{}]", category.to_uppercase())
}

/// Byte bounds of the code point span `[offset, offset + length)` in `text`.
/// A span starting past the end of the text yields `None`; a span running
/// past the end clamps to it.
fn byte_range(text: &str, offset: usize, length: usize) -> Option<Range<usize>> {
    if length == 0 {
        return None;
    }
    let mut bounds: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
    bounds.push(text.len());

    let start = *bounds.get(offset)?;
    let end = offset
        .checked_add(length)
        .map(|end| bounds.get(end).copied().unwrap_or(text.len()))?;
    Some(start..end)
}
