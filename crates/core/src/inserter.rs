use crate::filename::{byte_offset, char_len};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOp {
    pub position: i64,
    pub text: String,
}

impl InsertOp {
    pub fn new(position: i64, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

pub fn resolve_position(position: i64, len: usize) -> usize {
    let resolved = if position >= 0 {
        position
    } else {
        len as i64 + 1 + position
    };
    resolved.clamp(0, len as i64) as usize
}

/// Inserts every op at its position in the original `stem`, regardless of list order.
///
/// Ops are applied in ascending position order (stable for ties) and each one is
/// shifted right by the length of the text already inserted before it.
pub fn apply_insertions(stem: &str, ops: &[InsertOp]) -> String {
    let len = char_len(stem);
    let mut resolved: Vec<(usize, &str)> = ops
        .iter()
        .map(|op| (resolve_position(op.position, len), op.text.as_str()))
        .collect();
    resolved.sort_by_key(|(position, _)| *position);

    let mut value = stem.to_string();
    let mut offset = 0usize;
    for (position, text) in resolved {
        let at = byte_offset(&value, position + offset);
        value.insert_str(at, text);
        offset += char_len(text);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_refer_to_the_original_stem() {
        let ops = vec![InsertOp::new(0, "X"), InsertOp::new(2, "Y")];
        assert_eq!(apply_insertions("abcd", &ops), "XabYcd");

        let reversed = vec![InsertOp::new(2, "Y"), InsertOp::new(0, "X")];
        assert_eq!(apply_insertions("abcd", &reversed), "XabYcd");
    }

    #[test]
    fn negative_positions_count_from_the_end() {
        assert_eq!(resolve_position(-1, 4), 4);
        assert_eq!(apply_insertions("abcd", &[InsertOp::new(-1, "_end")]), "abcd_end");
        assert_eq!(apply_insertions("abcd", &[InsertOp::new(-2, "-")]), "abc-d");
    }

    #[test]
    fn ties_keep_list_order() {
        let ops = vec![InsertOp::new(1, "1"), InsertOp::new(1, "2"), InsertOp::new(-3, "3")];
        assert_eq!(apply_insertions("abc", &ops), "a123bc");
    }

    #[test]
    fn out_of_range_positions_are_clamped() {
        assert_eq!(apply_insertions("ab", &[InsertOp::new(10, "Z")]), "abZ");
        assert_eq!(apply_insertions("ab", &[InsertOp::new(-10, "Z")]), "Zab");
    }

    #[test]
    fn multibyte_text_shifts_by_chars() {
        let ops = vec![InsertOp::new(0, "写真_"), InsertOp::new(2, "-")];
        assert_eq!(apply_insertions("ab01", &ops), "写真_ab-01");
    }
}
