use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOp {
    pub old: String,
    pub new: String,
}

impl ReplaceOp {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Applies each op to the output of the previous one.
pub fn apply_replacements(stem: &str, ops: &[ReplaceOp], replace_first: bool) -> String {
    let mut value = stem.to_string();
    for op in ops {
        if op.old.is_empty() {
            continue;
        }
        value = if replace_first {
            value.replacen(&op.old, &op.new, 1)
        } else {
            value.replace(&op.old, &op.new)
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_apply_in_list_order() {
        let ops = vec![ReplaceOp::new("a", "x"), ReplaceOp::new("x", "y")];
        assert_eq!(apply_replacements("aab", &ops, false), "yyb");
    }

    #[test]
    fn replace_first_touches_one_occurrence_per_op() {
        let ops = vec![ReplaceOp::new("a", "x")];
        assert_eq!(apply_replacements("banana", &ops, true), "bxnana");
        assert_eq!(apply_replacements("banana", &ops, false), "bxnxnx");
    }

    #[test]
    fn replace_first_chains_through_ops() {
        let ops = vec![ReplaceOp::new("a", "x"), ReplaceOp::new("x", "y")];
        assert_eq!(apply_replacements("aab", &ops, true), "yab");
    }

    #[test]
    fn missing_and_empty_patterns_are_noops() {
        let ops = vec![ReplaceOp::new("zz", "y"), ReplaceOp::new("", "_")];
        assert_eq!(apply_replacements("IMG0001", &ops, false), "IMG0001");
    }
}
