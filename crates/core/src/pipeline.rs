use crate::filename::split_filename;
use crate::inserter::{apply_insertions, InsertOp};
use crate::remover::{apply_removals, RangeError, RemoveRange};
use crate::replacer::{apply_replacements, ReplaceOp};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Filename edits applied to every selected file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRules {
    #[serde(default)]
    pub replace: Vec<ReplaceOp>,
    #[serde(default)]
    pub remove: Vec<RemoveRange>,
    #[serde(default)]
    pub insert: Vec<InsertOp>,
    #[serde(default)]
    pub replace_first: bool,
    #[serde(default)]
    pub include_extension: bool,
}

impl RenameRules {
    pub fn is_empty(&self) -> bool {
        self.replace.is_empty() && self.remove.is_empty() && self.insert.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformed {
    pub name: String,
    pub rejected_ranges: Vec<RangeError>,
}

/// Runs replace, remove and insert over the stem, then reattaches the extension.
pub fn transform(filename: &str, rules: &RenameRules) -> Transformed {
    let (stem, extension) = split_filename(filename, rules.include_extension);

    let replaced = apply_replacements(stem, &rules.replace, rules.replace_first);
    let (trimmed, rejected_ranges) = apply_removals(&replaced, &rules.remove);
    let mut name = apply_insertions(&trimmed, &rules.insert);
    name.push_str(extension);

    Transformed {
        name,
        rejected_ranges,
    }
}

/// Reads a TOML rules file, e.g.
///
/// ```toml
/// replace_first = false
/// replace = [{ old = "IMG", new = "PHOTO" }]
/// remove = [{ start = -3, end = -1 }]
/// insert = [{ position = 0, text = "2024_" }]
/// ```
pub fn load_rules(path: &Path) -> Result<RenameRules> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;
    let rules = toml::from_str::<RenameRules>(&raw)
        .with_context(|| format!("failed to parse rules file: {}", path.display()))?;
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn photo_prefix_scenario() {
        let rules = RenameRules {
            replace: vec![ReplaceOp::new("IMG", "PHOTO")],
            insert: vec![InsertOp::new(0, "2024_")],
            ..RenameRules::default()
        };
        let out = transform("IMG0001.jpg", &rules);
        assert_eq!(out.name, "2024_PHOTO0001.jpg");
        assert!(out.rejected_ranges.is_empty());
    }

    #[test]
    fn stages_run_replace_then_remove_then_insert() {
        let rules = RenameRules {
            replace: vec![ReplaceOp::new("_", "")],
            remove: vec![RemoveRange::new(0, 3)],
            insert: vec![InsertOp::new(-1, "_v2")],
            ..RenameRules::default()
        };
        assert_eq!(transform("DSC_1234.png", &rules).name, "1234_v2.png");
    }

    #[test]
    fn extension_is_untouched_unless_included() {
        let rules = RenameRules {
            replace: vec![ReplaceOp::new("jpg", "jpeg")],
            ..RenameRules::default()
        };
        assert_eq!(transform("jpg_scan.jpg", &rules).name, "jpeg_scan.jpg");

        let rules = RenameRules {
            include_extension: true,
            ..rules
        };
        assert_eq!(transform("jpg_scan.jpg", &rules).name, "jpeg_scan.jpeg");
    }

    #[test]
    fn negative_indices_resolve_against_the_stem() {
        let rules = RenameRules {
            remove: vec![RemoveRange::new(-4, -1)],
            ..RenameRules::default()
        };
        assert_eq!(transform("report_old.txt", &rules).name, "report_.txt");
    }

    #[test]
    fn rejected_ranges_are_reported_and_skipped() {
        let rules = RenameRules {
            remove: vec![RemoveRange::new(-1, 2)],
            insert: vec![InsertOp::new(0, "x")],
            ..RenameRules::default()
        };
        let out = transform("abcde.txt", &rules);
        assert_eq!(out.name, "xabcde.txt");
        assert_eq!(out.rejected_ranges, vec![RangeError::MixedSign { start: -1, end: 2 }]);
    }

    #[test]
    fn load_rules_reads_toml() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("rules.toml");
        fs::write(
            &path,
            r#"
replace_first = true
replace = [{ old = "IMG", new = "PHOTO" }]
remove = [{ start = -3, end = -1 }]
insert = [{ position = 0, text = "2024_" }]
"#,
        )
        .expect("write rules");

        let rules = load_rules(&path).expect("rules should parse");
        assert!(rules.replace_first);
        assert!(!rules.include_extension);
        assert_eq!(rules.replace, vec![ReplaceOp::new("IMG", "PHOTO")]);
        assert_eq!(rules.remove, vec![RemoveRange::new(-3, -1)]);
        assert_eq!(rules.insert, vec![InsertOp::new(0, "2024_")]);
    }

    #[test]
    fn load_rules_reports_parse_errors() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("rules.toml");
        fs::write(&path, "replace = 3").expect("write rules");

        let err = load_rules(&path).expect_err("invalid rules must fail");
        assert!(err.to_string().contains("failed to parse rules file"));
    }
}
