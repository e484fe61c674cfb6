// src/diff.rs

//! Line-level diff between two revisions of one file.
//!
//! The edit script is a minimal Myers diff, so identical lines are matched by
//! position and matched pairs never cross.

use similar::{capture_diff_slices, Algorithm, DiffTag};

/// One entry of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Old line `old` survives as new line `new`
    Equal { old: usize, new: usize },
    /// New line `new` did not exist in the old revision
    Insert { new: usize },
    /// Old line `old` is gone from the new revision
    Delete { old: usize },
}

pub type EditScript = Vec<EditOp>;

/// Split file content into lines the way the diff sees them.
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(String::from).collect()
}

/// Diff two revisions of a file. `None` means the file does not exist on that
/// side, which diffs like empty content.
pub fn diff_lines(old: Option<&[String]>, new: Option<&[String]>) -> EditScript {
    let old = old.unwrap_or(&[]);
    let new = new.unwrap_or(&[]);

    // Creation and deletion need no alignment
    if old.is_empty() {
        return (0..new.len()).map(|new| EditOp::Insert { new }).collect();
    }
    if new.is_empty() {
        return (0..old.len()).map(|old| EditOp::Delete { old }).collect();
    }

    let mut script = Vec::with_capacity(old.len().max(new.len()));
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                script.extend(
                    old_range
                        .zip(new_range)
                        .map(|(old, new)| EditOp::Equal { old, new }),
                );
            }
            DiffTag::Delete => script.extend(old_range.map(|old| EditOp::Delete { old })),
            DiffTag::Insert => script.extend(new_range.map(|new| EditOp::Insert { new })),
            DiffTag::Replace => {
                script.extend(old_range.map(|old| EditOp::Delete { old }));
                script.extend(new_range.map(|new| EditOp::Insert { new }));
            }
        }
    }
    script
}

/// Check that a script reconciles exactly `old_len` old lines with `new_len`
/// new lines, each index used once and in order.
pub fn validate(script: &[EditOp], old_len: usize, new_len: usize) -> Result<(), String> {
    let mut next_old = 0;
    let mut next_new = 0;

    for op in script {
        let (old, new) = match *op {
            EditOp::Equal { old, new } => (Some(old), Some(new)),
            EditOp::Insert { new } => (None, Some(new)),
            EditOp::Delete { old } => (Some(old), None),
        };
        if let Some(old) = old {
            if old != next_old {
                return Err(format!("old line {} out of order, expected {}", old, next_old));
            }
            next_old += 1;
        }
        if let Some(new) = new {
            if new != next_new {
                return Err(format!("new line {} out of order, expected {}", new, next_new));
            }
            next_new += 1;
        }
    }

    if next_old != old_len {
        return Err(format!(
            "script covers {} old lines but {} are tracked",
            next_old, old_len
        ));
    }
    if next_new != new_len {
        return Err(format!(
            "script covers {} new lines but the file has {}",
            next_new, new_len
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_insert_in_the_middle() {
        let old = lines(&["line1", "line2"]);
        let new = lines(&["line1", "line in the middle", "line2"]);

        let script = diff_lines(Some(&old), Some(&new));
        assert_eq!(
            script,
            vec![
                EditOp::Equal { old: 0, new: 0 },
                EditOp::Insert { new: 1 },
                EditOp::Equal { old: 1, new: 2 },
            ]
        );
    }

    #[test]
    fn test_created_and_deleted_files() {
        let content = lines(&["a", "b"]);
        assert_eq!(
            diff_lines(None, Some(&content)),
            vec![EditOp::Insert { new: 0 }, EditOp::Insert { new: 1 }]
        );
        assert_eq!(
            diff_lines(Some(&content), None),
            vec![EditOp::Delete { old: 0 }, EditOp::Delete { old: 1 }]
        );
        assert!(diff_lines(None, None).is_empty());
    }

    #[test]
    fn test_duplicates_matched_positionally() {
        let old = lines(&["x", "dup", "dup", "y"]);
        let new = lines(&["x", "dup", "y"]);

        let script = diff_lines(Some(&old), Some(&new));
        let equal = script
            .iter()
            .filter(|op| matches!(op, EditOp::Equal { .. }))
            .count();
        let deleted = script
            .iter()
            .filter(|op| matches!(op, EditOp::Delete { .. }))
            .count();

        assert_eq!(equal, 3);
        assert_eq!(deleted, 1);
        assert!(validate(&script, old.len(), new.len()).is_ok());
    }

    #[test]
    fn test_replacement_is_delete_then_insert() {
        let old = lines(&["keep", "old"]);
        let new = lines(&["keep", "new"]);

        let script = diff_lines(Some(&old), Some(&new));
        assert_eq!(
            script,
            vec![
                EditOp::Equal { old: 0, new: 0 },
                EditOp::Delete { old: 1 },
                EditOp::Insert { new: 1 },
            ]
        );
    }

    #[test]
    fn test_validate_rejects_mismatched_length() {
        let script = vec![EditOp::Equal { old: 0, new: 0 }];
        assert!(validate(&script, 1, 1).is_ok());
        assert!(validate(&script, 2, 1).is_err());
        assert!(validate(&script, 1, 2).is_err());

        let skipping = vec![EditOp::Delete { old: 1 }];
        assert!(validate(&skipping, 2, 0).is_err());
    }

    #[test]
    fn test_split_lines_ignores_trailing_newline() {
        assert_eq!(split_lines("a\nb\n"), lines(&["a", "b"]));
        assert_eq!(split_lines("a\r\nb"), lines(&["a", "b"]));
        assert!(split_lines("").is_empty());
    }
}
