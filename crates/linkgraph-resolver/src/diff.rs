//! Line-level change magnitude.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Largest LCS table, in cells, computed before falling back to line counts.
pub const MAX_LCS_CELLS: usize = 4_000_000;

/// Lines added and removed between two texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDiff {
    /// Lines only in the new text
    pub added: usize,
    /// Lines only in the old text
    pub removed: usize,
}

impl LineDiff {
    /// Compare `old` and `new` line by line.
    ///
    /// Counts come from the longest common subsequence of lines, after the
    /// common prefix and suffix are set aside. When the remaining middles
    /// would need more than [`MAX_LCS_CELLS`] cells, lines are matched by
    /// occurrence count instead, so reordered lines count as unchanged.
    pub fn between(old: &str, new: &str) -> Self {
        let old: Vec<&str> = old.lines().collect();
        let new: Vec<&str> = new.lines().collect();

        let prefix = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(new[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        let old_mid = &old[prefix..old.len() - suffix];
        let new_mid = &new[prefix..new.len() - suffix];
        let common = if old_mid.len().saturating_mul(new_mid.len()) > MAX_LCS_CELLS {
            shared_line_count(old_mid, new_mid)
        } else {
            lcs_len(old_mid, new_mid)
        };

        Self {
            added: new_mid.len() - common,
            removed: old_mid.len() - common,
        }
    }

    /// Whether the texts have the same lines
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} -{} lines", self.added, self.removed)
    }
}

fn lcs_len(a: &[&str], b: &[&str]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for line in a {
        for (j, other) in b.iter().enumerate() {
            row[j + 1] = if line == other {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

fn shared_line_count(a: &[&str], b: &[&str]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in a {
        *counts.entry(*line).or_default() += 1;
    }
    b.iter()
        .filter(|line| match counts.get_mut(*line) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let old = "a\nb\nc\nd\n";
        let new = "a\nB\nc\nd\ne\n";
        let diff = LineDiff::between(old, new);
        assert_eq!(diff, LineDiff { added: 2, removed: 1 });
        assert_eq!(diff.to_string(), "+2 -1 lines");
    }

    #[test]
    fn test_created_and_deleted() {
        assert_eq!(LineDiff::between("", "x\ny\n").to_string(), "+2 -0 lines");
        assert_eq!(LineDiff::between("x\ny\n", "").to_string(), "+0 -2 lines");
        assert!(LineDiff::between("same\n", "same\n").is_empty());
    }

    #[test]
    fn test_moved_line() {
        let diff = LineDiff::between("a\nb\nc\n", "b\nc\na\n");
        assert_eq!(diff, LineDiff { added: 1, removed: 1 });
    }

    #[test]
    fn test_large_rewrite_uses_line_counts() {
        let old: String = (0..3000).map(|i| format!("line {i}\n")).collect();
        let new: String = (0..3000)
            .map(|i| {
                if i % 10 == 0 {
                    format!("edit {i}\n")
                } else {
                    format!("line {i}\n")
                }
            })
            .collect();
        assert_eq!(
            LineDiff::between(&old, &new),
            LineDiff { added: 300, removed: 300 }
        );

        let reversed: String = (0..3000).rev().map(|i| format!("line {i}\n")).collect();
        assert!(LineDiff::between(&old, &reversed).is_empty());
    }
}
