//! Hunks: runs of changes padded with context lines
//!
//! Every change gets up to `HUNK_CONTEXT` unchanged lines on each side.
//! Changes whose context windows touch or overlap end up in the same hunk.

use crate::artifacts::diff::myers::Edit;
use std::cmp::min;
use std::fmt::Display;

pub const HUNK_CONTEXT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Split an edit script into hunks. An unchanged script has none.
    pub fn build(edits: &[Edit<T>]) -> Vec<Self> {
        let mut hunks = Vec::new();
        let mut offset = 0;

        while let Some(first_change) = edits[offset..].iter().position(|e| !e.is_equal()) {
            let first_change = offset + first_change;
            let start = first_change.saturating_sub(HUNK_CONTEXT);

            // end of the last change that still belongs to this hunk
            let mut end = first_change + 1;
            for (at, edit) in edits.iter().enumerate().skip(end) {
                if !edit.is_equal() {
                    end = at + 1;
                } else if at - end >= 2 * HUNK_CONTEXT {
                    break;
                }
            }

            let stop = min(end + HUNK_CONTEXT, edits.len());
            hunks.push(Hunk {
                edits: edits[start..stop].to_vec(),
            });
            offset = stop;
        }

        hunks
    }
}

impl<T> Hunk<T> {
    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    /// First old-side line covered, 0 when the old side is empty
    pub fn a_start(&self) -> usize {
        self.edits.iter().find_map(Edit::a_line).unwrap_or(0)
    }

    pub fn b_start(&self) -> usize {
        self.edits.iter().find_map(Edit::b_line).unwrap_or(0)
    }

    pub fn a_size(&self) -> usize {
        self.edits.iter().filter(|e| e.a_line().is_some()).count()
    }

    pub fn b_size(&self) -> usize {
        self.edits.iter().filter(|e| e.b_line().is_some()).count()
    }

    /// `@@ -a_start,a_size +b_start,b_size @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start(),
            self.a_size(),
            self.b_start(),
            self.b_size()
        )
    }
}

impl<T: Display> Display for Hunk<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header())?;
        for edit in &self.edits {
            writeln!(f, "{edit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::diff::myers::{DiffAlgorithm, MyersDiff};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn lines(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
        range.map(|i| format!("line {i}")).collect()
    }

    fn hunks(a: &[String], b: &[String]) -> Vec<Hunk<String>> {
        Hunk::build(&MyersDiff::new(a, b).diff())
    }

    #[test]
    fn single_replacement_makes_one_hunk() {
        let a = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let b = vec!["a".to_string(), "x".to_string(), "c".to_string()];

        let hunks = hunks(&a, &b);

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header(), "@@ -1,3 +1,3 @@");
        assert_eq!(hunks[0].to_string(), "@@ -1,3 +1,3 @@\n a\n-b\n+x\n c\n");
    }

    #[test]
    fn unchanged_input_has_no_hunks() {
        let a = lines(1..=5);

        assert!(hunks(&a, &a).is_empty());
    }

    #[test]
    fn trims_context_to_three_lines() {
        let a = lines(1..=20);
        let mut b = a.clone();
        b[9] = "changed".into();

        let hunks = hunks(&a, &b);

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header(), "@@ -7,7 +7,7 @@");
    }

    #[rstest]
    #[case(6, 1)]
    #[case(7, 2)]
    fn merges_hunks_whose_context_touches(#[case] gap: usize, #[case] expected: usize) {
        let a = lines(1..=30);
        let mut b = a.clone();
        b[5] = "first".into();
        b[5 + gap + 1] = "second".into();

        assert_eq!(hunks(&a, &b).len(), expected);
    }

    #[test]
    fn new_file_starts_at_zero() {
        let hunks = hunks(&[], &lines(1..=2));

        assert_eq!(hunks[0].header(), "@@ -0,0 +1,2 @@");
    }
}
