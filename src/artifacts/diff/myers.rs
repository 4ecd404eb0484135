//! Myers' O(ND) difference algorithm
//!
//! The forward pass records, for every edit distance `d`, how far along each
//! diagonal `k = x - y` the search got. The backward pass replays those
//! snapshots from the last depth to the first, recovering one edit per step.

use derive_new::new;
use std::fmt::Display;

/// One step of an edit script. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { a_line: usize, value: T },
    Insert { b_line: usize, value: T },
    Equal { a_line: usize, b_line: usize, value: T },
}

impl<T> Edit<T> {
    pub fn is_equal(&self) -> bool {
        matches!(self, Edit::Equal { .. })
    }

    pub fn a_line(&self) -> Option<usize> {
        match self {
            Edit::Delete { a_line, .. } | Edit::Equal { a_line, .. } => Some(*a_line),
            Edit::Insert { .. } => None,
        }
    }

    pub fn b_line(&self) -> Option<usize> {
        match self {
            Edit::Insert { b_line, .. } | Edit::Equal { b_line, .. } => Some(*b_line),
            Edit::Delete { .. } => None,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value, .. } | Edit::Insert { value, .. } | Edit::Equal { value, .. } => {
                value
            }
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Edit::Delete { .. } => '-',
            Edit::Insert { .. } => '+',
            Edit::Equal { .. } => ' ',
        }
    }
}

impl<T: Display> Display for Edit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.symbol(), self.value())
    }
}

pub trait DiffAlgorithm<T> {
    type Trace;
    type EditPath;

    fn compute_shortest_edit(&self) -> Self::Trace;
    fn backtrack(&self) -> Self::EditPath;
    fn diff(&self) -> Vec<Edit<T>>;
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T> MyersDiff<'_, T> {
    fn offset(&self) -> isize {
        (self.a.len() + self.b.len()) as isize
    }
}

impl<T: Eq + Clone> DiffAlgorithm<T> for MyersDiff<'_, T> {
    /// Frontier snapshot taken before each depth
    type Trace = Vec<Vec<isize>>;
    /// `(prev_x, prev_y, x, y)` moves, last move first
    type EditPath = Vec<(isize, isize, isize, isize)>;

    fn compute_shortest_edit(&self) -> Self::Trace {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = self.offset();

        // one spare slot so k = -d can look at k + 1 when d = 0
        let mut v = vec![0isize; 2 * offset as usize + 2];
        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            trace.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset + k) as usize;

                let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                    // moved down from k + 1: insertion
                    v[idx + 1]
                } else {
                    // moved right from k - 1: deletion
                    v[idx - 1] + 1
                };
                let mut y = x - k;

                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }
                v[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    fn backtrack(&self) -> Self::EditPath {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let offset = self.offset();
        let mut edit_path = Vec::new();

        for (d, v) in self.compute_shortest_edit().iter().enumerate().rev() {
            let d = d as isize;
            let k = x - y;
            let at = |k: isize| v[(offset + k) as usize];

            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = at(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edit_path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                edit_path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        edit_path
    }

    fn diff(&self) -> Vec<Edit<T>> {
        let mut diff = self
            .backtrack()
            .into_iter()
            .map(|(prev_x, prev_y, x, y)| {
                let (a_line, b_line) = (prev_x as usize + 1, prev_y as usize + 1);
                if x == prev_x {
                    Edit::Insert {
                        b_line,
                        value: self.b[prev_y as usize].clone(),
                    }
                } else if y == prev_y {
                    Edit::Delete {
                        a_line,
                        value: self.a[prev_x as usize].clone(),
                    }
                } else {
                    Edit::Equal {
                        a_line,
                        b_line,
                        value: self.a[prev_x as usize].clone(),
                    }
                }
            })
            .collect::<Vec<_>>();

        diff.reverse();
        diff
    }
}
