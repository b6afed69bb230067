//! Iterative enumeration of one side of a two-way partition
//!
//! Candidates are produced in the same order a recursive backtracking search
//! would visit them, with an explicit stack in place of recursion.

/// Depth-first generator of `team_size`-element index sets over `0..pool_size`.
///
/// When `separate_top` is set, index 1 is never added to a set holding index 0
/// and vice versa. Sets are yielded in ascending lexicographic order.
#[derive(Debug, Clone)]
pub struct PartitionSearch {
    pool_size: usize,
    team_size: usize,
    separate_top: bool,
    chosen: Vec<usize>,
    /// Leading entries of `chosen` that are pinned and never backtracked
    pinned: usize,
    cursor: usize,
    done: bool,
}

impl PartitionSearch {
    pub fn new(pool_size: usize, team_size: usize, separate_top: bool) -> Self {
        Self {
            pool_size,
            team_size,
            separate_top,
            chosen: Vec::with_capacity(team_size),
            pinned: 0,
            cursor: 0,
            done: team_size > pool_size,
        }
    }

    /// Like [`PartitionSearch::new`] but with index 0 fixed in every set
    pub fn with_top_pinned(pool_size: usize, team_size: usize, separate_top: bool) -> Self {
        let mut search = Self::new(pool_size, team_size, separate_top);
        if team_size == 0 || pool_size == 0 {
            search.done = true;
            return search;
        }
        search.chosen.push(0);
        search.pinned = 1;
        search.cursor = 1;
        search
    }

    fn excluded(&self, index: usize) -> bool {
        self.separate_top
            && ((index == 1 && self.chosen.contains(&0)) || (index == 0 && self.chosen.contains(&1)))
    }

    /// Pop the deepest unpinned choice and resume after it
    fn backtrack(&mut self) -> bool {
        if self.chosen.len() <= self.pinned {
            return false;
        }
        match self.chosen.pop() {
            Some(last) => {
                self.cursor = last + 1;
                true
            }
            None => false,
        }
    }
}

impl Iterator for PartitionSearch {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if self.chosen.len() == self.team_size {
                let leaf = self.chosen.clone();
                if !self.backtrack() {
                    self.done = true;
                }
                return Some(leaf);
            }

            let need = self.team_size - self.chosen.len();
            if self.cursor + need > self.pool_size {
                if !self.backtrack() {
                    self.done = true;
                }
                continue;
            }

            let index = self.cursor;
            self.cursor += 1;
            if self.excluded(index) {
                continue;
            }
            self.chosen.push(index);
        }
    }
}
