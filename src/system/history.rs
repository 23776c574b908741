use std::collections::VecDeque;

use serde::Serialize;

pub const HISTORY_LEN: usize = 100;

/// Fixed-length window of utilization ratios, oldest first.
///
/// Starts out as `HISTORY_LEN` zeros; every push evicts the oldest sample,
/// so the length never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySeries {
    samples: VecDeque<f64>,
}

impl HistorySeries {
    pub fn new() -> Self {
        Self {
            samples: std::iter::repeat_n(0.0, HISTORY_LEN).collect(),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.samples.len() == HISTORY_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `index` 0 is the oldest sample.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied()
    }

    pub fn latest(&self) -> f64 {
        self.samples.back().copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl Default for HistorySeries {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySet {
    pub cpu: HistorySeries,
    pub memory: HistorySeries,
    pub disk: HistorySeries,
}
