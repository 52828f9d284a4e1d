use std::cmp::Ordering;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::utils::format_duration;

/// Running tally of optimiser cycles.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub successes: usize,
    pub ties: usize,
    pub fails: usize,
    pub improvement: u64,
    pub expense: u64,
    pub path_time: Duration,
    pub cluster_time: Duration,
}

impl State {
    /// Records `original - found` and returns whether the cycle improved.
    pub fn record(&mut self, diff: i64) -> bool {
        match diff.cmp(&0) {
            Ordering::Greater => {
                self.successes += 1;
                self.improvement += diff as u64;
                true
            }
            Ordering::Equal => {
                self.ties += 1;
                false
            }
            Ordering::Less => {
                self.fails += 1;
                self.expense += diff.unsigned_abs();
                false
            }
        }
    }

    /// A cycle whose every trial broke the capacity.
    pub fn record_infeasible(&mut self) {
        self.fails += 1;
    }

    pub fn cycles(&self) -> usize {
        self.successes + self.ties + self.fails
    }

    pub fn dump(&self, cycle: usize, total_time: u32) -> Checkpoint {
        Checkpoint {
            recorded_at: Utc::now().to_rfc3339(),
            cycle,
            successes: self.successes,
            ties: self.ties,
            fails: self.fails,
            improvement: self.improvement,
            expense: self.expense,
            path_ms: self.path_time.as_millis() as u64,
            cluster_ms: self.cluster_time.as_millis() as u64,
            total_time,
        }
    }
}

/// Snapshot of the optimiser written every check interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub recorded_at: String,
    pub cycle: usize,
    pub successes: usize,
    pub ties: usize,
    pub fails: usize,
    pub improvement: u64,
    pub expense: u64,
    pub path_ms: u64,
    pub cluster_ms: u64,
    pub total_time: u32,
}

impl Checkpoint {
    pub fn log(&self) {
        info!(
            cycle = self.cycle,
            path_time = %format_duration(Duration::from_millis(self.path_ms)),
            cluster_time = %format_duration(Duration::from_millis(self.cluster_ms)),
            "successes={} ties={} fails={} sum={} improvement={} expense={} total_time={}",
            self.successes,
            self.ties,
            self.fails,
            self.successes + self.ties + self.fails,
            self.improvement,
            self.expense,
            self.total_time
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_positive_differences_are_successes() {
        let mut state = State::default();
        assert!(state.record(7));
        assert!(!state.record(0));
        assert!(!state.record(-4));
        assert_eq!((state.successes, state.ties, state.fails), (1, 1, 1));
        assert_eq!((state.improvement, state.expense), (7, 4));
        assert_eq!(state.dump(100, 55).cycle, 100);
    }

    #[test]
    fn checkpoints_serialize_as_csv_rows() {
        let mut state = State::default();
        state.record(3);
        let checkpoint = state.dump(10, 42);

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(&checkpoint).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("recorded_at,cycle,successes,ties,fails,improvement,expense,path_ms,cluster_ms,total_time")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(&checkpoint.recorded_at));
        assert!(row.ends_with(",10,1,0,0,3,0,0,0,42"));
    }
}
