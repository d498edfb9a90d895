//! Bounded failover over a candidate set.
//!
//! # Responsibilities
//! - Pick the candidate for each attempt from the shared cursor position
//! - Track attempts and shrink the local candidate list on rejections
//! - Decide when the request has run out of options
//!
//! # Design Decisions
//! - Pure state machine: no I/O, no clock, no shared state
//! - A rejection (non-200) drops the candidate for this request only
//! - An unreachable candidate stays eligible for a later attempt

use crate::routing::round_robin::pick;

/// Result of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// HTTP 200; the request is served.
    Success,
    /// The backend answered with a non-200 status.
    Rejected,
    /// Transport error or timeout.
    Unreachable,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::Rejected => "rejected",
            AttemptOutcome::Unreachable => "unreachable",
        }
    }
}

/// Per-request retry state over a local copy of the candidates.
#[derive(Debug, Clone)]
pub struct FailoverPlan<T> {
    candidates: Vec<T>,
    attempts: u32,
    max_attempts: u32,
    served: bool,
}

impl<T> FailoverPlan<T> {
    pub fn new(candidates: Vec<T>, max_attempts: u32) -> Self {
        Self {
            candidates,
            attempts: 0,
            max_attempts,
            served: false,
        }
    }

    /// No further attempt may be made.
    pub fn is_exhausted(&self) -> bool {
        self.served || self.attempts >= self.max_attempts || self.candidates.is_empty()
    }

    /// Candidate for the attempt at cursor `position`.
    pub fn select(&self, position: usize) -> Option<(usize, &T)> {
        if self.is_exhausted() {
            return None;
        }
        pick(&self.candidates, position)
    }

    /// Record the outcome of the attempt made against `index`.
    pub fn record(&mut self, index: usize, outcome: AttemptOutcome) {
        self.attempts += 1;
        match outcome {
            AttemptOutcome::Success => self.served = true,
            AttemptOutcome::Rejected => {
                if index < self.candidates.len() {
                    self.candidates.remove(index);
                }
            }
            AttemptOutcome::Unreachable => {}
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Candidates still eligible for this request.
    pub fn remaining(&self) -> &[T] {
        &self.candidates
    }

    pub fn is_served(&self) -> bool {
        self.served
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a plan to completion; returns visited candidates and the final cursor.
    fn run<F>(candidates: &[&'static str], start: usize, max: u32, mut outcome: F) -> (Vec<&'static str>, usize, bool)
    where
        F: FnMut(&str) -> AttemptOutcome,
    {
        let mut plan = FailoverPlan::new(candidates.to_vec(), max);
        let mut cursor = start;
        let mut visited = Vec::new();

        while let Some((index, candidate)) = plan.select(cursor) {
            let candidate = *candidate;
            cursor += 1;
            visited.push(candidate);
            plan.record(index, outcome(candidate));
        }
        (visited, cursor, plan.is_served())
    }

    #[test]
    fn success_on_first_attempt() {
        let (visited, cursor, served) = run(&["s1", "s2"], 0, 3, |_| AttemptOutcome::Success);
        assert_eq!(visited, ["s1"]);
        assert_eq!(cursor, 1);
        assert!(served);
    }

    #[test]
    fn rejection_fails_over_to_next_candidate() {
        let (visited, _, served) = run(&["s1", "s2", "s4"], 0, 3, |c| {
            if c == "s1" { AttemptOutcome::Rejected } else { AttemptOutcome::Success }
        });
        // s1 removed; cursor 1 over [s2, s4] lands on s4.
        assert_eq!(visited, ["s1", "s4"]);
        assert!(served);
    }

    #[test]
    fn rejections_empty_the_list_before_max_attempts() {
        let (visited, cursor, served) = run(&["s1", "s2"], 0, 3, |_| AttemptOutcome::Rejected);
        assert_eq!(visited.len(), 2);
        assert_eq!(cursor, 2);
        assert!(!served);
    }

    #[test]
    fn unreachable_candidate_can_be_retried() {
        let (visited, cursor, served) = run(&["s1"], 0, 3, |_| AttemptOutcome::Unreachable);
        assert_eq!(visited, ["s1", "s1", "s1"]);
        assert_eq!(cursor, 3);
        assert!(!served);
    }

    #[test]
    fn attempts_are_bounded() {
        let (visited, _, _) = run(&["a", "b", "c", "d", "e"], 7, 3, |_| AttemptOutcome::Unreachable);
        assert_eq!(visited, ["c", "d", "e"]);
    }

    #[test]
    fn rejections_are_bounded_by_max_attempts() {
        let (visited, cursor, served) = run(&["a", "b", "c", "d", "e"], 0, 3, |_| AttemptOutcome::Rejected);
        // a removed at 0, cursor 1 over [b..e] is c, cursor 2 over [b, d, e] is e.
        assert_eq!(visited, ["a", "c", "e"]);
        assert_eq!(cursor, 3);
        assert!(!served);
    }

    #[test]
    fn empty_plan_selects_nothing() {
        let plan: FailoverPlan<&str> = FailoverPlan::new(Vec::new(), 3);
        assert!(plan.is_exhausted());
        assert!(plan.select(0).is_none());
    }
}
