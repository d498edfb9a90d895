//! Round-robin cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared round-robin position.
///
/// One counter serves every request. Its value is taken modulo the size of
/// whatever candidate set the caller holds, so the same value can land on
/// different backends as availability changes.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position without advancing.
    pub fn position(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }

    /// Claim the current position and advance by one.
    pub fn advance(&self) -> usize {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

/// Candidate selected by `position`, with its index.
pub fn pick<T>(candidates: &[T], position: usize) -> Option<(usize, &T)> {
    if candidates.is_empty() {
        return None;
    }
    let index = position % candidates.len();
    Some((index, &candidates[index]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin() {
        let rr = RoundRobin::new();
        let backends = ["b1", "b2"];

        let s1 = pick(&backends, rr.advance()).unwrap();
        assert_eq!(*s1.1, "b1");

        let s2 = pick(&backends, rr.advance()).unwrap();
        assert_eq!(*s2.1, "b2");

        let s3 = pick(&backends, rr.advance()).unwrap();
        assert_eq!(*s3.1, "b1");
        assert_eq!(rr.position(), 3);
    }

    #[test]
    fn same_position_maps_by_current_set_size() {
        assert_eq!(pick(&["a", "b", "c"], 4), Some((1, &"b")));
        assert_eq!(pick(&["a", "b"], 4), Some((0, &"a")));
        assert_eq!(pick::<&str>(&[], 4), None);
    }
}
