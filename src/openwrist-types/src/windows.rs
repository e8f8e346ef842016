use serde::{Deserialize, Serialize};

/// Half-open `[start, stop)` range of epoch indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexWindow {
    pub start: usize,
    pub stop: usize,
}

impl IndexWindow {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overlap of the two windows, `None` when they do not overlap.
    pub fn intersect(&self, other: &IndexWindow) -> Option<IndexWindow> {
        let start = self.start.max(other.start);
        let stop = self.stop.min(other.stop);
        (start < stop).then_some(IndexWindow { start, stop })
    }

    /// Parts of `self` not covered by `other`, in order.
    pub fn subtract(&self, other: &IndexWindow) -> Vec<IndexWindow> {
        let Some(overlap) = self.intersect(other) else {
            return if self.is_empty() { vec![] } else { vec![*self] };
        };

        [
            IndexWindow::new(self.start, overlap.start),
            IndexWindow::new(overlap.stop, self.stop),
        ]
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect()
    }
}

impl From<[usize; 2]> for IndexWindow {
    fn from([start, stop]: [usize; 2]) -> Self {
        Self { start, stop }
    }
}

/// Total sleep opportunity for one day: unix timestamps and epoch indices
/// into the recording.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TsoWindow {
    pub start_timestamp: f64,
    pub stop_timestamp: f64,
    pub start: usize,
    pub stop: usize,
}

impl TsoWindow {
    pub fn indices(&self) -> IndexWindow {
        IndexWindow::new(self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping() {
        let a = IndexWindow::new(0, 10);
        let b = IndexWindow::new(5, 20);
        assert_eq!(a.intersect(&b), Some(IndexWindow::new(5, 10)));
        assert_eq!(b.intersect(&a), Some(IndexWindow::new(5, 10)));
    }

    #[test]
    fn intersect_touching_is_none() {
        let a = IndexWindow::new(0, 10);
        let b = IndexWindow::new(10, 20);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn subtract_middle_splits() {
        let day = IndexWindow::new(0, 100);
        let tso = IndexWindow::new(40, 60);
        assert_eq!(
            day.subtract(&tso),
            vec![IndexWindow::new(0, 40), IndexWindow::new(60, 100)]
        );
    }

    #[test]
    fn subtract_covering_is_empty() {
        let block = IndexWindow::new(45, 55);
        let tso = IndexWindow::new(40, 60);
        assert!(block.subtract(&tso).is_empty());
    }

    #[test]
    fn subtract_disjoint_keeps_self() {
        let block = IndexWindow::new(0, 10);
        let tso = IndexWindow::new(40, 60);
        assert_eq!(block.subtract(&tso), vec![block]);
    }

    #[test]
    fn inverted_window_is_empty() {
        assert!(IndexWindow::new(10, 5).is_empty());
        assert_eq!(IndexWindow::new(10, 5).len(), 0);
    }
}
