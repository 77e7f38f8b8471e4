use crate::FieldState;

/// A field state tagged with the simulated time it was recorded at.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub time: f64,
    pub field: FieldState,
}

impl Snapshot {
    #[must_use]
    pub fn new(time: f64, field: FieldState) -> Self {
        Self { time, field }
    }
}

/// The ordered snapshots produced by one solve run.
///
/// A trace is assembled by a solver and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Trace {
    snapshots: Vec<Snapshot>,
}

impl Trace {
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// The snapshot times in recording order.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.time).collect()
    }

    /// Number of points per snapshot, or 0 for an empty trace.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.snapshots.first().map_or(0, |s| s.field.len())
    }

    /// `(snapshot count, point count)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.point_count())
    }

    /// Finite minimum and maximum across every snapshot.
    ///
    /// Non-finite values are skipped. Returns `None` if no finite value exists.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.snapshots
            .iter()
            .flat_map(|s| s.field.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Consumes the trace and returns its snapshots.
    #[must_use]
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

impl From<Vec<Snapshot>> for Trace {
    fn from(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }
}

impl FromIterator<Snapshot> for Trace {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        Self {
            snapshots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace() -> Trace {
        Trace::from(vec![
            Snapshot::new(0.0, FieldState::from(vec![0.0, 1.0, 0.0])),
            Snapshot::new(0.5, FieldState::from(vec![0.0, f64::NAN, 2.0])),
            Snapshot::new(1.0, FieldState::from(vec![-1.0, 0.5, 0.0])),
        ])
    }

    #[test]
    fn shape_and_times() {
        let trace = trace();
        assert_eq!(trace.shape(), (3, 3));
        assert_eq!(trace.times(), [0.0, 0.5, 1.0]);
        assert_eq!(trace.last().unwrap().field[0], -1.0);
    }

    #[test]
    fn value_range_skips_non_finite() {
        assert_eq!(trace().value_range(), Some((-1.0, 2.0)));
    }

    #[test]
    fn empty_trace() {
        let trace = Trace::default();
        assert!(trace.is_empty());
        assert_eq!(trace.shape(), (0, 0));
        assert_eq!(trace.value_range(), None);
    }
}
