//! Preference data derived from the observation history.

use crate::slider::Observation;

/// Points closer than this (Euclidean distance) are merged into one.
pub(crate) const MERGE_TOLERANCE: f64 = 1e-6;

/// One preference judgement: the point at `chosen` was preferred over every
/// point in `others`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    /// Index of the preferred point.
    pub chosen: usize,
    /// Indices of the points it was preferred over.
    pub others: Vec<usize>,
}

/// Deduplicated points plus the comparisons between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreferenceData {
    points: Vec<Vec<f64>>,
    comparisons: Vec<Comparison>,
}

impl PreferenceData {
    /// Creates an empty data set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds preference data from an observation history.
    ///
    /// Each observation contributes the chosen point and both original
    /// slider ends, and the judgement "chosen ≻ {orig_0, orig_1}". Replaying
    /// the same history always yields the same data, in the same order.
    #[must_use]
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut data = Self::new();
        for obs in observations {
            let chosen = obs.chosen_point();
            let slider = obs.slider();
            data.add_choice(chosen, &[slider.orig_0(), slider.orig_1()]);
        }
        data
    }

    /// Records that `chosen` was preferred over each of `others`.
    ///
    /// Returns the index of the chosen point. Points already present (within
    /// the merge tolerance) are reused, and `others` entries that coincide
    /// with the chosen point are dropped. A judgement with no remaining
    /// `others` adds its points but no comparison.
    pub fn add_choice(&mut self, chosen: Vec<f64>, others: &[&[f64]]) -> usize {
        let chosen_idx = self.insert_point(chosen);
        let mut other_idx = Vec::with_capacity(others.len());
        for other in others {
            let idx = self.insert_point(other.to_vec());
            if idx != chosen_idx && !other_idx.contains(&idx) {
                other_idx.push(idx);
            }
        }
        if !other_idx.is_empty() {
            self.comparisons.push(Comparison {
                chosen: chosen_idx,
                others: other_idx,
            });
        }
        chosen_idx
    }

    fn insert_point(&mut self, point: Vec<f64>) -> usize {
        if let Some(idx) = self.find_point(&point) {
            return idx;
        }
        self.points.push(point);
        self.points.len() - 1
    }

    /// Index of a stored point within the merge tolerance of `point`.
    #[must_use]
    pub fn find_point(&self, point: &[f64]) -> Option<usize> {
        let tol_sq = MERGE_TOLERANCE * MERGE_TOLERANCE;
        self.points.iter().position(|p| {
            p.iter()
                .zip(point)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                <= tol_sq
        })
    }

    /// All distinct points, in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// All comparisons, in insertion order.
    #[must_use]
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Number of distinct points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
