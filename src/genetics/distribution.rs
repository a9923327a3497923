//! Discrete triangular distribution over attribute totals
//!
//! Centre value `c` with spread `r` gives `c` weight `r`, and `c ± i`
//! weight `r - i` for `i` in `1..r`. Samples are unimodal around `c` and
//! always fall inside `[c - r + 1, c + r - 1]`.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::entity::attributes::AttributeKind;

/// Smallest total that still gives every attribute one point
pub const MIN_TOTAL: u32 = AttributeKind::ALL.len() as u32;

#[derive(Debug, Clone)]
pub struct TriangularDistribution {
    values: Vec<u32>,
    weights: Vec<u32>,
    index: WeightedIndex<u32>,
}

impl TriangularDistribution {
    /// Symmetric distribution around `centre`; None when `range` is zero
    pub fn new(centre: u32, range: u32) -> Option<Self> {
        Self::build(centre, range, u32::MAX)
    }

    /// Distribution whose upper side is cut at `ceiling`
    pub fn with_ceiling(centre: u32, range: u32, ceiling: u32) -> Option<Self> {
        Self::build(centre, range, ceiling)
    }

    fn build(centre: u32, range: u32, ceiling: u32) -> Option<Self> {
        let mut values = Vec::new();
        let mut weights = Vec::new();

        for i in 0..range {
            let weight = range - i;
            let above = centre + i;
            if above <= ceiling && above >= MIN_TOTAL {
                values.push(above);
                weights.push(weight);
            }
            if i != 0 && centre >= i + MIN_TOTAL {
                values.push(centre - i);
                weights.push(weight);
            }
        }

        let index = WeightedIndex::new(&weights).ok()?;
        Some(Self {
            values,
            weights,
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.values[self.index.sample(rng)]
    }

    /// Smallest and largest value with non-zero weight
    pub fn support(&self) -> (u32, u32) {
        let min = self.values.iter().copied().min().unwrap_or(0);
        let max = self.values.iter().copied().max().unwrap_or(0);
        (min, max)
    }

    pub fn weight_of(&self, value: u32) -> u32 {
        self.values
            .iter()
            .zip(&self.weights)
            .filter(|(v, _)| **v == value)
            .map(|(_, w)| *w)
            .sum()
    }
}
