//! Phenotype - attribute values of a newly created agent
//!
//! A fresh agent rolls an attribute total from its species' triangular
//! distribution, starts with one point in every attribute and spends the
//! rest on uniformly random attributes that are still below the cap.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::attributes::{AttributeKind, Attributes};
use crate::entity::species::SpeciesProfile;
use crate::genetics::distribution::{TriangularDistribution, MIN_TOTAL};

/// Rolled attributes and the total they were rolled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phenotype {
    pub attributes: Attributes,
    pub total: u32,
}

impl Phenotype {
    /// Random phenotype for a first-generation agent
    pub fn random<R: Rng + ?Sized>(profile: &SpeciesProfile, rng: &mut R) -> Self {
        let total = roll_attribute_total(profile, rng);
        let attributes = distribute_points(total, profile.max_attribute, rng);
        Self {
            total: attributes.total(),
            attributes,
        }
    }
}

/// Sample a birth total around the species base
pub fn roll_attribute_total<R: Rng + ?Sized>(profile: &SpeciesProfile, rng: &mut R) -> u32 {
    TriangularDistribution::new(profile.base_attribute_total, profile.attribute_range)
        .map(|d| d.sample(rng))
        .unwrap_or(profile.base_attribute_total)
}

/// Spread `total` points over the five attributes
///
/// Every attribute gets one point first. Totals beyond what the caps allow
/// are truncated at `5 * max_attribute`.
pub fn distribute_points<R: Rng + ?Sized>(total: u32, max_attribute: u32, rng: &mut R) -> Attributes {
    let mut attributes = Attributes::default();
    let target = total.clamp(MIN_TOTAL, MIN_TOTAL * max_attribute.max(1));
    let mut assigned = MIN_TOTAL;

    while assigned < target {
        let open: Vec<AttributeKind> = AttributeKind::ALL
            .iter()
            .copied()
            .filter(|&k| attributes.get(k) < max_attribute)
            .collect();
        let Some(&kind) = open.choose(rng) else {
            break;
        };
        *attributes.get_mut(kind) += 1;
        assigned += 1;
    }

    attributes
}
