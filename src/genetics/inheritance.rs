//! Attribute inheritance
//!
//! A child starts from its parent's attribute values. Its total is drawn
//! from a triangular distribution centred on the parent's total with a
//! spread of a quarter of that total, cut at the species ceiling. The
//! difference is then applied one point at a time to random attributes.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entity::attributes::{AttributeKind, Attributes};
use crate::entity::species::SpeciesProfile;
use crate::genetics::distribution::TriangularDistribution;
use crate::genetics::phenotype::Phenotype;

/// Draw a child total from the parent's total
pub fn child_total<R: Rng + ?Sized>(parent_total: u32, profile: &SpeciesProfile, rng: &mut R) -> u32 {
    let range = parent_total / 4;
    TriangularDistribution::with_ceiling(parent_total, range, profile.max_base_total)
        .map(|d| d.sample(rng))
        .unwrap_or(parent_total)
}

/// Build a child's attributes from its parent
pub fn inherit<R: Rng + ?Sized>(parent: &Attributes, profile: &SpeciesProfile, rng: &mut R) -> Phenotype {
    let parent_total = parent.total();
    let target = child_total(parent_total, profile, rng);
    let mut attributes = *parent;
    let delta = target as i64 - parent_total as i64;
    apply_delta(&mut attributes, delta, profile.max_attribute, rng);

    Phenotype {
        total: attributes.total(),
        attributes,
    }
}

/// Move `attributes` by `delta` points in unit steps
///
/// Each step picks a random attribute that can still move in that
/// direction: increases skip attributes at `max_attribute`, decreases skip
/// attributes at 1. Returns the part of `delta` that could not be applied
/// because every attribute was saturated.
pub fn apply_delta<R: Rng + ?Sized>(
    attributes: &mut Attributes,
    delta: i64,
    max_attribute: u32,
    rng: &mut R,
) -> i64 {
    let mut remaining = delta;

    while remaining != 0 {
        let step: i64 = if remaining > 0 { 1 } else { -1 };
        let movable: Vec<AttributeKind> = AttributeKind::ALL
            .iter()
            .copied()
            .filter(|&k| {
                let v = attributes.get(k);
                if step > 0 {
                    v < max_attribute
                } else {
                    v > 1
                }
            })
            .collect();

        let Some(&kind) = movable.choose(rng) else {
            break;
        };

        let value = attributes.get_mut(kind);
        if step > 0 {
            *value += 1;
        } else {
            *value -= 1;
        }
        remaining -= step;
    }

    remaining
}
