//! Property tests for den occupancy
//!
//! Arbitrary sequences of entries and exits must keep every den within
//! capacity, single-species, and tagged exactly when someone is inside.

use den_ecology::core::types::{AgentId, ShelterId, Species, Vec2};
use den_ecology::simulation::shelter::Shelter;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Enter(Species),
    /// Exit the resident at this position (modulo resident count)
    Exit(usize),
    EvictAll,
}

fn species() -> impl Strategy<Value = Species> {
    prop_oneof![
        Just(Species::TopPredator),
        Just(Species::MidPredator),
        Just(Species::Prey),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => species().prop_map(Op::Enter),
        3 => any::<usize>().prop_map(Op::Exit),
        1 => Just(Op::EvictAll),
    ]
}

fn unit_cost(species: Species) -> u32 {
    match species {
        Species::TopPredator => 3,
        Species::MidPredator => 2,
        Species::Prey => 1,
    }
}

fn check(den: &Shelter) {
    assert!(den.occupied_units() <= den.capacity());
    assert_eq!(den.is_empty(), den.occupant().is_none());
    assert_eq!(den.is_empty(), den.occupied_units() == 0);
}

proptest! {
    #[test]
    fn occupancy_never_exceeds_capacity(capacity in 0u32..15, ops in prop::collection::vec(op(), 1..80)) {
        let mut den = Shelter::new(ShelterId(0), Vec2::ZERO, Vec2::Y, Vec2::Y * 2.0, capacity);
        let mut inside: Vec<(AgentId, Species)> = Vec::new();

        for op in ops {
            match op {
                Op::Enter(species) => {
                    let id = AgentId::new();
                    let before = den.occupant();
                    match den.try_enter(id, species, unit_cost(species)) {
                        Ok(entry) => {
                            if !entry.evicted.is_empty() {
                                prop_assert!(species.outranks(&before.unwrap()));
                                inside.clear();
                            }
                            inside.push((id, species));
                        }
                        Err(_) => prop_assert!(!den.contains(id)),
                    }
                }
                Op::Exit(n) => {
                    if !inside.is_empty() {
                        let (id, _) = inside.remove(n % inside.len());
                        prop_assert!(den.exit(id));
                        prop_assert!(!den.exit(id));
                    }
                }
                Op::EvictAll => {
                    let evicted = den.evict_all();
                    prop_assert_eq!(evicted.len(), inside.len());
                    inside.clear();
                }
            }

            check(&den);
            let expected: u32 = inside.iter().map(|(_, s)| unit_cost(*s)).sum();
            prop_assert_eq!(den.occupied_units(), expected);
            if let Some(occupant) = den.occupant() {
                prop_assert!(inside.iter().all(|(_, s)| *s == occupant));
            }
        }
    }

    #[test]
    fn lower_species_never_displaces(first in species(), second in species()) {
        let mut den = Shelter::new(ShelterId(1), Vec2::ZERO, Vec2::Y, Vec2::Y * 2.0, 10);
        den.try_enter(AgentId::new(), first, unit_cost(first)).unwrap();

        let result = den.try_enter(AgentId::new(), second, unit_cost(second));
        if second == first || second.outranks(&first) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(den.occupant(), Some(first));
        }
        check(&den);
    }
}
