#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use voidline_core::entities::Body;
    use voidline_core::ids::DurableId;
    use voidline_core::rules::GenerationRules;
    use voidline_core::types::Position;

    use crate::asteroid_field::{AsteroidFieldManager, DamageOutcome, FieldSnapshot, FieldTuning};
    use crate::world_gen::{HybridParams, WorldGenerator};

    fn generator() -> WorldGenerator {
        WorldGenerator::new(GenerationRules::default()).unwrap()
    }

    fn field_manager() -> AsteroidFieldManager {
        AsteroidFieldManager::new(FieldTuning::from(&GenerationRules::default().asteroids))
    }

    /// The field used throughout the destroyed-id tests.
    fn reference_field() -> AsteroidFieldManager {
        let mut field = field_manager();
        field.configure(FieldSnapshot {
            seed: 0x1a2b,
            destroyed_ids: Vec::new(),
            center: Position::new(-50.0, 50.0, -650.0),
            extent: 1200.0,
        });
        field
    }

    fn ids(field: &AsteroidFieldManager) -> Vec<DurableId> {
        field.live().iter().map(|a| a.id.clone()).collect()
    }

    // ---- Determinism ----

    #[test]
    fn test_determinism_same_seed() {
        let gen = generator();
        let mut seeds = ChaCha8Rng::seed_from_u64(12345);
        for _ in 0..200 {
            let seed: u32 = seeds.gen();
            let a = gen.generate(seed, None);
            let b = gen.generate(seed, None);
            assert_eq!(a, b, "generation diverged for seed {seed}");

            let json_a = serde_json::to_string(&a).unwrap();
            let json_b = serde_json::to_string(&b).unwrap();
            assert_eq!(json_a, json_b);
        }
    }

    #[test]
    fn test_determinism_across_generator_instances() {
        let a = generator().generate(777, Some(HybridParams {
            extra_planets: 2,
            seed_offset: 9,
        }));
        let b = generator().generate(777, Some(HybridParams {
            extra_planets: 2,
            seed_offset: 9,
        }));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let gen = generator();
        let a = gen.generate(111, None);
        let b = gen.generate(222, None);
        assert_ne!(a, b);
    }

    // ---- Seed independence ----

    /// Planets only read the `planetCount` and `planet` namespaces, so changing
    /// how stations, derelicts or asteroids draw must leave them untouched.
    #[test]
    fn test_planets_independent_of_other_namespaces() {
        let baseline = generator();

        let mut rules = GenerationRules::default();
        rules.stations.max_count = 0;
        rules.stations.suffixes.push("Bastion".to_string());
        rules.derelicts.count.max = 9;
        rules.asteroids.extent.max = 5000.0;
        let perturbed = WorldGenerator::new(rules).unwrap();

        let mut seeds = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..100 {
            let seed: u32 = seeds.gen();
            let a = baseline.generate(seed, None);
            let b = perturbed.generate(seed, None);
            assert_eq!(a.planets, b.planets, "planets moved for seed {seed}");
            assert!(b.stations.is_empty());
        }
    }

    // ---- Structure ----

    #[test]
    fn test_generated_sector_structure() {
        let gen = generator();
        let rules = gen.rules().clone();
        let mut seeds = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let seed: u32 = seeds.gen();
            let sector = gen.generate(seed, None);

            let count = sector.planets.len() as u32;
            assert!(count >= rules.planet_count.min && count <= rules.planet_count.max);

            let names: HashSet<&str> = sector.planets.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names.len(), sector.planets.len(), "planet names must be unique");

            assert!(sector.stations.len() <= rules.stations.max_count as usize);
            assert!(sector.stations.len() <= sector.planets.len());
            let hosts: HashSet<&str> = sector.stations.iter().map(|s| s.host.as_str()).collect();
            assert_eq!(hosts.len(), sector.stations.len(), "hosts drawn without replacement");
            for host in hosts {
                assert!(names.contains(host), "station references unknown planet {host}");
            }

            for planet in &sector.planets {
                if let Some(moon) = &planet.moon {
                    assert_eq!(moon.host, planet.name);
                }
                if let Some(ring) = &planet.ring {
                    assert!(ring.outer_radius > ring.inner_radius);
                    assert!(ring.inner_radius > planet.radius);
                }
                assert!(planet.mass > 0.0);
            }

            assert_eq!(sector.asteroid_field.count, rules.asteroids.candidate_count);
        }
    }

    #[test]
    fn test_ids_are_slot_derived() {
        let sector = generator().generate(0xbeef, None);
        for (i, planet) in sector.planets.iter().enumerate() {
            assert_eq!(planet.id, DurableId::slot("planet", 0xbeef, i));
        }
        for (s, station) in sector.stations.iter().enumerate() {
            assert_eq!(station.id, DurableId::slot("station", 0xbeef, s));
        }
    }

    #[test]
    fn test_bodies_order() {
        let sector = generator().generate(31337, None);
        let bodies = sector.bodies();
        let expected = sector.planets.len() + sector.stations.len() + sector.derelicts.len() + 1;
        assert_eq!(bodies.len(), expected);
        assert!(matches!(bodies.first(), Some(Body::Planet(_))));
        assert!(matches!(bodies.last(), Some(Body::AsteroidField(_))));
        assert!(bodies.iter().filter(|b| b.id().is_some()).count() >= sector.planets.len());
    }

    // ---- Boundaries ----

    #[test]
    fn test_minimum_planets_no_stations_is_valid() {
        let mut rules = GenerationRules::default();
        rules.planet_count.min = 2;
        rules.planet_count.max = 2;
        rules.stations.max_count = 0;
        let gen = WorldGenerator::new(rules).unwrap();

        let sector = gen.generate(5, None);
        assert_eq!(sector.planets.len(), 2);
        assert!(sector.stations.is_empty());
        assert_eq!(sector.bodies().len(), 2 + sector.derelicts.len() + 1);
    }

    #[test]
    fn test_zero_planets_gives_zero_stations() {
        let mut rules = GenerationRules::default();
        rules.planet_count.min = 0;
        rules.planet_count.max = 0;
        rules.stations.max_count = 3;
        let gen = WorldGenerator::new(rules).unwrap();

        for seed in 0..50 {
            let sector = gen.generate(seed, None);
            assert!(sector.planets.is_empty());
            assert!(sector.stations.is_empty());
        }
    }

    #[test]
    fn test_invalid_rules_rejected_by_generator() {
        let mut rules = GenerationRules::default();
        rules.moons.probability = -1.0;
        assert!(WorldGenerator::new(rules).is_err());
    }

    // ---- Hybrid sectors ----

    #[test]
    fn test_hybrid_extra_planets_exact() {
        let gen = generator();
        let sector = gen.generate(
            10,
            Some(HybridParams {
                extra_planets: 3,
                seed_offset: 1000,
            }),
        );
        assert_eq!(sector.planets.len(), 3);
        assert_eq!(sector.seed, 1010);
    }

    #[test]
    fn test_hybrid_offset_shifts_content() {
        let gen = generator();
        let a = gen.generate(
            10,
            Some(HybridParams {
                extra_planets: 2,
                seed_offset: 1,
            }),
        );
        let b = gen.generate(
            10,
            Some(HybridParams {
                extra_planets: 2,
                seed_offset: 2,
            }),
        );
        assert_ne!(a.planets, b.planets);
    }

    #[test]
    fn test_hybrid_with_zero_offset_matches_plain_planets() {
        let gen = generator();
        let seed = 2024;
        let plain = gen.generate(seed, None);
        let hybrid = gen.generate(
            seed,
            Some(HybridParams {
                extra_planets: plain.planets.len() as u32,
                seed_offset: 0,
            }),
        );
        assert_eq!(plain.planets, hybrid.planets);
    }

    // ---- Asteroid fields ----

    #[test]
    fn test_field_candidates_within_extent() {
        let field = reference_field();
        assert_eq!(field.len(), 48);
        for rock in field.live() {
            assert!((rock.position.x - -50.0).abs() <= 600.0);
            assert!((rock.position.y - 50.0).abs() <= 600.0);
            assert!((rock.position.z - -650.0).abs() <= 600.0);
            assert!(rock.health > 0.0);
        }
        let unique: HashSet<DurableId> = ids(&field).into_iter().collect();
        assert_eq!(unique.len(), 48);
    }

    #[test]
    fn test_destroyed_id_stability() {
        let mut field = reference_field();
        let before = field.live().to_vec();
        let target = before[2].id.clone();

        assert!(field.mark_destroyed(&target));
        field.regenerate();

        let after = field.live().to_vec();
        assert_eq!(after.len(), before.len() - 1);
        assert!(after.iter().all(|a| a.id != target));

        let expected: Vec<_> = before.into_iter().filter(|a| a.id != target).collect();
        assert_eq!(after, expected, "surviving rocks must keep ids and placement");
    }

    #[test]
    fn test_skipped_candidates_still_consume_draws() {
        let mut field = reference_field();
        let all = field.candidates();
        field.mark_destroyed(&all[0].id);
        field.regenerate();
        // The second candidate is unchanged even though the first was skipped.
        assert_eq!(field.live()[0], all[1]);
        assert_eq!(field.candidates(), all);
    }

    #[test]
    fn test_snapshot_configure_reproduces_live_set() {
        let mut picks = ChaCha8Rng::seed_from_u64(2);
        for round in 0..20 {
            let mut field = reference_field();
            let destroys = picks.gen_range(0..20);
            for _ in 0..destroys {
                if field.is_empty() {
                    break;
                }
                let i = picks.gen_range(0..field.len());
                let id = field.live()[i].id.clone();
                field.mark_destroyed(&id);
            }
            let live_before = field.live().to_vec();

            let snapshot = field.snapshot();
            let mut restored = field_manager();
            restored.configure(snapshot.clone());

            assert_eq!(restored.live(), &live_before[..], "round {round}");
            assert_eq!(restored.snapshot(), snapshot);
        }
    }

    #[test]
    fn test_idempotent_destruction() {
        let mut field = reference_field();
        let id = field.live()[5].id.clone();
        assert!(field.mark_destroyed(&id));
        assert!(!field.mark_destroyed(&id));
        let snapshot = field.snapshot();
        assert_eq!(snapshot.destroyed_ids.iter().filter(|d| **d == id).count(), 1);
        assert_eq!(snapshot.destroyed_ids.len(), 1);
    }

    #[test]
    fn test_foreign_id_ignored() {
        let mut field = reference_field();
        assert!(!field.mark_destroyed(&DurableId::new("ast-notfromhere")));
        assert_eq!(field.destroyed_count(), 0);
        assert_eq!(field.len(), 48);
    }

    #[test]
    fn test_apply_damage_destroys_at_zero() {
        let mut field = reference_field();
        let rock = field.live()[0].clone();

        match field.apply_damage(&rock.id, rock.health / 2.0) {
            DamageOutcome::Damaged { remaining } => {
                assert!((remaining - rock.health / 2.0).abs() < 1e-9)
            }
            other => panic!("expected damage, got {other:?}"),
        }
        assert_eq!(field.apply_damage(&rock.id, rock.health), DamageOutcome::Destroyed);
        assert!(field.is_destroyed(&rock.id));
        assert!(field.get(&rock.id).is_none());
        assert_eq!(field.apply_damage(&rock.id, 1.0), DamageOutcome::Missed);
    }

    #[test]
    fn test_field_from_generated_spec() {
        let sector = generator().generate(88, None);
        let mut field = field_manager();
        field.configure(FieldSnapshot::pristine(&sector.asteroid_field));
        assert_eq!(field.len(), sector.asteroid_field.count);
        assert_eq!(field.seed(), sector.asteroid_field.seed);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut field = reference_field();
        let id = field.live()[0].id.clone();
        field.mark_destroyed(&id);
        let value = serde_json::to_value(field.snapshot()).unwrap();
        assert_eq!(value["seed"], 0x1a2b);
        assert_eq!(value["destroyedIds"][0], id.as_str());
        assert_eq!(value["center"]["z"], -650.0);
        assert_eq!(value["extent"], 1200.0);
    }
}
