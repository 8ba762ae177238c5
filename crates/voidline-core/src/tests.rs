#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::entities::*;
    use crate::ids::{DurableId, EphemeralIdAllocator};
    use crate::rules::GenerationRules;
    use crate::seed::{hash_parts, make_rng, Mulberry32};
    use crate::types::{Color, Position};
    use crate::ConfigError;

    // ---- Seed derivation ----

    /// Pinned FNV-1a values. If these change, every saved world changes.
    #[test]
    fn test_hash_parts_golden_values() {
        assert_eq!(hash_parts(&[&""]), 0x811c_9dc5);
        assert_eq!(hash_parts(&[&"a"]), 0xe40c_292c);
        assert_eq!(hash_parts(&[&"foobar"]), 0xbf9c_f968);
    }

    #[test]
    fn test_hash_seed_concatenates_display_forms() {
        let direct = hash_parts(&[&"42planet0"]);
        assert_eq!(crate::hash_seed!(42u32, "planet", 0usize), direct);
        assert_eq!(direct, 0x4cda_2bf7);
        assert_eq!(
            crate::hash_seed!(6699u32, "asteroids"),
            hash_parts(&[&"6699", &"asteroids"])
        );
    }

    #[test]
    fn test_hash_seed_label_changes_output() {
        let a = crate::hash_seed!(7u32, "planet", 1usize);
        let b = crate::hash_seed!(7u32, "station", 1usize);
        let c = crate::hash_seed!(8u32, "planet", 1usize);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    /// Pinned Mulberry32 outputs.
    #[test]
    fn test_mulberry32_golden_values() {
        let mut rng = make_rng(0);
        assert_eq!(rng.next_raw(), 1_144_304_738);
        assert_eq!(rng.next_raw(), 1_416_247);
        assert_eq!(rng.next_raw(), 958_946_056);

        let mut rng = make_rng(42);
        assert_eq!(rng.next_raw(), 2_581_720_956);
        assert_eq!(rng.next_raw(), 1_925_393_290);
        assert_eq!(rng.next_raw(), 3_661_312_704);

        let first = make_rng(0).next_f64();
        assert!((first - 0.266_429_208_684_712_65).abs() < 1e-15);
    }

    #[test]
    fn test_mulberry32_same_seed_same_stream() {
        let mut a = Mulberry32::new(0xdead_beef);
        let mut b = Mulberry32::new(0xdead_beef);
        for _ in 0..10_000 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
    }

    #[test]
    fn test_mulberry32_draws_in_unit_interval() {
        let mut seeds = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..32 {
            let mut rng = Mulberry32::new(seeds.gen());
            for _ in 0..1000 {
                let v = rng.next_f64();
                assert!((0.0..1.0).contains(&v), "draw out of range: {v}");
            }
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = Mulberry32::new(99);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = rng.range_inclusive(2, 6);
            assert!((2..=6).contains(&v));
            seen_min |= v == 2;
            seen_max |= v == 6;
        }
        assert!(seen_min && seen_max, "both ends of the range should occur");
    }

    #[test]
    fn test_degenerate_draws_still_consume() {
        let mut a = Mulberry32::new(3);
        let mut b = Mulberry32::new(3);
        assert_eq!(a.range_inclusive(4, 4), 4);
        assert_eq!(a.index(0), None);
        b.next_raw();
        b.next_raw();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rng_core_interop() {
        let mut a = Mulberry32::seed_from_u64(17);
        let mut b = a.clone();
        let x: f64 = a.gen_range(10.0..20.0);
        let y: f64 = b.gen_range(10.0..20.0);
        assert_eq!(x, y);
        assert!((10.0..20.0).contains(&x));

        let mut bytes = [0u8; 7];
        a.fill(&mut bytes);
        let from_le = Mulberry32::from_seed(42u32.to_le_bytes());
        assert_eq!(from_le, Mulberry32::new(42));
    }

    // ---- Ids ----

    #[test]
    fn test_slot_ids_depend_only_on_slot() {
        assert_eq!(
            DurableId::slot("planet", 0x1a2b, 2).as_str(),
            "planet-00001a2b-2"
        );
        assert_ne!(
            DurableId::slot("planet", 1, 0),
            DurableId::slot("station", 1, 0)
        );
    }

    #[test]
    fn test_draw_ids_base36() {
        assert_eq!(DurableId::from_draw("ast-", 0.0).as_str(), "ast-0");
        assert_eq!(DurableId::from_draw("ast-", 0.5).as_str(), "ast-i0000000");
    }

    #[test]
    fn test_ephemeral_ids_increment() {
        let mut alloc = EphemeralIdAllocator::default();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
    }

    // ---- Rules ----

    #[test]
    fn test_default_rules_validate() {
        GenerationRules::default().validate().unwrap();
    }

    #[test]
    fn test_negative_probability_rejected() {
        let mut rules = GenerationRules::default();
        rules.rings.probability = -0.1;
        match rules.validate() {
            Err(ConfigError::Probability { field, .. }) => assert_eq!(field, "rings.probability"),
            other => panic!("expected probability error, got {other:?}"),
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut rules = GenerationRules::default();
        rules.planet_count.min = 5;
        rules.planet_count.max = 1;
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::InvalidRange {
                field: "planet_count",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_palette_rejected() {
        let mut rules = GenerationRules::default();
        rules.archetypes[0].palette.clear();
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::Archetype { .. })
        ));
    }

    #[test]
    fn test_rules_json_roundtrip_and_file_load() {
        let rules = GenerationRules::default();
        let json = serde_json::to_string_pretty(&rules).unwrap();
        let back: GenerationRules = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, back);

        let dir = std::env::temp_dir().join("voidline_test_rules_file");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rules.json");

        std::fs::write(&path, &json).unwrap();
        assert_eq!(GenerationRules::from_json_file(&path).unwrap(), rules);

        let mut bad = rules.clone();
        bad.moons.probability = 1.5;
        std::fs::write(&path, serde_json::to_string(&bad).unwrap()).unwrap();
        assert!(GenerationRules::from_json_file(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    // ---- Entities ----

    #[test]
    fn test_body_serde_is_tagged() {
        let body = Body::Station(Station {
            id: DurableId::new("station-1"),
            name: "Aridus Prime Relay".to_string(),
            host: "Aridus Prime".to_string(),
            position: Position::new(1.0, 2.0, 3.0),
            orbit_radius: 150.0,
            size: 20.0,
            orbit_speed: 0.1,
            angle: 0.5,
            dockable: true,
        });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["kind"], "Station");
        assert_eq!(value["host"], "Aridus Prime");
        let back: Body = serde_json::from_value(value).unwrap();
        assert_eq!(back, body);
        assert_eq!(back.type_name(), "Station");
    }

    #[test]
    fn test_planet_rotation_not_serialized() {
        let mut planet = Planet::placeholder("Glacies Prime");
        planet.rotation = 1.25;
        planet.color = Color(0x8B4513);
        let json = serde_json::to_string(&planet).unwrap();
        assert!(!json.contains("rotation\""), "rotation phase leaked: {json}");
        let back: Planet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rotation, 0.0);
        assert_eq!(back.color.r(), 0x8B);
        assert_eq!(back.color.g(), 0x45);
        assert_eq!(back.color.b(), 0x13);
    }

    #[test]
    fn test_orbit_point() {
        let host = Position::new(10.0, 5.0, -10.0);
        let p = host.orbit_point(100.0, std::f64::consts::FRAC_PI_2);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.z - 90.0).abs() < 1e-9);
        assert_eq!(p.y, 5.0);
        assert!((host.distance_to(&p) - 100.0).abs() < 1e-9);
    }
}
