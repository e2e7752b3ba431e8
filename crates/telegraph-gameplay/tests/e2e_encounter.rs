//! End-to-end tests for the encounter core.
//!
//! These drive the public API the way the presentation layer does: rig
//! output registered per tick, player attacks as area queries, monster
//! strikes gated by commitment timelines.

use telegraph_common::{deg_to_rad, HurtboxId, OwnerId, Pose, TeamId};
use telegraph_gameplay::prelude::*;
use telegraph_kernel::{sample_hurtbox_rig, HurtboxRig, Keyframe, Shape, Track};

const ORIGIN: Pose = Pose::new(0.0, 0.0, 0.0);

/// Knife swing and ring queries against registered hurtboxes
mod query_tests {
    use super::*;

    fn single_monster(shape: Shape) -> HitboxRegistry {
        let mut registry: HitboxRegistry = HitboxRegistry::new();
        registry.register_hurtboxes(
            TeamId::Monsters,
            OwnerId::new(),
            vec![HurtboxEntry::new(HurtboxId::new(0), shape).with_data(HurtboxData::default())],
        );
        registry
    }

    #[test]
    fn e2e_knife_swing_hits_target_in_arc() {
        let registry = single_monster(Shape::circle(60.0, 0.0, 10.0));
        let hits = monster_hurtboxes_within_arc(&registry, &ORIGIN, 64.0, deg_to_rad(45.0));
        assert_eq!(hits.len(), 1, "Circle straight ahead should be hit");
        assert_eq!(hits[0].data.as_ref().map(|d| d.damage_multiplier), Some(1.0));
    }

    #[test]
    fn e2e_knife_swing_misses_target_outside_half_angle() {
        let registry = single_monster(Shape::circle(60.0, 60.0, 10.0));
        let hits = monster_hurtboxes_within_arc(&registry, &ORIGIN, 64.0, deg_to_rad(45.0));
        assert!(hits.is_empty(), "Circle at 45 degrees and 85 units should be missed");
    }

    #[test]
    fn e2e_ring_includes_band_and_excludes_far() {
        let mut registry: HitboxRegistry = HitboxRegistry::new();
        registry.register_hurtboxes(
            TeamId::Monsters,
            OwnerId::new(),
            vec![
                HurtboxEntry::new(HurtboxId::new(0), Shape::circle(0.0, 50.0, 5.0)),
                HurtboxEntry::new(HurtboxId::new(1), Shape::circle(200.0, 0.0, 5.0)),
            ],
        );

        let hits = monster_hurtboxes_within_ring(&registry, &ORIGIN, 20.0, 80.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, HurtboxId::new(0));
    }

    #[test]
    fn e2e_area_query_from_table_matches_builder() {
        let registry = single_monster(Shape::capsule(30.0, -20.0, 30.0, 20.0, 4.0));
        let area = AreaQuery::Stab {
            length: 50.0,
            half_width: 6.0,
            half_angle: Some(deg_to_rad(30.0)),
        };
        let from_table = HurtboxQuery::new(&registry, ORIGIN).within(&area);
        let from_builder =
            HurtboxQuery::new(&registry, ORIGIN).within_stab(50.0, 6.0, Some(deg_to_rad(30.0)));
        assert_eq!(from_table.len(), 1);
        assert_eq!(from_table, from_builder);
    }
}

/// Registry lifecycle across ticks
mod registry_tests {
    use super::*;

    #[test]
    fn e2e_registry_round_trip_and_owner_replacement() {
        let mut registry: HitboxRegistry = HitboxRegistry::new();
        let m1 = OwnerId::new();
        let m2 = OwnerId::new();
        let entries = vec![
            HurtboxEntry::new(HurtboxId::new(0), Shape::circle(1.0, 2.0, 3.0)),
            HurtboxEntry::new(HurtboxId::new(1), Shape::capsule(0.0, 0.0, 5.0, 0.0, 1.0)),
        ];
        registry.register_hurtboxes(TeamId::Monsters, m1, entries.clone());
        registry.register_hurtboxes(
            TeamId::Monsters,
            m2,
            vec![HurtboxEntry::new(HurtboxId::new(0), Shape::circle(9.0, 9.0, 1.0))],
        );

        let mine: Vec<Shape> = registry
            .owner_hurtboxes(TeamId::Monsters, m1)
            .iter()
            .map(|b| b.shape)
            .collect();
        assert_eq!(mine, vec![entries[0].shape, entries[1].shape]);

        registry.register_hurtboxes(TeamId::Monsters, m1, Vec::new());
        assert_eq!(registry.team_size(TeamId::Monsters), 1, "Only m2's entry should remain");
        assert_eq!(registry.get_hurtboxes(Some(TeamId::Monsters))[0].owner, m2);
    }

    #[test]
    fn e2e_rig_output_registered_each_tick_replaces_previous() {
        let rig = HurtboxRig::new().with_track(
            "walk",
            Track::looping(vec![
                Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 10.0)]),
                Keyframe::new(100.0, vec![Shape::circle(20.0, 0.0, 10.0)]),
            ]),
        );
        let owner = OwnerId::new();
        let mut registry: HitboxRegistry = HitboxRegistry::new();

        for step in 0..5 {
            let time = step as f32 * 30.0;
            let entries: Vec<HurtboxEntry> = sample_hurtbox_rig(&rig, "walk", time)
                .into_iter()
                .enumerate()
                .map(|(i, shape)| HurtboxEntry::new(HurtboxId::new(i as u32), shape))
                .collect();
            registry.register_hurtboxes(TeamId::Monsters, owner, entries);
            assert_eq!(registry.len(), 1, "Re-registering must not accumulate entries");
        }

        // t = 120 wraps to 20: 20% of the way from 0 to 20
        let center = registry.get_hurtboxes(None)[0].shape.center();
        assert!((center.x - 4.0).abs() < 1e-3, "got {center:?}");
    }
}

/// Full encounter loop
mod encounter_tests {
    use super::*;

    fn brute() -> MonsterProfile {
        let idle = vec![Shape::circle(0.0, 0.0, 24.0), Shape::capsule(20.0, 0.0, 44.0, 0.0, 8.0)];
        let rig = HurtboxRig::new()
            .with_track("idle", Track::looping(vec![Keyframe::new(0.0, idle.clone())]))
            .with_track(
                "swipe",
                Track::once(vec![
                    Keyframe::new(0.0, idle),
                    Keyframe::new(
                        300.0,
                        vec![Shape::circle(0.0, 0.0, 24.0), Shape::capsule(20.0, 0.0, 60.0, 0.0, 8.0)],
                    ),
                ]),
            );
        MonsterProfile {
            name: "Brute".to_string(),
            max_health: 60.0,
            rig,
            parts: vec![HurtboxData::part("body", 1.0), HurtboxData::part("arm", 1.5)],
            moves: vec![MonsterMove::new("swipe", "swipe", CommitWindow::new(120.0, 60.0, 120.0))
                .with_strike(Shape::capsule(20.0, 0.0, 70.0, 0.0, 10.0))
                .with_damage(15.0)],
            rest_ms: 200.0,
        }
    }

    #[test]
    fn e2e_encounter_runs_to_a_result() {
        let mut encounter =
            Encounter::new(brute(), PlayerProfile::default(), 11).expect("valid encounter");
        let monster = Pose::new(0.0, 0.0, 0.0);
        let player = Pose::new(60.0, 0.0, std::f32::consts::PI);
        let swing = AreaQuery::Sector {
            range: 64.0,
            half_angle: deg_to_rad(45.0),
        };

        let mut strikes = 0;
        let mut ticks = 0;
        while !encounter.is_over() && ticks < 10_000 {
            let report = encounter.tick(10.0, monster, player);
            if report.strike_damage.is_some() {
                strikes += 1;
            }
            if ticks % 50 == 0 {
                let hits = encounter.player_attack(&swing, 10.0);
                assert!(hits.len() <= 1, "One monster means at most one hit per swing");
            }
            ticks += 1;
        }

        assert!(encounter.is_over(), "Someone should win within the tick budget");
        assert!(strikes > 0, "Player standing in reach should be struck");
        assert!(encounter.monster_health() < 60.0, "Player swings should land");
    }

    #[test]
    fn e2e_same_seed_same_outcome() {
        let run = |seed: u64| {
            let mut encounter =
                Encounter::new(brute(), PlayerProfile::default(), seed).expect("valid encounter");
            (0..300)
                .map(|_| {
                    encounter
                        .tick(10.0, ORIGIN, Pose::new(50.0, 0.0, 0.0))
                        .strike_damage
                        .is_some()
                })
                .collect::<Vec<bool>>()
        };
        assert_eq!(run(5), run(5));
    }
}
