use argus_core::consts::{NUM_WAREHOUSES, OBSTACLE_STATE_DIM};
use argus_core::{AgentKind, Population, Stage, Team, WrapperError};
use argus_layout::{FieldName, LayoutSet};
use argus_test_utils::fixtures::{cargo, noise_observation, small_env, SMALL};
use argus_test_utils::SyntheticEnvironment;
use argus_wrappers::EnhancedObservation;
use ndarray::{s, Array1, Array2};
use proptest::prelude::*;

fn flagged(states: ndarray::ArrayView2<'_, f64>) -> Array1<f64> {
    states
        .outer_iter()
        .flat_map(|row| row.iter().copied().chain(std::iter::once(1.0)).collect::<Vec<_>>())
        .collect()
}

fn enhanced(team: Team) -> EnhancedObservation<SyntheticEnvironment> {
    EnhancedObservation::new(small_env(), team).unwrap()
}

// ── Broadcast ──────────────────────────────────────────────────────

#[test]
fn opponent_block_is_identical_across_camera_rows() {
    let mut stage = enhanced(Team::Both);
    let obs = stage.observe().unwrap();

    let targets = stage.get_ref().target_states();
    let expected = flagged(targets.slice(s![.., ..AgentKind::Target.public_dim()]));
    let layouts = LayoutSet::derive(SMALL).unwrap();
    let opp = layouts.camera().field(FieldName::OpponentStatesWithMask);
    assert_eq!(expected.len(), opp.len());

    for row in obs.camera.outer_iter() {
        assert_eq!(row.slice(s![opp.range()]), expected);
    }
}

#[test]
fn every_block_is_flagged_visible() {
    let mut stage = enhanced(Team::Both);
    let obs = stage.observe().unwrap();
    let layouts = stage.layouts().unwrap().clone();

    for kind in [AgentKind::Camera, AgentKind::Target] {
        let layout = layouts.layout(kind);
        for (name, slice) in layout.iter().filter(|(n, _)| n.is_masked()) {
            for row in obs.rows(kind).outer_iter() {
                for i in 0..slice.count {
                    assert_eq!(row[slice.mask_column(i)], 1.0, "{kind} {name} entry {i}");
                }
            }
        }
    }
}

#[test]
fn obstacle_block_comes_from_environment() {
    let mut stage = enhanced(Team::Both);
    let obs = stage.observe().unwrap();
    let expected = flagged(stage.obstacle_states());
    assert_eq!(expected.len(), OBSTACLE_STATE_DIM + 1);

    let layouts = stage.layouts().unwrap();
    for kind in [AgentKind::Camera, AgentKind::Target] {
        let block = layouts.layout(kind).field(FieldName::ObstacleStatesWithMask);
        for row in obs.rows(kind).outer_iter() {
            assert_eq!(row.slice(s![block.range()]), expected);
        }
    }
}

#[test]
fn teammate_block_includes_the_observer() {
    let mut stage = enhanced(Team::Camera);
    let obs = stage.observe().unwrap();
    let layouts = stage.layouts().unwrap();
    let mates = layouts.camera().field(FieldName::TeammateStatesWithMask);
    let own = layouts.camera().field(FieldName::OwnState).start;

    for (i, row) in obs.camera.outer_iter().enumerate() {
        let entry = mates.entry(i);
        assert_eq!(
            row.slice(s![entry.start..entry.end - 1]),
            row.slice(s![own..own + AgentKind::Camera.public_dim()])
        );
    }
}

// ── Warehouse bits ─────────────────────────────────────────────────

#[test]
fn empty_bits_are_fleet_wide_and_broadcast() {
    let mut env = small_env();
    env.set_remaining_cargoes(cargo(&[[0, 1, 0, 0], [0, 0, 0, 0]]));
    let mut stage = EnhancedObservation::new(env, Team::Target).unwrap();
    let obs = stage.observe().unwrap();

    let bits = stage.layouts().unwrap().target_indices().empty_bits_slice();
    assert_eq!(bits.len(), NUM_WAREHOUSES);
    for row in obs.target.outer_iter() {
        assert_eq!(row.slice(s![bits.clone()]), ndarray::arr1(&[1.0, 0.0, 1.0, 1.0]));
    }
}

// ── Team selection ─────────────────────────────────────────────────

#[test]
fn unknown_team_name_is_rejected() {
    let err = EnhancedObservation::from_name(small_env(), "everyone").unwrap_err();
    assert!(matches!(err, WrapperError::InvalidArgument { argument: "team", .. }));
    assert!(EnhancedObservation::from_name(small_env(), "target").is_ok());
}

#[test]
fn preserved_header_and_own_state_pass_through() {
    let mut stage = enhanced(Team::Both);
    let raw = noise_observation(SMALL, 11);
    let out = stage.transform(raw.clone()).unwrap();
    let layouts = stage.layouts().unwrap();

    let cam_own = layouts.camera().field(FieldName::OwnState);
    assert_eq!(
        out.camera.slice(s![.., ..cam_own.end()]),
        raw.camera.slice(s![.., ..cam_own.end()])
    );
    let tgt_bits = layouts.target().field(FieldName::WarehouseEmptyBits);
    assert_eq!(
        out.target.slice(s![.., ..tgt_bits.start]),
        raw.target.slice(s![.., ..tgt_bits.start])
    );
}

#[test]
fn display_nests_inner_stage() {
    let stage = enhanced(Team::Camera);
    assert_eq!(
        stage.to_string(),
        "<EnhancedObservation(team=camera)<SyntheticEnvironment(3c/2t/1o)>>"
    );
}

// ── Shape checks ───────────────────────────────────────────────────

#[test]
fn wrong_row_width_is_rejected_before_any_write() {
    let mut stage = enhanced(Team::Both);
    let mut raw = noise_observation(SMALL, 5);
    raw.target = Array2::zeros((2, 10));
    let err = stage.transform(raw).unwrap_err();
    assert_eq!(
        err,
        WrapperError::ShapeMismatch {
            what: "target rows",
            expected: (2, 62),
            actual: (2, 10),
        }
    );
}

#[test]
fn wrong_cargo_shape_is_rejected() {
    let mut env = small_env();
    env.set_remaining_cargoes(Array2::zeros((3, NUM_WAREHOUSES)));
    let mut stage = EnhancedObservation::new(env, Team::Both).unwrap();
    let err = stage.transform(noise_observation(SMALL, 5)).unwrap_err();
    assert!(matches!(
        err,
        WrapperError::ShapeMismatch {
            what: "remaining cargoes",
            expected: (2, NUM_WAREHOUSES),
            actual: (3, NUM_WAREHOUSES),
        }
    ));
}

#[test]
fn wrong_obstacle_shape_is_rejected() {
    let mut env = small_env();
    env.set_obstacle_states(Array2::zeros((1, 2)));
    let mut stage = EnhancedObservation::new(env, Team::Camera).unwrap();
    assert!(matches!(
        stage.transform(noise_observation(SMALL, 5)),
        Err(WrapperError::ShapeMismatch { what: "obstacle states", .. })
    ));
}

#[test]
fn empty_population_yields_empty_rows() {
    let env = SyntheticEnvironment::new(0, 0, 0, 1).unwrap();
    let mut stage = EnhancedObservation::new(env, Team::Both).unwrap();
    let obs = stage.observe().unwrap();
    assert_eq!(obs.camera.nrows(), 0);
    assert_eq!(obs.target.nrows(), 0);
}

// ── Properties ─────────────────────────────────────────────────────

fn arb_population() -> impl Strategy<Value = Population> {
    (0usize..5, 0usize..5, 0usize..4).prop_map(|(c, t, o)| Population::from_counts(c, t, o))
}

fn stage_for(
    population: Population,
    seed: u64,
    team: Team,
) -> EnhancedObservation<SyntheticEnvironment> {
    let env = SyntheticEnvironment::with_population(population, seed).unwrap();
    EnhancedObservation::new(env, team).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn team_none_is_identity(p in arb_population(), seed in any::<u64>()) {
        let mut stage = stage_for(p, seed, Team::None);
        let raw = noise_observation(p, seed);
        prop_assert_eq!(stage.transform(raw.clone()).unwrap(), raw);
    }

    #[test]
    fn full_enhancement_is_idempotent(p in arb_population(), seed in any::<u64>()) {
        let mut stage = stage_for(p, seed, Team::Both);
        let once = stage.transform(noise_observation(p, seed)).unwrap();
        let twice = stage.transform(once.clone()).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn unselected_team_rows_are_untouched(p in arb_population(), seed in any::<u64>()) {
        let raw = noise_observation(p, seed);

        let out = stage_for(p, seed, Team::Camera).transform(raw.clone()).unwrap();
        prop_assert_eq!(&out.target, &raw.target);

        let out = stage_for(p, seed, Team::Target).transform(raw.clone()).unwrap();
        prop_assert_eq!(&out.camera, &raw.camera);
    }

    #[test]
    fn observations_keep_their_shape(p in arb_population(), seed in any::<u64>()) {
        let mut stage = stage_for(p, seed, Team::Both);
        let layouts = LayoutSet::derive(p).unwrap();
        let obs = stage.observe().unwrap();
        prop_assert_eq!(obs.camera.dim(), layouts.camera().shape());
        prop_assert_eq!(obs.target.dim(), layouts.target().shape());
    }
}
