mod common;

use grid_vrp::domain::world::{Vehicle, World};
use grid_vrp::fixtures::{GridWorld, SimulatedVehicle};
use grid_vrp::domain::types::Point;
use grid_vrp::solver::plan::{plan_bundle, plan_straight};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

#[rstest]
#[case(common::three_close_points(), 0)]
#[case(common::close_points_and_outlier(), 10)]
#[case(GridWorld::random(15, 12), 30)]
fn planned_bundle_delivers_every_unit(#[case] world: GridWorld, #[case] cycles: usize) {
    let config = common::quick_config(cycles);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let report = plan_bundle(&world, &config, &mut rng).unwrap();

    let mut vehicle = SimulatedVehicle::new(world.clone());
    report.optimised.drive(&mut vehicle, &world).unwrap();

    assert_eq!(vehicle.delivered(), world.total_material());
    assert_eq!(vehicle.remaining(), 0);
    assert_eq!(vehicle.load(), 0);
    assert_eq!(vehicle.position(), world.depot());
    assert_eq!(
        vehicle.elapsed(),
        report.optimised.time() as u64 - report.optimised.penalty() as u64
    );
}

#[rstest]
fn world_loaded_from_json_plans_like_the_built_one() {
    let world = common::three_close_points();
    let json = serde_json::to_string(&world).unwrap();
    let loaded = GridWorld::from_json(&json).unwrap();

    let config = common::quick_config(0);
    let plan = |w: &GridWorld| {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        plan_bundle(w, &config, &mut rng).unwrap().optimised.time()
    };
    assert_eq!(plan(&world), plan(&loaded));
    assert_eq!(plan(&loaded), 12);
}

#[rstest]
#[case(common::three_close_points())]
#[case(common::close_points_and_outlier())]
#[case(GridWorld::random(15, 12))]
fn straight_baseline_delivers_every_unit(#[case] world: GridWorld) {
    let config = common::quick_config(0);
    let bundle = plan_straight(&world, &config).unwrap();

    let mut vehicle = SimulatedVehicle::new(world.clone());
    bundle.drive(&mut vehicle, &world).unwrap();
    assert_eq!(vehicle.delivered(), world.total_material());
    assert_eq!(vehicle.remaining(), 0);
    assert_eq!(vehicle.position(), world.depot());
    assert_eq!(vehicle.elapsed(), (bundle.time() - bundle.penalty()) as u64);
}

#[rstest]
fn straight_baseline_splits_a_heavy_cell_across_tours() {
    let world = GridWorld::new(6, Point::new(0, 0))
        .with_material(Point::new(1, 0), 2)
        .with_material(Point::new(2, 0), 3);
    let bundle = plan_straight(&world, &common::quick_config(0)).unwrap();

    // 2 + 1 of the 3 on the first trip, the last 2 on the second.
    assert_eq!(bundle.clusters().len(), 2);
    assert_eq!(bundle.clusters()[0].total_time(), 4);
    assert_eq!(bundle.clusters()[1].total_time(), 4);

    let mut vehicle = SimulatedVehicle::new(world.clone());
    bundle.drive(&mut vehicle, &world).unwrap();
    assert_eq!(vehicle.delivered(), 5);
}

#[rstest]
fn optimised_plan_is_not_slower_than_the_baseline_on_a_tight_group() {
    let world = common::three_close_points();
    let config = common::quick_config(0);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let planned = plan_bundle(&world, &config, &mut rng).unwrap();
    let straight = plan_straight(&world, &config).unwrap();
    assert!(planned.optimised.time() <= straight.time());
}
