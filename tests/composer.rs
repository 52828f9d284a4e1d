mod common;

use std::collections::BTreeSet;

use grid_vrp::config::{PlannerConfig, StoreConfig};
use grid_vrp::distance::search::PathFinder;
use grid_vrp::distance::store::PathStore;
use grid_vrp::domain::bundle::Bundle;
use grid_vrp::domain::cluster::ClusterKind;
use grid_vrp::domain::types::Point;
use grid_vrp::domain::world::World;
use grid_vrp::fixtures::{GridWorld, SimulatedVehicle};
use grid_vrp::setup::compositor::{ClusterCompositor, SeedFallback};
use grid_vrp::setup::init::setup;
use grid_vrp::setup::season::CompositorSeason;
use rstest::rstest;

#[rstest]
fn three_close_units_make_one_normal_tour() {
    let world = common::three_close_points();
    let config = PlannerConfig::default();
    let result = setup(&world, &config).unwrap();

    assert_eq!(result.clusters.len(), 1);
    let cluster = &result.clusters[0];
    assert_eq!(cluster.kind(), ClusterKind::Normal);
    assert_eq!(cluster.material(&world), 3);
    assert_eq!(cluster.total_time(), 12);

    let bundle = Bundle::new(result.clusters.clone(), config.processing_duration(world.size()));
    assert_eq!(bundle.penalty(), 0);
    assert_eq!(bundle.time(), cluster.total_time());
}

#[rstest]
fn isolated_unit_becomes_a_solo_tour() {
    let world = common::close_points_and_outlier();
    let result = setup(&world, &PlannerConfig::default()).unwrap();
    assert_eq!(result.clusters.len(), 2);

    let solo = result
        .clusters
        .iter()
        .find(|c| c.kind() == ClusterKind::Solo)
        .unwrap();
    let to_depot = result.store.depot_path(Point::new(19, 19)).unwrap();
    assert_eq!(solo.points(), vec![Point::new(19, 19)]);
    assert_eq!(solo.total_time(), 2 * to_depot.driven_time());
    assert_eq!(solo.cost(31), 76);
    assert!(result.clusters.iter().any(|c| c.is_normal()));
}

#[rstest]
fn single_isolated_unit_is_one_solo_round_trip() {
    let world = GridWorld::new(9, Point::new(0, 0)).with_material(Point::new(6, 5), 2);
    let result = setup(&world, &PlannerConfig::default()).unwrap();

    assert_eq!(result.clusters.len(), 1);
    let solo = &result.clusters[0];
    assert_eq!(solo.kind(), ClusterKind::Solo);
    let to_depot = result.store.depot_path(Point::new(6, 5)).unwrap();
    assert_eq!(to_depot.driven_time(), 11);
    assert_eq!(solo.cost(31), 2 * to_depot.driven_time() as i64);
}

#[rstest]
fn solo_time_matches_the_drive_on_uneven_cells() {
    let world = GridWorld::new(3, Point::new(0, 0))
        .with_time(Point::new(0, 0), 5)
        .with_material(Point::new(1, 0), 1);
    let result = setup(&world, &PlannerConfig::default()).unwrap();
    assert_eq!(result.clusters.len(), 1);

    let mut vehicle = SimulatedVehicle::new(world.clone());
    Bundle::new(result.clusters.clone(), 0)
        .drive(&mut vehicle, &world)
        .unwrap();
    assert_eq!(result.clusters[0].total_time(), 6);
    assert_eq!(vehicle.elapsed(), 6);
    assert_eq!(vehicle.delivered(), 1);
}

#[rstest]
fn heavy_neighbors_are_never_grouped() {
    let world = GridWorld::new(6, Point::new(0, 0))
        .with_material(Point::new(2, 2), 2)
        .with_material(Point::new(2, 3), 2);
    let mut finder = PathFinder::new(&world);
    let store = PathStore::build(&world, &mut finder, &StoreConfig::primary()).unwrap();

    let mut season = CompositorSeason::from_store(&store);
    let skipped = ClusterCompositor::new(&mut season, 31).try_create(&world, SeedFallback::Skip);
    assert!(skipped.is_empty());
    assert_eq!(season.remaining_count(), 2);

    let solos = ClusterCompositor::new(&mut season, 31).try_create(&world, SeedFallback::Solo);
    assert_eq!(solos.len(), 2);
    assert!(solos.iter().all(|c| c.kind() == ClusterKind::Solo));
    assert!(!season.has_remaining());
}

#[rstest]
#[case(12, 1)]
#[case(18, 4)]
#[case(25, 9)]
fn every_unit_is_assigned_once_within_capacity(#[case] size: i32, #[case] seed: u64) {
    let world = GridWorld::random(size, seed);
    let result = setup(&world, &PlannerConfig::default()).unwrap();

    let mut seen = BTreeSet::new();
    for cluster in &result.clusters {
        assert!(cluster.material(&world) <= 3);
        for p in cluster.points() {
            assert!(seen.insert(p), "{} assigned twice", p);
        }
    }
    let expected: BTreeSet<Point> = world.material_points().into_iter().collect();
    assert_eq!(seen, expected);
}
