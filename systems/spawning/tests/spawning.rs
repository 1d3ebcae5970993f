use std::time::Duration;

use tile_defence_core::{Command, EnemyId, Event, GridConfig, NavigatorConfig, TileCoord};
use tile_defence_system_spawning::Enemies;
use tile_defence_world::{self as world, query, GridController};

const STEP: Duration = Duration::from_millis(10);

fn tick(controller: &mut GridController, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(controller, Command::Tick { dt }, &mut events);
    events
}

#[test]
fn spawn_requests_create_enemies_on_the_start_tile() {
    let mut controller = GridController::new(GridConfig::default()).expect("grid");
    let mut enemies = Enemies::new(NavigatorConfig::default());

    let events = tick(&mut controller, Duration::from_millis(1500));
    enemies.handle(&events, &query::path_view(&controller));

    assert_eq!(enemies.len(), 1);
    let enemy = enemies.iter().next().expect("spawned enemy");
    assert_eq!(enemy.id, EnemyId::new(0));
    let start = query::path_view(&controller)
        .position_of(query::start_tile(&controller))
        .expect("start position");
    assert_eq!(enemy.position, start);
}

#[test]
fn events_without_spawn_requests_are_ignored() {
    let mut controller = GridController::new(GridConfig::default()).expect("grid");
    let mut enemies = Enemies::new(NavigatorConfig::default());

    let events = tick(&mut controller, Duration::from_millis(100));
    enemies.handle(&events, &query::path_view(&controller));

    assert!(enemies.is_empty());
}

#[test]
fn enemies_walk_to_the_base_and_despawn() {
    let mut controller = GridController::new(GridConfig::default()).expect("grid");
    assert!(controller.request_build_at(TileCoord::new(3, 5)).is_ok());
    let mut enemies = Enemies::new(NavigatorConfig::default());

    let events = tick(&mut controller, Duration::from_millis(1500));
    enemies.handle(&events, &query::path_view(&controller));
    assert_eq!(enemies.len(), 1);

    let base = query::path_view(&controller)
        .position_of(query::base_tile(&controller))
        .expect("base position");
    let mut arrived = Vec::new();
    for _ in 0..2_000 {
        enemies.update(STEP, &query::path_view(&controller), base, &mut arrived);
        if !arrived.is_empty() {
            break;
        }
    }

    assert_eq!(arrived, vec![EnemyId::new(0)]);
    assert!(enemies.is_empty());
}

#[test]
fn identifiers_increase_in_spawn_order() {
    let mut controller = GridController::new(GridConfig::default()).expect("grid");
    let mut enemies = Enemies::new(NavigatorConfig::default());

    for _ in 0..3 {
        let events = tick(&mut controller, Duration::from_millis(1500));
        enemies.handle(&events, &query::path_view(&controller));
    }

    let ids: Vec<_> = enemies.iter().map(|enemy| enemy.id.get()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn enemies_still_despawn_when_a_tower_lands_on_their_next_tile() {
    let mut controller = GridController::new(GridConfig::default()).expect("grid");
    assert!(controller.request_build_at(TileCoord::new(3, 7)).is_ok());
    let mut enemies = Enemies::new(NavigatorConfig::default());

    let events = tick(&mut controller, Duration::from_millis(1500));
    enemies.handle(&events, &query::path_view(&controller));

    let detour = query::path_view(&controller)
        .chain_from(query::start_tile(&controller))
        .find(|tile| tile.column() == 7)
        .expect("detour passes column 7");
    let detour_position = query::path_view(&controller)
        .position_of(detour)
        .expect("detour position");
    let base = query::path_view(&controller)
        .position_of(query::base_tile(&controller))
        .expect("base position");

    let mut arrived = Vec::new();
    for _ in 0..2_000 {
        enemies.update(STEP, &query::path_view(&controller), base, &mut arrived);
        let enemy = enemies.iter().next().expect("enemy still walking");
        if enemy.position.distance(detour_position) < 40.0 {
            break;
        }
    }
    assert!(controller.request_build_at(detour).is_ok());

    for _ in 0..5_000 {
        enemies.update(STEP, &query::path_view(&controller), base, &mut arrived);
        if !arrived.is_empty() {
            break;
        }
    }

    assert_eq!(arrived, vec![EnemyId::new(0)]);
    assert!(enemies.is_empty());
}
