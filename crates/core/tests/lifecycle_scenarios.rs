//! Reactor-level scenarios: expiry, overheat, placement guard, removal and
//! the shop flow, driven through `ReactorSimulation`.

use reactor_sim_core::{
    Catalog, CatalogEntry, Category, GridCoord, PurchaseOutcome, ReactorSimulation,
    RemovalReason, Seconds, SimulationConfig,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn reactor() -> ReactorSimulation {
    let config = SimulationConfig {
        rows: 3,
        cols: 3,
        starting_balance: 1_000.0,
        ..SimulationConfig::default()
    };
    ReactorSimulation::new(config, Catalog::standard()).unwrap()
}

fn assert_cell_cleared(sim: &ReactorSimulation, coord: GridCoord) {
    let field = sim.field();
    assert_eq!(field.heat(coord).unwrap(), 0.0);
    assert_eq!(field.generation(coord).unwrap(), 0.0);
    assert_eq!(field.capacity(coord).unwrap(), 0.0);
    assert_eq!(field.conductivity(coord).unwrap(), 0.0);
    assert_eq!(sim.is_occupied(coord), Ok(false));
}

#[test]
fn test_timed_object_expires_at_timeout() {
    let mut sim = reactor();
    let coord = GridCoord::new(1, 1);
    let battery = CatalogEntry::new("battery", Category::Systems, 5)
        .with_timeout(15)
        .with_income(1.0)
        .with_thermal(0.0, 10.0, 0.0);
    assert!(sim.place(coord, &battery));

    let report = sim.advance(14.9).unwrap();
    assert!(report.removals.is_empty());
    assert_eq!(sim.is_occupied(coord), Ok(true));
    let ratio = sim.remaining_time_ratio(coord).unwrap().unwrap();
    assert!((ratio - 0.1 / 15.0).abs() < 1e-5);

    let report = sim.advance(0.1).unwrap();
    assert_eq!(report.now, Seconds::new(15.0));
    assert_eq!(report.removals.len(), 1);
    assert_eq!(report.removals[0].reason, RemovalReason::Expired);
    assert_eq!(report.removals[0].object.name, "battery");
    assert_cell_cleared(&sim, coord);
}

#[test]
fn test_fractional_steps_expire_on_the_exact_tick() {
    let config = SimulationConfig {
        rows: 1,
        cols: 2,
        ..SimulationConfig::default()
    };
    let mut sim = ReactorSimulation::new(config, Catalog::standard()).unwrap();
    let battery = CatalogEntry::new("battery", Category::Systems, 5)
        .with_timeout(15)
        .with_thermal(0.0, 10.0, 0.0);
    let first = GridCoord::new(0, 0);
    let second = GridCoord::new(0, 1);
    assert!(sim.place(first, &battery));

    let mut expirations = Vec::new();
    for _ in 0..200 {
        if sim.stats().tick_count == 3 {
            assert!(sim.place(second, &battery));
        }
        let report = sim.advance(0.1).unwrap();
        for removal in &report.removals {
            assert_eq!(removal.reason, RemovalReason::Expired);
            expirations.push((removal.coord, report.tick, report.now));
        }
        if report.tick == 149 {
            let ratio = sim.remaining_time_ratio(first).unwrap().unwrap();
            assert!((ratio - 0.1 / 15.0).abs() < 1e-6);
        }
    }

    assert_eq!(
        expirations,
        vec![
            (first, 150, Seconds::new(15.0)),
            (second, 153, Seconds::new(15.3)),
        ]
    );
}

#[test]
fn test_isolated_producer_overheats_on_first_full_tick() {
    let mut sim = reactor();
    let coord = GridCoord::new(0, 0);
    let hot = CatalogEntry::new("hot_rod", Category::Fuel, 5)
        .with_timeout(100)
        .with_thermal(5.0, 5.0, 0.0);
    assert!(sim.place(coord, &hot));

    let report = sim.advance(0.5).unwrap();
    assert!(report.removals.is_empty());
    assert_eq!(sim.object_at(coord).unwrap().current_heat, 2.5);

    let report = sim.advance(0.5).unwrap();
    assert_eq!(report.removals.len(), 1);
    assert_eq!(report.removals[0].reason, RemovalReason::Overheated);
    assert_eq!(report.removals[0].object.current_heat, 5.0);
    assert_cell_cleared(&sim, coord);
}

#[test]
fn test_pipe_keeps_rod_alive_until_expiry() {
    let mut sim = reactor();
    let lonely = GridCoord::new(0, 0);
    let cooled = GridCoord::new(2, 1);
    let pipe = GridCoord::new(2, 2);

    assert_eq!(sim.buy(lonely, "uranium_rod"), PurchaseOutcome::Placed);
    assert_eq!(sim.buy(cooled, "uranium_rod"), PurchaseOutcome::Placed);
    assert_eq!(sim.buy(pipe, "pipe_mk4"), PurchaseOutcome::Placed);

    let mut removals = Vec::new();
    for _ in 0..15 {
        let report = sim.advance(1.0).unwrap();
        for removal in report.removals {
            removals.push((sim.stats().tick_count, removal.coord, removal.reason));
        }
    }

    assert_eq!(
        removals,
        vec![
            (5, lonely, RemovalReason::Overheated),
            (15, cooled, RemovalReason::Expired),
        ]
    );
    assert!(sim.field().heat(pipe).unwrap() > 0.0);
    assert_eq!(sim.is_occupied(pipe), Ok(true));
}

#[test]
fn test_place_on_occupied_cell_is_refused() {
    let mut sim = reactor();
    let coord = GridCoord::new(2, 2);
    let rod = sim.catalog().get("red_rod").unwrap().clone();
    let pipe = sim.catalog().get("pipe").unwrap().clone();

    assert!(sim.place(coord, &rod));
    sim.advance(1.0).unwrap();
    let field_before = sim.field().clone();
    let object_before = sim.object_at(coord).cloned();

    assert!(!sim.place(coord, &pipe));
    assert_eq!(sim.field().heat_field(), field_before.heat_field());
    assert_eq!(sim.field().capacity_field(), field_before.capacity_field());
    assert_eq!(sim.field().generation_field(), field_before.generation_field());
    assert_eq!(sim.field().conductivity_field(), field_before.conductivity_field());
    assert_eq!(sim.object_at(coord).cloned(), object_before);
}

#[test]
fn test_manual_removal_clears_cell() {
    let mut sim = reactor();
    let coord = GridCoord::new(1, 2);
    assert_eq!(sim.buy(coord, "yellow_rod"), PurchaseOutcome::Placed);
    sim.advance(2.0).unwrap();
    assert!(sim.heat_ratio(coord).unwrap() > 0.0);

    let removed = sim.remove(coord).unwrap();
    assert_eq!(removed.name, "yellow_rod");
    assert_cell_cleared(&sim, coord);
    assert!(sim.remove(coord).is_none());
}

#[test]
fn test_shop_flow_and_income() {
    let mut sim = reactor();
    let start = sim.ledger().balance();

    assert_eq!(sim.buy(GridCoord::new(0, 0), "uranium_rod"), PurchaseOutcome::Placed);
    assert_eq!(sim.buy(GridCoord::new(0, 2), "uranium_rod"), PurchaseOutcome::Placed);
    assert_eq!(sim.ledger().balance(), start - 20.0);

    for _ in 0..3 {
        sim.advance(1.0).unwrap();
    }
    let stats = sim.stats();
    assert_eq!(stats.tick_count, 3);
    assert_eq!(stats.elapsed, Seconds::new(3.0));
    assert_eq!(stats.occupied_cells, 2);
    assert_eq!(stats.total_cells, 9);
    assert_eq!(stats.balance, start - 20.0 + 6.0);

    sim.ledger_mut().try_spend(970);
    assert_eq!(
        sim.buy(GridCoord::new(1, 1), "yellow_rod"),
        PurchaseOutcome::InsufficientFunds
    );
}
