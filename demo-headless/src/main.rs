use clap::{Parser, ValueEnum};
use reactor_sim_core::{
    Catalog, GridCoord, PurchaseOutcome, ReactorSimulation, RemovalReason, SimError,
    SimulationConfig,
};
use tracing::{info, warn};

/// Starting reactor layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// One uranium rod in the middle of the grid, no cooling
    Lonely,
    /// Rods in every other column, each fed by a pipe column and a cooler
    Cooled,
    /// Mixed rods around a central pipe cross with heat sinks at the ends
    Cross,
}

/// Headless reactor simulation demo
#[derive(Parser, Debug)]
#[command(name = "reactor-sim-demo")]
#[command(about = "Thermal reactor grid simulation demo", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f64,

    /// Fixed time step in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Grid rows
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 5.0)]
    report_interval: f64,

    /// Starting layout
    #[arg(short, long, value_enum, default_value_t = Preset::Cooled)]
    preset: Preset,

    /// Fraction of the smaller capacity a single transfer may move (<= 0 disables the cap)
    #[arg(long, default_value_t = 0.25)]
    stability_fraction: f32,

    /// Print the final heat map
    #[arg(long)]
    heat_map: bool,
}

fn build_layout(sim: &mut ReactorSimulation, preset: Preset) -> Vec<(GridCoord, &'static str)> {
    let rows = sim.rows();
    let cols = sim.cols();
    let mut plan = Vec::new();

    match preset {
        Preset::Lonely => plan.push((GridCoord::new(rows / 2, cols / 2), "uranium_rod")),
        Preset::Cooled => {
            for col in (0..cols).step_by(3) {
                for row in 0..rows {
                    plan.push((GridCoord::new(row, col), "uranium_rod"));
                    if col + 1 < cols {
                        plan.push((GridCoord::new(row, col + 1), "pipe_mk4"));
                    }
                    if col + 2 < cols {
                        plan.push((GridCoord::new(row, col + 2), "lvl1_cooling"));
                    }
                }
            }
        }
        Preset::Cross => {
            let mid_row = rows / 2;
            let mid_col = cols / 2;
            for row in 0..rows {
                plan.push((GridCoord::new(row, mid_col), "pipe_mk3"));
            }
            for col in 0..cols {
                if col != mid_col {
                    plan.push((GridCoord::new(mid_row, col), "pipe_mk3"));
                }
            }
            let rods = ["uranium_rod", "yellow_rod", "red_rod", "blue_rod"];
            for row in 0..rows {
                for col in [mid_col.wrapping_sub(1), mid_col + 1] {
                    if col < cols && row != mid_row {
                        plan.push((GridCoord::new(row, col), rods[row % rods.len()]));
                    }
                }
            }
            plan.push((GridCoord::new(0, 0), "heat_sink"));
            plan.push((GridCoord::new(rows - 1, cols - 1), "heat_sink"));
        }
    }

    plan.retain(|(coord, name)| match sim.buy(*coord, name) {
        PurchaseOutcome::Placed => true,
        outcome => {
            warn!(%coord, name, ?outcome, "could not place object");
            false
        }
    });
    plan
}

fn print_heat_map(sim: &ReactorSimulation) {
    const SHADES: [char; 6] = [' ', '.', ':', 'o', 'O', '#'];
    let ratios = sim.heat_ratios();
    for row in 0..sim.rows() {
        let line: String = (0..sim.cols())
            .map(|col| {
                let coord = GridCoord::new(row, col);
                if sim.object_at(coord).is_none() {
                    return '_';
                }
                let ratio = ratios[coord.index(sim.cols())].clamp(0.0, 1.0);
                SHADES[((ratio * (SHADES.len() - 1) as f32).round() as usize).min(SHADES.len() - 1)]
            })
            .collect();
        println!("  |{line}|");
    }
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    if !args.dt.is_finite() || args.dt < 1e-6 {
        return Err(SimError::invalid_state(format!(
            "time step must be at least one microsecond, got {}",
            args.dt
        )));
    }

    println!("=== Reactor Simulation Demo ===\n");

    let mut config = SimulationConfig {
        rows: args.rows,
        cols: args.cols,
        ..SimulationConfig::default()
    };
    config.diffusion.stability_fraction =
        (args.stability_fraction > 0.0).then_some(args.stability_fraction);

    let mut sim = ReactorSimulation::new(config, Catalog::standard())?;
    println!("Created {}x{} reactor", sim.rows(), sim.cols());

    let placed = build_layout(&mut sim, args.preset);
    println!(
        "Placed {} objects ({:?} preset), balance {:.0}\n",
        placed.len(),
        args.preset,
        sim.ledger().balance()
    );
    info!(objects = placed.len(), "layout ready");

    println!("Time(s) | Tick  | Objects | Total Heat | Balance    | Expired | Overheated");
    println!("--------|-------|---------|------------|------------|---------|-----------");

    let mut expired = 0usize;
    let mut overheated = 0usize;
    let mut next_report = 0.0;
    while sim.now().value() < args.duration {
        let report = sim.advance(args.dt)?;
        for removal in &report.removals {
            match removal.reason {
                RemovalReason::Expired => expired += 1,
                RemovalReason::Overheated => overheated += 1,
            }
        }

        if report.now.value() >= next_report {
            let stats = sim.stats();
            println!(
                "{:7.1} | {:5} | {:7} | {:10.2} | {:10.1} | {:7} | {:10}",
                stats.elapsed.value(),
                stats.tick_count,
                stats.occupied_cells,
                stats.total_heat,
                stats.balance,
                expired,
                overheated
            );
            next_report += args.report_interval;
        }
    }

    let stats = sim.stats();
    println!("\n=== Simulation Complete ===");
    println!("Final time: {:.1}s over {} ticks", stats.elapsed.value(), stats.tick_count);
    println!(
        "Objects remaining: {} of {} cells",
        stats.occupied_cells, stats.total_cells
    );
    println!("Expired: {expired}, overheated: {overheated}");
    println!("Final balance: {:.1}", stats.balance);

    if args.heat_map {
        println!("\nHeat map (_ empty, ' ' cold .. '#' at capacity):");
        print_heat_map(&sim);
    }

    Ok(())
}
