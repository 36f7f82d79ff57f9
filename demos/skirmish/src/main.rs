//! skirmish — a small street fight for the squad simulation core.
//!
//! Two agents walk into a walled yard guarded by a patrol, with police on
//! the street and civilians in between.  One agent carries an Uzi, the
//! other a persuadotron.
//!
//! ```text
//! cargo run -p skirmish -- [seed] [civilian-behaviour]
//! RUST_LOG=debug cargo run -p skirmish
//! ```
//!
//! `civilian-behaviour` names a standard component set (`civilian`,
//! `criminal`, `guard`, ...) used for the bystanders.

use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use sq_action::{Action, ActionKind};
use sq_agent::{PedBuilder, PedKind, WeaponClass};
use sq_behavior::ComponentSet;
use sq_core::{MapSize, PedId, SimConfig, Tick, TilePoint};
use sq_sim::{Death, MissionBuilder, SimObserver, TickReport};
use sq_spatial::{TileGrid, TileKind};

// ── Constants ─────────────────────────────────────────────────────────────────

const MAP_W:      i32 = 24;
const MAP_H:      i32 = 16;
const FRAME_MS:   u32 = 50;
const SIM_SECS:   u64 = 60;
const SUMMARY_MS: u64 = 5_000;

// ── Map ───────────────────────────────────────────────────────────────────────

/// A street along y = 0..2, a fenced yard in the north-east corner, and a
/// solid block between them with one gap.
fn build_map() -> Result<TileGrid> {
    let mut g = TileGrid::new(MapSize::new(MAP_W, MAP_H, 1));
    g.fill((0, 0, 0), (MAP_W - 1, 2, 0), TileKind::Road)?;
    g.fill((0, 3, 0), (MAP_W - 1, MAP_H - 1, 0), TileKind::Floor)?;
    g.fill((4, 6, 0), (15, 7, 0), TileKind::Solid)?;
    g.set(10, 6, 0, TileKind::Floor)?;
    g.set(10, 7, 0, TileKind::Floor)?;
    g.fill((14, 9, 0), (14, MAP_H - 1, 0), TileKind::Fence)?;
    g.set(14, 11, 0, TileKind::Floor)?;
    Ok(g)
}

fn tile(x: i32, y: i32) -> TilePoint {
    TilePoint::tile(x, y, 0)
}

// ── Observer ──────────────────────────────────────────────────────────────────

struct Narrator {
    frame_ms:  u64,
    deaths:    Vec<(Tick, Death)>,
    last_seen: Option<TickReport>,
}

impl Narrator {
    fn new(frame_ms: u32) -> Self {
        Self { frame_ms: frame_ms as u64, deaths: Vec::new(), last_seen: None }
    }
}

impl SimObserver for Narrator {
    fn on_ped_died(&mut self, tick: Tick, death: &Death) {
        match death.killer {
            Some(k) => info!("{tick}: {} shot by {k}", death.ped),
            None => info!("{tick}: {} died", death.ped),
        }
        self.deaths.push((tick, *death));
    }

    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        if (tick.0 * self.frame_ms) % SUMMARY_MS == 0 {
            info!("{tick}: {} alive, {} moving", report.alive, report.moved);
        }
        self.last_seen = Some(report.clone());
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!("finished at {final_tick}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("seed {s:?} is not a number"))?,
        None => 42,
    };
    let bystanders: ComponentSet = match args.next() {
        Some(s) => s.parse().with_context(|| format!("unknown behaviour {s:?}"))?,
        None => ComponentSet::Civilian,
    };

    let config = SimConfig {
        frame_ms:    FRAME_MS,
        total_ticks: SIM_SECS * 1_000 / FRAME_MS as u64,
        seed,
        ..SimConfig::default()
    };
    println!("=== skirmish ===");
    println!("Map: {MAP_W}x{MAP_H}  |  Seconds: {SIM_SECS}  |  Seed: {seed}  |  Bystanders: {bystanders}");
    println!();

    let mut builder = MissionBuilder::new(config.clone(), build_map()?)
        .ped(PedBuilder::new(PedKind::Agent).at(tile(2, 4)).weapon(WeaponClass::Uzi).heart_level(1).drawn())
        .ped(PedBuilder::new(PedKind::Agent).at(tile(3, 4)).weapon(WeaponClass::Persuadotron).drawn())
        .patrol(
            PedBuilder::new(PedKind::Guard).at(tile(18, 10)).weapon(WeaponClass::Pistol),
            vec![tile(18, 14), tile(21, 14), tile(21, 10), tile(18, 10)],
        )
        .patrol(
            PedBuilder::new(PedKind::Guard).at(tile(16, 12)).weapon(WeaponClass::Shotgun),
            vec![tile(16, 9), tile(16, 14)],
        )
        .patrol(
            PedBuilder::new(PedKind::Police).at(tile(1, 1)).weapon(WeaponClass::Pistol),
            vec![tile(22, 1), tile(1, 1)],
        )
        .vehicle(tile(6, 1), 4, 20)
        .ground_weapon(WeaponClass::Laser, tile(9, 10));
    for (x, y) in [(6, 4), (8, 9), (12, 4), (5, 12)] {
        builder = builder.ped_with(PedBuilder::new(PedKind::Civilian).at(tile(x, y)), bystanders);
    }
    let mut sim = builder.build()?;

    // The gunman heads for the yard gate; the talker works the crowd.
    let (gunman, talker) = (PedId(0), PedId(1));
    sim.mission.order(gunman, Action::new(ActionKind::Walk { dest: tile(10, 8), run: false }), false)?;
    sim.mission.order(gunman, Action::new(ActionKind::Walk { dest: tile(14, 11), run: true }), true)?;
    sim.mission.order(talker, Action::new(ActionKind::Walk { dest: tile(7, 9), run: false }), false)?;
    sim.mission.order(talker, Action::new(ActionKind::Walk { dest: tile(6, 12), run: false }), true)?;

    let mut narrator = Narrator::new(config.frame_ms);
    let t0 = Instant::now();
    sim.run(&mut narrator);
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("Casualties: {}", narrator.deaths.len());
    if let Some(report) = &narrator.last_seen {
        println!("Alive at the end: {}", report.alive);
    }
    println!();

    println!("{:<10} {:<10} {:<10} {:<8} {:<12}", "Ped", "Kind", "Side", "Health", "Tile");
    println!("{}", "-".repeat(52));
    for ped in &sim.mission.peds.peds {
        let p = ped.position;
        println!(
            "{:<10} {:<10} {:<10} {:<8} ({},{},{})",
            ped.id.to_string(),
            format!("{:?}", ped.kind),
            format!("{:?}", ped.side),
            ped.health,
            p.tx,
            p.ty,
            p.tz,
        );
    }
    Ok(())
}
