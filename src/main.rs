//! Void Drift headless runner
//!
//! Plays one autopilot run at 60 Hz and logs the result:
//!
//! ```text
//! void-drift [tuning.json] [seconds]
//! ```
//!
//! The browser build is driven through `platform::web::WasmEngine` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use void_drift::consts::FRAME_DT;
    use void_drift::sim::GamePhase;
    use void_drift::{Command, Engine, TickInput, Tuning};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::warn!("Could not load tuning from {} ({}), using defaults", path, e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());

    log::info!("Void Drift (native) starting, seed {}, {:.0}s budget", seed, seconds);
    let mut engine = Engine::with_seed(tuning, seed);
    engine.set_identity("autopilot");
    engine.queue(Command::Start);

    let steps = (seconds / FRAME_DT).ceil() as u64;
    let mut snapshot = engine.update(FRAME_DT);
    for _ in 0..steps {
        if snapshot.phase == GamePhase::GameOver {
            break;
        }
        let input = TickInput::autopilot(engine.state(), engine.tuning());
        engine.queue_all([
            Command::Move(input.axis),
            Command::Strafe(input.strafe),
            Command::Aim(input.aim),
            Command::Fire(input.fire),
        ]);
        if input.shield_toggle {
            engine.queue(Command::ToggleShield);
        }
        snapshot = engine.update(FRAME_DT);
    }

    match snapshot.to_json() {
        Ok(json) => log::info!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not encode snapshot: {}", e),
    }
    match engine.take_run_summary() {
        Some(summary) => println!(
            "Run over: score {} in {:.1}s, wave {}, {} kills, level {}",
            summary.score, summary.duration, summary.wave, summary.kills, summary.level
        ),
        None => println!(
            "Survived {:.1}s: score {}, wave {}, {} kills, level {}",
            snapshot.elapsed, snapshot.score, snapshot.wave, snapshot.kills, snapshot.level
        ),
    }
    for (rank, entry) in engine.sink().ranked() {
        println!("#{:<2} {:>8}  {:>6.1}s  {}", rank, entry.score, entry.duration, entry.identity);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `WasmEngine`
}
