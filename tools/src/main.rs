//! spin-runner: headless driver for the prize wheel core.
//!
//! Usage:
//!   spin-runner --seed 12345 --spins 1000 --preset interleaved
//!   spin-runner --seed 12345 --config data/wheels/weighted.json
//!   spin-runner --seed 12345 --ipc-mode
//!   spin-runner --spins 3 --realtime

use anyhow::{anyhow, Result};
use prizewheel_core::{
    celebration::ConfettiPiece,
    clock::{Clock, ManualClock, SystemClock},
    config::WheelConfig,
    engine::WheelEngine,
    event::{SpinOutcome, WheelEvent},
    layout::WheelLayout,
    snapshot::FrameSnapshot,
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Ticks one spin may take before the runner gives up on it.
const MAX_SPIN_TICKS: u64 = 1_000_000;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Layout,
    Spin,
    Tick { count: u64 },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    frame: FrameSnapshot,
    events: Vec<WheelEvent>,
    last_outcome: Option<&'a SpinOutcome>,
    confetti: Vec<ConfettiPiece>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let spins = parse_arg(&args, "--spins", 1_000u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let realtime = args.iter().any(|a| a == "--realtime");
    let preset = string_arg(&args, "--preset").unwrap_or("test");
    let config_path = string_arg(&args, "--config");

    let config = match config_path {
        Some(path) => WheelConfig::load(path)?,
        None => WheelConfig::preset(preset).ok_or_else(|| anyhow!("Unknown preset: {preset}"))?,
    };

    if !ipc_mode {
        println!("Prize wheel: spin-runner");
        println!("  seed:      {seed}");
        println!("  spins:     {spins}");
        println!("  wheel:     {}", config_path.unwrap_or(preset));
        println!("  policy:    {:?}", config.motion.policy);
        println!();
    }

    if realtime {
        let mut engine = WheelEngine::new(config, seed, Box::new(SystemClock::new()))?;
        return run_realtime(&mut engine, spins);
    }

    let clock = ManualClock::new();
    let mut engine = WheelEngine::new(config, seed, Box::new(clock.clone()))?;
    if ipc_mode {
        run_ipc_loop(&mut engine, &clock)?;
    } else {
        let outcomes = run_batch(&mut engine, &clock, spins)?;
        print_summary(engine.layout(), &outcomes, &clock);
    }
    Ok(())
}

fn run_batch(engine: &mut WheelEngine, clock: &ManualClock, spins: u64) -> Result<Vec<SpinOutcome>> {
    let mut outcomes = Vec::with_capacity(spins as usize);
    for _ in 0..spins {
        engine
            .request_spin()
            .ok_or_else(|| anyhow!("wheel still spinning between batch spins"))?;
        let events = engine.run_until_idle(clock, MAX_SPIN_TICKS)?;
        outcomes.extend(events.into_iter().filter_map(|e| match e {
            WheelEvent::SpinCompleted { outcome, .. } => Some(outcome),
            _ => None,
        }));
    }
    Ok(outcomes)
}

/// Spin against the wall clock, sleeping one frame between ticks.
fn run_realtime(engine: &mut WheelEngine, spins: u64) -> Result<()> {
    let frame = Duration::from_millis(engine.config().motion.frame_interval_ms);
    let clock = SystemClock::new();
    for _ in 0..spins {
        engine.request_spin();
        let started = clock.now_ms();
        while engine.state().is_spinning {
            std::thread::sleep(frame);
            for event in engine.tick() {
                if let WheelEvent::SpinCompleted { outcome, .. } = event {
                    println!(
                        "  spin {} -> {} ({} ticks, {} ms)",
                        outcome.spin_id,
                        outcome.label,
                        outcome.ticks,
                        clock.now_ms() - started
                    );
                }
            }
        }
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut WheelEngine, clock: &ManualClock) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let frame = engine.config().motion.frame_interval_ms;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut events = Vec::new();
        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Layout => {
                writeln!(stdout, "{}", serde_json::to_string(engine.layout())?)?;
                stdout.flush()?;
                continue;
            }
            IpcCommand::Spin => {
                engine.request_spin();
            }
            IpcCommand::Tick { count } => {
                for _ in 0..count {
                    clock.advance(frame);
                    events.extend(engine.tick());
                }
            }
            IpcCommand::GetState => {}
        }

        let state = build_ui_state(engine, events);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &mut WheelEngine, events: Vec<WheelEvent>) -> UiState<'_> {
    let celebrate = events.iter().any(|e| {
        matches!(e, WheelEvent::SpinCompleted { outcome, .. } if outcome.celebrate)
    });
    let confetti = if celebrate { engine.celebration_burst() } else { Vec::new() };
    UiState {
        frame: engine.snapshot(),
        events,
        last_outcome: engine.last_outcome(),
        confetti,
    }
}

fn print_summary(layout: &WheelLayout, outcomes: &[SpinOutcome], clock: &ManualClock) {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for outcome in outcomes {
        *counts.entry(outcome.label.as_str()).or_default() += 1;
    }
    let total = outcomes.len().max(1) as f64;
    let mismatches = outcomes.iter().filter(|o| !o.matches_intent()).count();
    let avg_ticks = outcomes.iter().map(|o| o.ticks).sum::<u64>() as f64 / total;

    println!("=== RUN SUMMARY ===");
    println!("  spins:          {}", outcomes.len());
    println!("  avg ticks/spin: {avg_ticks:.1}");
    println!("  sim time:       {:.1}s", clock.now_ms() as f64 / 1000.0);
    println!("  mismatches:     {mismatches}");

    println!();
    println!("=== OUTCOMES ===");
    for (label, expected) in layout.label_probabilities() {
        let seen = counts.get(label.as_str()).copied().unwrap_or(0);
        println!(
            "  {:<14} | {:>7} | observed {:>6.2}% | weight {:>6.2}%",
            label,
            seen,
            seen as f64 / total * 100.0,
            expected * 100.0
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
