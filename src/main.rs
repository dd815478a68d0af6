//! Bubble Tea headless runner
//!
//! Plays a campaign with the scripted player on a fixed timestep and prints a
//! summary per level attempt. Useful for balance passes on level files.
//!
//! Usage: `bubble-tea [LEVELS.json] [--seed N] [--attempts N]`

#[cfg(not(target_arch = "wasm32"))]
use bubble_tea::LevelSet;
#[cfg(not(target_arch = "wasm32"))]
use bubble_tea::consts::{MAX_SUBSTEPS, SIM_DT};
#[cfg(not(target_arch = "wasm32"))]
use bubble_tea::sim::{GameEvent, GameState, LevelPhase, TickInput, autoplay, tick};

/// Seconds an order waits before the scripted player serves it
#[cfg(not(target_arch = "wasm32"))]
const SERVE_DELAY: f32 = 4.0;
/// Host frame length; several sim steps run per frame
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 0.05;
/// Hard stop for levels without a clock
#[cfg(not(target_arch = "wasm32"))]
const MAX_LEVEL_SECONDS: f32 = 600.0;

#[cfg(not(target_arch = "wasm32"))]
struct Args {
    levels: Option<String>,
    seed: u64,
    attempts: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        levels: None,
        seed: 1,
        attempts: 6,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = value.parse().map_err(|e| format!("bad seed '{}': {}", value, e))?;
            }
            "--attempts" => {
                let value = iter.next().ok_or("--attempts needs a value")?;
                args.attempts = value
                    .parse()
                    .map_err(|e| format!("bad attempt count '{}': {}", value, e))?;
            }
            _ if arg.starts_with("--") => return Err(format!("unknown option '{}'", arg)),
            _ => args.levels = Some(arg),
        }
    }
    Ok(args)
}

/// Run one attempt to completion with a fixed-timestep accumulator
#[cfg(not(target_arch = "wasm32"))]
fn play(state: &mut GameState) {
    let mut accumulator = 0.0;
    let input = TickInput::default();

    while !state.phase.is_finished() && state.elapsed < MAX_LEVEL_SECONDS {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        autoplay::serve(state, SERVE_DELAY);

        for event in state.drain_events() {
            match event {
                GameEvent::OrderFailed { index, result, .. } => {
                    log::warn!("Order {} rejected: {}", index, result.as_str());
                }
                GameEvent::OrderExpired { index } => log::debug!("Order {} walked out", index),
                _ => {}
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: bubble-tea [LEVELS.json] [--seed N] [--attempts N]");
            std::process::exit(2);
        }
    };

    let set = match &args.levels {
        Some(path) => match LevelSet::load(path) {
            Ok(set) => set,
            Err(e) => {
                log::error!("Failed to load levels: {}", e);
                std::process::exit(1);
            }
        },
        None => LevelSet::builtin(),
    };
    let Some(first) = set.get(0) else {
        log::error!("Campaign has no levels");
        std::process::exit(1);
    };

    log::info!("Bubble Tea starting with seed {}", args.seed);
    let mut current = 0;
    let mut state = GameState::new(first.clone(), args.seed);

    for attempt in 1..=args.attempts {
        play(&mut state);
        let snapshot = state.snapshot();
        println!(
            "#{:<2} {:<14} {:<7} ${:<4} (target ${}) rep {:.1}  served {} failed {} expired {}  {:.0}s",
            attempt,
            snapshot.level_name,
            format!("{:?}", snapshot.phase),
            snapshot.money,
            snapshot.target_money,
            snapshot.reputation,
            snapshot.stats.fulfilled,
            snapshot.stats.failed,
            snapshot.stats.expired,
            snapshot.elapsed,
        );

        let outcome = if state.phase.is_finished() {
            state.phase
        } else {
            LevelPhase::Lost
        };
        if outcome == LevelPhase::Won && current + 1 == set.len() {
            println!("Campaign complete");
            return;
        }
        let Some(next) = set.follow_up(current, outcome).and_then(|i| set.get(i).map(|l| (i, l))) else {
            break;
        };
        current = next.0;
        state.load_level(next.1.clone());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; hosts link the library directly
}
