//! Space Invaders entry point
//!
//! Runs the engine with an autopilot (or a scripted key timeline) feeding the
//! event stream, and an ASCII surface standing in for a real display.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use space_invaders::Session;
use space_invaders::platform::{
    Autopilot, GameEvent, InputAdapter, Scheduled, Timeline, spawn_timer,
};
use space_invaders::renderer::TextSurface;
use space_invaders::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "space-invaders", about = "Deterministic Space Invaders engine demo")]
struct Args {
    /// Settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for enemy fire; overrides the settings file
    #[arg(long)]
    seed: Option<u32>,

    /// Number of timer ticks to simulate
    #[arg(long, default_value_t = 6000)]
    ticks: u64,

    /// Replay key events from a JSON file instead of using the autopilot
    #[arg(long)]
    script: Option<PathBuf>,

    /// Pace ticks with a real timer instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Print a frame every N ticks; overrides the settings file
    #[arg(long)]
    frames: Option<u64>,

    /// Print the final world state as JSON
    #[arg(long)]
    dump_state: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load_or_default(args.settings.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_filter.as_str()),
    )
    .init();

    let seed = args
        .seed
        .or(settings.seed)
        .unwrap_or_else(rand::random::<u32>);
    let frame_every = args.frames.unwrap_or(settings.frame_every);
    log::info!("Space Invaders starting with seed {}", seed);

    let input = InputAdapter::new(settings.keys.clone());
    let mut session = Session::new(seed, input, TextSurface::new());
    let print_frame = |session: &Session<TextSurface>, n: u64| {
        if frame_every > 0 && n % frame_every == 0 {
            println!(
                "{}\n",
                session
                    .surface()
                    .render(settings.frame_cols, settings.frame_rows)
            );
        }
    };

    if let Some(path) = &args.script {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let inputs: Vec<Scheduled> = serde_json::from_str(&json)
            .with_context(|| format!("parsing script {}", path.display()))?;
        log::info!("Replaying {} scripted key events", inputs.len());
        let period = Duration::from_millis(settings.tick_period_ms);
        for event in Timeline::new(period, inputs, args.ticks) {
            session.handle(event);
            if let GameEvent::Timer(n) = event {
                print_frame(&session, n);
            }
        }
    } else if args.realtime {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let timer = spawn_timer(
            Duration::from_millis(settings.tick_period_ms),
            tx,
            stop.clone(),
        );
        let mut pilot = Autopilot::new(u64::from(seed), settings.keys.clone());
        while let Ok(event) = rx.recv() {
            if let GameEvent::Timer(n) = event {
                for key in pilot.poll(session.state()) {
                    session.handle(GameEvent::Key(key));
                }
                session.handle(event);
                print_frame(&session, n);
                if n + 1 >= args.ticks {
                    break;
                }
            }
        }
        stop.store(true, Ordering::Relaxed);
        drop(rx);
        if timer.join().is_err() {
            log::warn!("Timer thread panicked");
        }
    } else {
        let mut pilot = Autopilot::new(u64::from(seed), settings.keys.clone());
        for n in 0..args.ticks {
            for key in pilot.poll(session.state()) {
                session.handle(GameEvent::Key(key));
            }
            session.handle(GameEvent::Timer(n));
            print_frame(&session, n);
        }
    }

    let state = session.state();
    println!("{}", session.surface().hud_line());
    log::info!(
        "Finished after {} events: level {}, score {}, lives {}",
        session.events_handled(),
        state.level,
        state.score,
        state.lives
    );

    if args.dump_state {
        println!("{}", serde_json::to_string_pretty(state)?);
    }

    Ok(())
}
