use anyhow::Result;
use clockface::document::ElementKind;
use clockface::prelude::*;
use clockface::{FACE_NAME, VERSION as LIB_VERSION};
use colored::Colorize;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

const LOGO_TEXT: &str = r"
   ___ _            _     __
  / __| |___  __ __| |__ / _|__ _ __ ___
 | (__| / _ \/ _/ _| / /|  _/ _` / _/ -_)
  \___|_\___/\__\__|_\_\|_| \__,_\__\___|
";

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            Cow::Owned(format!("{} {}", command.yellow().bold(), rest.yellow()))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", LOGO_TEXT.cyan());
    println!("{}", "-".repeat(64).dimmed());
    println!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", "-".repeat(64).dimmed());
}

fn print_help() {
    println!("Available commands:");
    println!("  tap [TARGET]          - Taps the root element (or TARGET).");
    println!("  hr <BPM>              - Delivers a heart-rate reading.");
    println!("  set <STAT> <N>        - Sets today's calories, steps, distance or azm.");
    println!("  pref <12h|24h>        - Changes the clock-display preference.");
    println!("  show                  - Prints the face as currently drawn.");
    println!("  start renders         - Begins printing every render.");
    println!("  stop renders          - Stops printing renders.");
    println!("  exit                  - Quits the shell.");
}

/// Prints the main copy of every label and icon.
async fn print_face(engine: &FaceEngine) {
    for element in engine.snapshot().await {
        if element.kind == ElementKind::Group || !element.name.ends_with("Main") {
            continue;
        }
        println!("  {:<16} {}", element.name.dimmed(), element.value.bold());
    }
}

/// Spawns a task that reports system events, optionally including every render.
fn spawn_event_listeners(engine: &FaceEngine, is_following_renders: Arc<AtomicBool>) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            match event {
                SystemEvent::Rendered { cause, writes } => {
                    if is_following_renders.load(Ordering::Relaxed) {
                        println!("<-- [RENDER] {:?} ({} writes)", cause, writes);
                    }
                }
                SystemEvent::RenderFailed { cause, error } => {
                    println!("<-- {} {:?}: {}", "[RENDER FAILED]".red(), cause, error);
                }
                SystemEvent::InputDropped { target } => {
                    println!("<-- [DROPPED] Tap on '{}' ignored.", target);
                }
                other => println!("\n<-- [SYSTEM EVENT] {:?}\n>> ", other),
            }
        }
    });
}

async fn set_stat(engine: &FaceEngine, stat: &str, value: u32) -> bool {
    let known = matches!(stat, "calories" | "steps" | "distance" | "azm");
    if known {
        engine
            .update_activity(|today| match stat {
                "calories" => today.calories = value,
                "steps" => today.steps = value,
                "distance" => today.distance = value,
                _ => today.active_zone_minutes = value,
            })
            .await;
    }
    known
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = FaceConfig::load(env::args().nth(1).as_deref())?;
    let engine = FaceEngine::new(config);
    let engine_handle = engine.clone();

    let is_following_renders = Arc::new(AtomicBool::new(false));
    spawn_event_listeners(&engine_handle, is_following_renders.clone());

    info!("Spawning {} in the background...", FACE_NAME.cyan());
    tokio::spawn(async move {
        if let Err(e) = engine.run().await {
            eprintln!("\nEngine stopped with an error: {}", e);
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", FACE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();

                match args.as_slice() {
                    ["tap"] => {
                        engine_handle.tap();
                        println!("--> Tapped the face.");
                    }
                    ["tap", target] => {
                        engine_handle.click(*target);
                        println!("--> Tapped '{}'.", target);
                    }
                    ["hr", bpm] => match bpm.parse::<u32>() {
                        Ok(bpm) => {
                            engine_handle.push_heart_rate(bpm);
                            println!("--> Delivered a {} bpm reading.", bpm);
                        }
                        Err(_) => println!("Error: '{}' is not a valid heart rate.", bpm),
                    },
                    ["set", stat, value] => match value.parse::<u32>() {
                        Ok(value) => {
                            if set_stat(&engine_handle, stat, value).await {
                                println!("--> {} is now {}. Shown on the next refresh.", stat, value);
                            } else {
                                println!("Unknown stat '{}'. Try calories, steps, distance or azm.", stat);
                            }
                        }
                        Err(_) => println!("Error: '{}' is not a valid number.", value),
                    },
                    ["pref", "12h"] | ["pref", "24h"] => {
                        let display = ClockDisplay::from_preference(args[1]);
                        engine_handle.set_clock_display(display).await;
                        println!("--> Clock display set to {}. Shown on the next tick.", display);
                    }
                    ["pref", ..] => println!("Usage: pref <12h|24h>"),
                    ["show"] => print_face(&engine_handle).await,
                    ["start", "renders"] => {
                        is_following_renders.store(true, Ordering::Relaxed);
                        println!("--> Started printing renders.");
                    }
                    ["stop", "renders"] => {
                        is_following_renders.store(false, Ordering::Relaxed);
                        println!("--> Stopped printing renders.");
                    }
                    ["help"] => print_help(),
                    ["exit"] => break,
                    [] => {}
                    _ => println!("Unknown command: '{}'. Type 'help'.", line),
                }
            }
            Err(_) => {
                println!("Exiting faceshell...");
                break;
            }
        }
    }

    Ok(())
}
