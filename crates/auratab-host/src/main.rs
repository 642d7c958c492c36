//! Aura Tab host shell
//!
//! Runs the three execution contexts (background, one tab, one popup)
//! over an in-process message router and a file-backed settings store,
//! and drives them from a small interactive command loop. Start a
//! second shell on the same store file to watch settings replicate
//! between instances.

use anyhow::Result;
use auratab_core::settings::schema;
use auratab_core::{
    BackgroundContext, ClockStyle, FileStore, MemoryStore, MemorySurface, MessageRouter,
    PopupContext, SettingValue, SettingsStore, SurfaceElement, TabContext, ThemeName, TimeFormat,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "auratab", about = "Aura Tab settings-sync shell")]
struct Args {
    /// Path to the settings document (defaults to the per-user config dir)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep settings in memory only; nothing is persisted
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let store: Arc<dyn SettingsStore> = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let path = args.store.unwrap_or_else(FileStore::default_path);
        match FileStore::open(&path) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!("could not open settings store ({err}); continuing in memory");
                Arc::new(MemoryStore::new())
            }
        }
    };

    let router = MessageRouter::new();
    let _background = BackgroundContext::start(Arc::clone(&store), &router).await;

    let surface = Arc::new(MemorySurface::new());
    let _tab = TabContext::start(Arc::clone(&store), &router, surface.clone()).await;

    let popup = PopupContext::start(store).await;

    println!("auratab shell - type 'help' for commands");
    run_command_loop(&popup, &surface).await;
    Ok(())
}

async fn run_command_loop(popup: &PopupContext, surface: &Arc<MemorySurface>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let rest: Vec<&str> = parts.collect();

        match command {
            "" => {}
            "help" => print_help(),
            "show" => print_surface(popup, surface),
            "get" => match rest.first().and_then(|raw| schema::resolve_key(raw)) {
                Some(key) => println!("{key} = {:?}", popup.settings().get(key)),
                None => println!("unknown setting key"),
            },
            "set" => run_set(popup, &rest).await,
            "theme" => match rest.first().and_then(|raw| ThemeName::parse(raw)) {
                Some(theme) => report(popup.set_theme(theme).await),
                None => println!("usage: theme <name|dynamic|system>"),
            },
            "format" => match rest.first().and_then(|raw| TimeFormat::parse(raw)) {
                Some(format) => report(popup.set_time_format(format).await),
                None => println!("usage: format <12|24>"),
            },
            "style" => match rest.first().and_then(|raw| ClockStyle::parse(raw)) {
                Some(style) => report(popup.set_clock_style(style).await),
                None => println!("usage: style <digital|analog|both>"),
            },
            "reset" => report(popup.reset().await),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}'; try 'help'"),
        }
    }
}

async fn run_set(popup: &PopupContext, rest: &[&str]) {
    let Some(raw_key) = rest.first() else {
        println!("usage: set <key> <value>");
        return;
    };
    let Some(key) = schema::resolve_key(raw_key) else {
        println!("unknown setting key '{raw_key}'");
        return;
    };
    let raw_value = rest[1..].join(" ");
    if raw_value.is_empty() {
        println!("usage: set <key> <value>");
        return;
    }

    // Accept JSON literals (true, 45, null, ["a"]); bare words fall
    // back to plain strings.
    let value = serde_json::from_str::<serde_json::Value>(&raw_value)
        .ok()
        .and_then(|json| SettingValue::from_json(&json))
        .unwrap_or(SettingValue::Text(raw_value));

    report(popup.settings().set(key, value).await);
}

/// Write failures are surfaced as a message, never a crash.
fn report(result: auratab_core::Result<()>) {
    if let Err(err) = result {
        println!("! {err}");
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!(
        "commands:\n  \
         show                 render the tab surface\n  \
         get <key>            read one setting\n  \
         set <key> <value>    write one setting (JSON or bare string)\n  \
         theme <name>         switch theme (dynamic, system, forest, ...)\n  \
         format <12|24>       switch time format\n  \
         style <digital|analog|both>\n  \
         reset                restore every default\n  \
         quit"
    );
}

fn print_surface(popup: &PopupContext, surface: &Arc<MemorySurface>) {
    let snapshot = popup.settings().snapshot();

    match surface.last_theme() {
        Some(theme) => println!(
            "theme : {} (text {}, background {})",
            theme.effective_theme, theme.data.text_color, theme.data.background_color
        ),
        None => println!("theme : (not applied yet)"),
    }

    let time = surface
        .text(SurfaceElement::DigitalTime)
        .unwrap_or_else(|| "--:--".to_string());
    let am_pm = match surface.is_visible(SurfaceElement::AmPm) {
        Some(true) => surface.text(SurfaceElement::AmPm).unwrap_or_default(),
        _ => String::new(),
    };
    println!(
        "clock : {time} {am_pm} (style {})",
        snapshot.clock_style().as_str()
    );

    if surface.is_visible(SurfaceElement::DateRow) == Some(true) {
        let date = surface.text(SurfaceElement::DateText).unwrap_or_default();
        let day = surface.text(SurfaceElement::DayText).unwrap_or_default();
        println!("date  : {date} {day}");
    } else {
        println!("date  : (hidden)");
    }

    if snapshot.clock_style().shows_analog() {
        println!(
            "hands : hour {:.1}° minute {:.1}° second {:.1}° (markers {})",
            surface.rotation(SurfaceElement::HourHand).unwrap_or(0.0),
            surface.rotation(SurfaceElement::MinuteHand).unwrap_or(0.0),
            surface.rotation(SurfaceElement::SecondHand).unwrap_or(0.0),
            if snapshot.show_markers() { "on" } else { "off" },
        );
    }

    println!(
        "grain : {}",
        if snapshot.show_grain() { "on" } else { "off" }
    );
}
