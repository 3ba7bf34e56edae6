//! Terminal front-end: drives a character view from stdin commands.
//!
//! Plain lines are search box keystrokes (debounced). Commands start with `/`:
//! `/search TEXT`, `/page N`, `/size N`, `/sort COLUMN [asc|desc|none]`,
//! `/detail ID`, `/export`, `/refresh`, `/reload`, `/quit`.

use anyhow::{Context, Result};
use castboard::catalog::CharacterCatalog;
use castboard::controller::{ViewController, ViewHandle, ViewSnapshot};
use castboard::data::{SortColumn, SortDirection, TableSort};
use castboard::services::{DetailPresenter, ViewServices};
use castboard::settings::{ViewSettings, default_settings_path};
use castboard::settings_watcher::{SettingsEvent, SettingsWatcher};
use castboard::types::CharacterRecord;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "castboard", about = "Browse characters page by page from the terminal")]
struct Args {
    /// JSON catalog to serve pages from (array of characters or {"data": [...]})
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Settings file (defaults to the platform config dir)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Where /export writes the chart
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Artificial latency per page, in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
}

struct StdoutPresenter;

impl DetailPresenter for StdoutPresenter {
    fn present(&self, record: &CharacterRecord) {
        println!("== {} ({})", record.name, record.id);
        if !record.alignment.is_empty() {
            println!("   alignment: {}", record.alignment);
        }
        println!("   films: {}", record.films.join(", "));
        println!("   short films: {}", record.short_films.join(", "));
        println!("   tv shows: {}", record.tv_shows.join(", "));
        println!("   video games: {}", record.video_games.join(", "));
        println!("   park attractions: {}", record.park_attractions.join(", "));
        if !record.source_url.is_empty() {
            println!("   source: {}", record.source_url);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let settings_path = args.settings.clone().or_else(default_settings_path);
    let mut settings = match &settings_path {
        Some(path) if path.exists() => ViewSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        _ => ViewSettings::default(),
    };
    settings = settings.apply_env(|key| std::env::var(key).ok())?;
    if let Some(export) = args.export {
        settings.export_path = export;
    }

    let catalog_path = args
        .catalog
        .or_else(|| settings.catalog_path.clone())
        .context("no catalog given (use --catalog or CASTBOARD_CATALOG)")?;
    let catalog = Arc::new(
        CharacterCatalog::from_file(&catalog_path)?
            .with_latency(Duration::from_millis(args.latency_ms)),
    );
    tracing::info!(records = catalog.len(), "Catalog ready");

    let services = ViewServices::headless(&settings.export_path).with_detail(Arc::new(StdoutPresenter));
    let slow_threshold = settings.slow_fetch_threshold();
    let view = ViewController::new(settings, catalog.clone(), services).spawn();

    let printer = tokio::spawn(print_snapshots(view.snapshots()));
    let mut watcher = settings_path
        .filter(|p| p.exists())
        .and_then(|p| SettingsWatcher::new(p).ok());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(500));
    let mut warned_slow = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(&view, &catalog, line.trim_end()) {
                    break;
                }
            }
            _ = tick.tick() => {
                let snapshot = view.current();
                let slow = snapshot.is_slow(tokio::time::Instant::now(), slow_threshold);
                if slow && !warned_slow {
                    println!("(still loading...)");
                }
                warned_slow = slow;
                if let Some(watcher) = watcher.as_mut() {
                    reload_settings(&view, watcher);
                }
            }
        }
    }

    view.shutdown().await;
    printer.abort();
    Ok(())
}

/// Route one input line. Returns false on `/quit`.
fn dispatch(view: &ViewHandle, catalog: &CharacterCatalog, line: &str) -> bool {
    let Some(command) = line.strip_prefix('/') else {
        view.type_filter(line);
        return true;
    };

    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    match name {
        "quit" | "q" => return false,
        "search" => view.submit_filter(rest),
        "page" => match rest.parse() {
            Ok(page) => view.request_page(page),
            Err(_) => println!("usage: /page N"),
        },
        "size" => match rest.parse() {
            Ok(size) => view.request_page_size(size),
            Err(_) => println!("usage: /size N"),
        },
        "sort" => {
            let mut words = rest.split_whitespace();
            let column = words.next().and_then(SortColumn::parse);
            let direction = SortDirection::parse(words.next().unwrap_or("asc"));
            match (column, direction) {
                (Some(column), Some(direction)) => view.sort(TableSort::new(column, direction)),
                _ => println!("usage: /sort name|tv|games|allies|enemies [asc|desc|none]"),
            }
        }
        "detail" => view.open_detail(rest),
        "export" => view.export(),
        "refresh" => view.refresh(),
        "reload" => match catalog.reload() {
            Ok(_) => view.refresh(),
            Err(e) => println!("reload failed: {}", e),
        },
        _ => println!("unknown command: /{}", name),
    }
    true
}

fn reload_settings(view: &ViewHandle, watcher: &mut SettingsWatcher) {
    match watcher.poll() {
        Some(SettingsEvent::Modified | SettingsEvent::Created) => {
            tracing::info!("Settings file changed, reloading...");
            match ViewSettings::load_from(watcher.path()) {
                Ok(settings) => view.set_page_size_options(settings.page_size_options),
                Err(e) => tracing::warn!("Keeping previous settings: {}", e),
            }
        }
        Some(SettingsEvent::Deleted) => tracing::warn!("Settings file deleted"),
        Some(SettingsEvent::Error(e)) => tracing::error!("Settings watch error: {}", e),
        None => {}
    }
}

async fn print_snapshots(mut rx: tokio::sync::watch::Receiver<ViewSnapshot>) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        render(&snapshot);
    }
}

fn render(snapshot: &ViewSnapshot) {
    if snapshot.is_loading() {
        println!("loading...");
        return;
    }
    if let Some(message) = &snapshot.announcement {
        println!("[{}]", message);
    }
    if let Some(error) = &snapshot.error {
        println!("! {}", error);
    }

    println!(
        "{:<32} {:>8} {:>11}  {:<24} {:<24}",
        "Name", "TV Shows", "Video Games", "Allies", "Enemies"
    );
    for row in snapshot.rows() {
        println!(
            "{:<32} {:>8} {:>11}  {:<24} {:<24}",
            row.name,
            row.tv_show_count,
            row.video_game_count,
            row.allies.join(", "),
            row.enemies.join(", ")
        );
    }

    let chart = &snapshot.projection.chart;
    println!("-- {} ({} films)", chart.title, chart.total());
    for (i, point) in chart.points.iter().enumerate().filter(|(_, p)| p.value > 0) {
        let pct = chart.percentage(i).unwrap_or_default();
        println!("   {:<32} {:>3}  {:>6.2}%", point.label, point.value, pct);
    }

    let paginator = &snapshot.paginator;
    println!(
        "{} | page size {} of {:?}",
        snapshot.range_label(),
        paginator.page_size(),
        paginator.selectable_page_sizes()
    );
}
