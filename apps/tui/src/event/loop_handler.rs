use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;
use std::time::Duration;
use study_radar_tui::api::RemoteStore;
use study_radar_tui::cache::{ViewError, ViewStateCache};
use study_radar_tui::domain::History;
use study_radar_tui::nav::Route;
use study_radar_tui::render::{BarChartSpec, RadarSpec, RenderSession, TableSpec};
use tracing::{info, warn};

use crate::app::{handle_input, handle_mouse, App};
use crate::ui;

// Configure event poll timeout (ms)
const EVENT_POLL_TIMEOUT: u64 = 50;

/// Fetches once, prints the overview and progress views, and exits.
pub async fn run_headless(store: &dyn RemoteStore, route: &Route, json: bool) -> Result<()> {
    let report = build_headless_report(store, route).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_headless_report(&report);
    }

    Ok(())
}

#[derive(Serialize)]
struct HeadlessReport {
    last_reset: Option<String>,
    filter: Option<String>,
    radar: RadarSpec,
    bar: BarChartSpec,
    table: TableSpec,
    history: Option<HeadlessHistory>,
}

#[derive(Serialize)]
struct HeadlessHistory {
    module: String,
    days: History,
}

async fn build_headless_report(store: &dyn RemoteStore, route: &Route) -> Result<HeadlessReport> {
    let snapshot = store.fetch_snapshot().await?;
    info!(modules = snapshot.module_count(), "headless snapshot fetched");
    let last_reset = snapshot.last_reset().map(str::to_string);

    let mut cache = ViewStateCache::new();
    cache.replace(snapshot);
    cache.set_filter(route.module_filter().map(str::to_string));

    let mut session = RenderSession::new();
    if let Err(error) = session.render(&cache) {
        return Err(match error {
            ViewError::FilterNotFound {
                filter,
                suggestion: Some(name),
            } => eyre!("module \"{filter}\" does not exist (did you mean \"{name}\"?)"),
            other => eyre!(other),
        });
    }

    let history = match route.module_filter() {
        Some(name) => {
            let module = store.fetch_module(name).await?;
            Some(HeadlessHistory {
                module: module.name,
                days: module.history,
            })
        }
        None => None,
    };

    let (Some(radar), Some(bar), Some(table)) = (session.radar(), session.bar(), session.table())
    else {
        return Err(eyre!("nothing was rendered"));
    };

    Ok(HeadlessReport {
        last_reset,
        filter: cache.filter().map(str::to_string),
        radar: radar.clone(),
        bar: bar.clone(),
        table: table.clone(),
        history,
    })
}

fn print_headless_report(report: &HeadlessReport) {
    println!("\nStudy Radar");
    println!("===========");
    if let Some(day) = &report.last_reset {
        println!("Last reset: {day}");
    }

    println!("\nHistorical points by module:");
    for (_, axis) in report.radar.real_axes() {
        let points = axis.value.points().unwrap_or_default();
        println!("- {}: {points}", axis.label);
    }

    match &report.filter {
        Some(module) => println!("\nProgress ({module}):"),
        None => println!("\nProgress:"),
    }
    for (row, category) in report.table.rows.iter().zip(&report.bar.categories) {
        println!("- {} | {} ({})", category.label, row.status.label(), category.value);
    }

    if let Some(history) = &report.history {
        println!("\nHistory for {}:", history.module);
        for (day, points) in &history.days {
            println!("- {day}: {points}");
        }
    }
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    app.dashboard.request_refresh();

    loop {
        // Apply finished fetches and edits in arrival order
        app.drain_events();
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if !matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            // Nothing from the terminal; give background tasks a turn
            tokio::task::yield_now().await;
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                handle_input(app, key.code);
                if !app.running {
                    break;
                }
            }
            Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
            Ok(Event::Resize(width, height)) => {
                info!(width, height, "terminal resized");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to read terminal event"),
        }
    }

    Ok(())
}
