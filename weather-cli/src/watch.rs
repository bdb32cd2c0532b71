//! Interactive dashboard loop.
//!
//! Keystrokes become [`Command`]s on a channel; the loop owns the [`Dashboard`]
//! and at most one in-flight aggregation cycle.

use std::{future::Future, io::BufRead, pin::Pin};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use weather_core::{
    AggregationError, Command, Dashboard, Location, WeatherPanel, WeatherProvider, WeatherRecord,
    fetch_weather,
};

use crate::render;

type Cycle<'a> = Pin<Box<dyn Future<Output = Result<WeatherRecord, AggregationError>> + 'a>>;

pub async fn run(provider: &dyn WeatherProvider, location: &Location) -> anyhow::Result<()> {
    let (tx, commands) = mpsc::channel(8);

    let interrupt_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(Command::Quit).await;
        }
    });

    // Plain thread: a blocking stdin read must not hold up runtime shutdown.
    std::thread::spawn(move || read_commands(std::io::stdin().lock(), tx));

    println!("Enter: refresh, q: quit");

    run_loop(provider, location, commands, |record| {
        render::print_panel(&WeatherPanel::from(record));
    })
    .await;

    Ok(())
}

/// Drive the dashboard until `Quit` arrives or the channel closes.
///
/// Starts with an initial load. `on_update` sees every record that replaces
/// the held one; failed cycles are logged and leave it in place.
pub async fn run_loop(
    provider: &dyn WeatherProvider,
    location: &Location,
    mut commands: mpsc::Receiver<Command>,
    mut on_update: impl FnMut(&WeatherRecord),
) -> Dashboard {
    let mut dashboard = Dashboard::new();
    dashboard.begin_refresh();
    let mut in_flight: Option<Cycle<'_>> = Some(Box::pin(fetch_weather(provider, location)));

    loop {
        tokio::select! {
            outcome = next_outcome(&mut in_flight) => {
                in_flight = None;
                match dashboard.complete_refresh(outcome) {
                    Ok(record) => on_update(record),
                    Err(e) => warn!(error = %e, "Refresh failed; keeping previous record"),
                }
            }
            command = commands.recv() => match command {
                Some(Command::Refresh) => {
                    if dashboard.begin_refresh() {
                        in_flight = Some(Box::pin(fetch_weather(provider, location)));
                    } else {
                        info!("Refresh already in progress; ignoring");
                    }
                }
                Some(Command::Quit) | None => break,
            },
        }
    }

    // Dropping the cycle cancels both requests.
    if in_flight.take().is_some() {
        dashboard.cancel_refresh();
        debug!("Dropped in-flight refresh");
    }

    dashboard
}

async fn next_outcome(in_flight: &mut Option<Cycle<'_>>) -> Result<WeatherRecord, AggregationError> {
    match in_flight {
        Some(cycle) => cycle.await,
        None => std::future::pending().await,
    }
}

fn read_commands(input: impl BufRead, tx: mpsc::Sender<Command>) {
    for line in input.lines() {
        let command = match line {
            Ok(line) => parse_command(&line),
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                Command::Quit
            }
        };

        if tx.blocking_send(command).is_err() || command == Command::Quit {
            return;
        }
    }

    // EOF
    let _ = tx.blocking_send(Command::Quit);
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Refresh,
    }
}
