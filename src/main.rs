use std::collections::HashMap;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wx_dashboard::api::RequestLimits;
use wx_dashboard::chart::{ChartPanel, ChartSyncController, MemoryPanel};
use wx_dashboard::common::AppState;
use wx_dashboard::config::Config;
use wx_dashboard::input::{self, AdminCommand, Input};
use wx_dashboard::present::LogSurface;
use wx_dashboard::services::directory;
use wx_dashboard::sync::{Command, Dashboard};
use wx_dashboard::view::persist::load_view_state;
use wx_dashboard::view::{FileStore, PanelId, ViewDefaults};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wx_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wx-dashboard...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        api = %config.api_base_url,
        state_file = %config.state_file.display(),
        "Configuration loaded"
    );

    let app = AppState::new(config.clone())?;
    tracing::info!("Weather API client initialized");

    // Restore the view (never fails; bad or missing settings fall back to defaults)
    let store = FileStore::new(&config.state_file);
    let view = load_view_state(&store, &ViewDefaults::from_config(&config));
    let name = directory::station_name(&app, view.station_id()).await;
    tracing::info!(station = view.station_id(), name = %name, "View restored");

    let panels: HashMap<PanelId, MemoryPanel> = PanelId::ALL
        .into_iter()
        .map(|id| (id, MemoryPanel::new(id)))
        .collect();
    let charts = ChartSyncController::new(
        panels
            .values()
            .cloned()
            .map(|p| Box::new(p) as Box<dyn ChartPanel>)
            .collect(),
    );

    let mut dashboard = Dashboard::new(
        app.client.clone(),
        RequestLimits::from_config(&config),
        view,
        Box::new(store),
        charts,
        Box::new(LogSurface),
    );

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(read_commands(app, panels, tx));

    dashboard.run(rx, shutdown_signal()).await;

    tracing::info!("Dashboard shut down gracefully");
    Ok(())
}

/// Feed stdin lines into the dashboard; directory commands run here directly.
async fn read_commands(
    app: AppState,
    panels: HashMap<PanelId, MemoryPanel>,
    tx: mpsc::Sender<Command>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read command");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match input::parse_line(&line) {
            Ok(Input::Dashboard(command)) => {
                // The headless panel plays the part of the chart the user dragged
                if let Command::PanOrZoom { panel, range } = &command
                    && let Some(origin) = panels.get(panel)
                {
                    origin.gesture(*range);
                }
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(Input::Admin(command)) => run_admin(&app, command).await,
            Err(e) => tracing::warn!(error = %e, "Ignoring command"),
        }
    }

    tracing::info!("Input closed");
}

async fn run_admin(app: &AppState, command: AdminCommand) {
    let result = match command {
        AdminCommand::ListStations => directory::list_stations(app).await.map(|stations| {
            for station in stations.iter() {
                tracing::info!(id = %station.id, name = %station.name, "Station");
            }
        }),
        AdminCommand::AddStation { id, name } => {
            directory::register_station(app, &id, &name).await
        }
        AdminCommand::RemoveStation(id) => directory::remove_station(app, &id).await,
        AdminCommand::WhoAmI => directory::whoami(app).await.map(|me| {
            tracing::info!(username = %me.username, admin = me.is_admin, "Signed in");
        }),
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "Directory command failed");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
