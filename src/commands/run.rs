//! Run command implementation
//!
//! Starts the interactive cost estimation form: loads the catalog once,
//! opens the form with a default row and processes key events until the
//! user quits. Calculations run on a background task and report back over a
//! channel, so the form keeps redrawing while a request is pending.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::Path, sync::Arc, time::Duration};
use tokio::sync::mpsc;

use cost_estimator::{
    app::{AppAction, EstimatorApp},
    catalog::CatalogLoader,
    client::CalculationClient,
    config, init_file_tracing,
    models::CalculationResult,
    ui,
};

/// Execute the run command
pub async fn execute(config_path: &Path) -> Result<()> {
    // 1. Load configuration
    let cfg = config::load_config(config_path)?;

    // 2. Log to file; the terminal belongs to the form
    init_file_tracing(&cfg.logging.file, &cfg.logging.level)?;
    tracing::info!(config = %config_path.display(), "Starting cost estimator");

    // 3. Load catalog once
    let catalog = CatalogLoader::new(cfg.catalog_source())
        .load()
        .await
        .map(Arc::new);

    // 4. Build client
    let client = CalculationClient::new(cfg.calculation_url(), cfg.calculation_timeout())?;

    // 5. Run form
    run_form(EstimatorApp::new(catalog), client).await
}

async fn run_form(mut app: EstimatorApp, client: CalculationClient) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<cost_estimator::Result<CalculationResult>>();

    // Main loop
    let result = loop {
        // Apply finished calculations
        while let Ok(outcome) = rx.try_recv() {
            app.finish_calculation(outcome);
        }

        // Render UI
        if let Err(e) = terminal.draw(|f| ui::render(&app, f)) {
            break Err(e.into());
        }

        // Handle events with timeout
        match event::poll(Duration::from_millis(100)) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => break Err(e.into()),
        }

        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => break Err(e.into()),
        };

        match app.handle_key(key) {
            AppAction::Quit => break Ok(()),
            AppAction::Calculate(request) => {
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = client.submit(&request).await;
                    // Receiver only goes away when the form has quit
                    let _ = tx.send(outcome);
                });
            }
            AppAction::None => {}
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("Cost estimator stopped");
    result
}
