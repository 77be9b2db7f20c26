use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::{error, info};
use ratatui::DefaultTerminal;

use tui_covid::api::DiseaseClient;
use tui_covid::app::App;
use tui_covid::config::{Args, Settings};
use tui_covid::controller::ViewStateController;
use tui_covid::logging::init_logging;
use tui_covid::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    init_logging(settings.verbosity, &settings.log_file)?;
    info!("starting with {settings:?}");

    let client = DiseaseClient::new(&settings.base_url, settings.timeout)?;
    let mut app = App::new(ViewStateController::new(Arc::new(client), settings.controller()));
    app.load_basemap(&settings.data_dir);

    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run(&mut terminal, &mut app).await;

    ratatui::restore();
    if let Err(e) = &result {
        error!("exiting after error: {e:#}");
    }
    result
}

async fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    app.dashboard.initialize();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            Some(_) = app.dashboard.next_completion() => {}
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                // Resize and other events just redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
