use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::Context;
use crossterm::event::EventStream;
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;
use water_outages::contracts::fetch_outages::OutagesFetcher;

use crate::config::Settings;
use crate::input;
use crate::presenter::{Presenter, UiMessage};
use crate::terminal::TerminalSession;
use crate::view;

/// Opens the window, starts the fetch and runs the UI loop until the user closes it.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    info!(endpoint = %settings.outages.endpoint, "Starting outages client");
    let source = Arc::new(OutagesFetcher::new(&settings.outages)?);

    let mut terminal = TerminalSession::enter()?;
    let (sender, receiver) = mpsc::unbounded_channel();
    let mut presenter = Presenter::new();
    let _fetch_task = presenter.on_startup(source, sender);

    let result = event_loop(&mut terminal, &mut presenter, receiver).await;
    info!(outages = presenter.full_list().len(), "Outages client closed");
    result
}

/// All presenter mutation happens here, on the thread that drives this future.
async fn event_loop(
    terminal: &mut TerminalSession,
    presenter: &mut Presenter,
    mut receiver: UnboundedReceiver<UiMessage>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    loop {
        presenter.resize(terminal.panel_viewport()?);
        terminal.draw(|frame| view::draw(frame, presenter))?;

        tokio::select! {
            Some(message) = receiver.recv() => presenter.handle(message),
            event = events.next() => {
                let Some(event) = event else {
                    return Ok(());
                };
                let event = event.context("Failed to read terminal event")?;
                if let ControlFlow::Break(()) = input::handle_event(presenter, event) {
                    return Ok(());
                }
            }
        }
    }
}
