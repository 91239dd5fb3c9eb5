pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use grocer_review::access::NavView;
use grocer_review::feed::{soft, DataSource};
use grocer_review::session::{BatchLoaded, LoadState};
use ratatui::prelude::*;
use state::{AppState, TuiCommand, ViewData};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits. Fetches run on tokio tasks and report
/// back over channels; the state is only touched from this loop.
pub async fn run_tui(mut state: AppState, source: Arc<dyn DataSource>) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, &mut state, source).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    source: Arc<dyn DataSource>,
) -> Result<()> {
    let (batch_tx, mut batch_rx) = mpsc::channel::<BatchLoaded>(8);
    let (data_tx, mut data_rx) = mpsc::channel::<ViewData>(16);
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let mut spinner_frame: u8 = 0;

    dispatch(TuiCommand::Load(state.view), state, &source, &batch_tx, &data_tx);

    loop {
        terminal.draw(|f| render::draw(f, state, spinner_frame))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match state.handle_key(key.code) {
                        Some(TuiCommand::Quit) => return Ok(()),
                        Some(cmd) => dispatch(cmd, state, &source, &batch_tx, &data_tx),
                        None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(loaded) = batch_rx.recv() => state.install_batch(loaded),
            Some(data) = data_rx.recv() => state.install_view_data(data),
            _ = tick.tick() => {
                spinner_frame = spinner_frame.wrapping_add(1);
            }
        }
    }
}

fn dispatch(
    cmd: TuiCommand,
    state: &mut AppState,
    source: &Arc<dyn DataSource>,
    batch_tx: &mpsc::Sender<BatchLoaded>,
    data_tx: &mpsc::Sender<ViewData>,
) {
    match cmd {
        TuiCommand::Quit => {}
        TuiCommand::RefreshBatch => {
            if let Some(session) = state.session.as_mut() {
                session.spawn_refresh(source.clone(), batch_tx.clone());
            }
        }
        // Edits live only in the session, so revisiting Orders keeps them.
        TuiCommand::Load(NavView::Orders) => {
            if let Some(session) = state.session.as_mut() {
                if session.state() == LoadState::Idle {
                    session.spawn_refresh(source.clone(), batch_tx.clone());
                }
            }
        }
        TuiCommand::Load(NavView::RegionalView) => {
            if let Some(region) = state.regional.region().map(str::to_string) {
                dispatch(TuiCommand::LoadRegion(region), state, source, batch_tx, data_tx);
            }
        }
        TuiCommand::LoadRegion(region) => {
            state.mark_loading(NavView::RegionalView);
            let source = source.clone();
            let tx = data_tx.clone();
            tokio::spawn(async move {
                let outcome = soft(
                    "regional performance",
                    source.fetch_regional_performance(&region),
                )
                .await;
                let _ = tx.send(ViewData::Regional { region, outcome }).await;
            });
        }
        TuiCommand::Load(NavView::Corporate) => {
            state.mark_loading(NavView::Corporate);
            let source = source.clone();
            let tx = data_tx.clone();
            tokio::spawn(async move {
                let outcome = soft("corporate dashboard", source.fetch_corporate_dashboard()).await;
                let _ = tx.send(ViewData::Corporate(outcome)).await;
            });
        }
        TuiCommand::Load(view) => {
            let Some(store) = state.signed_in.store_name().map(str::to_string) else {
                return;
            };
            state.mark_loading(view);
            let source = source.clone();
            let tx = data_tx.clone();
            tokio::spawn(async move {
                let data = match view {
                    NavView::OrderHistory => {
                        ViewData::History(soft("order history", source.fetch_order_history(&store)).await)
                    }
                    NavView::SpoilageAnalysis => {
                        ViewData::Spoilage(soft("spoilage data", source.fetch_spoilage(&store)).await)
                    }
                    _ => ViewData::Notifications(
                        soft("notifications", source.fetch_notifications(&store)).await,
                    ),
                };
                let _ = tx.send(data).await;
            });
        }
    }
}
