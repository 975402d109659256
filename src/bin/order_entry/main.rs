//! Order entry demo: three presenters over a shared order service.
//!
//! Keys: `tab` switches panes, arrows move the selection, `enter` presses
//! the focused pane's button, `a` adds, `d`/`delete` removes, `q` quits.
//! Bindings can be overridden in `~/.config/podium/keymap.toml`.

mod domain;
mod screens;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use podium::action::{standard, ActionId, DispatchError};
use podium::bus::EventBus;
use podium::keymap::{KeyChord, Keymap};
use podium::presenter::PresenterHost;

use domain::OrderService;
use screens::{
    add_to_order, remove_item, CatalogPresenter, CatalogView, StatusPresenter, StatusView,
    SummaryPresenter, SummaryView,
};
use ui::Focus;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let bus = EventBus::new();
    let orders = OrderService::new();

    let catalog_view = Arc::new(CatalogView::new(domain::catalog()));
    let mut catalog = PresenterHost::new(CatalogPresenter::new(orders.clone(), bus.clone()));
    catalog.attach_view(Arc::clone(&catalog_view))?;
    catalog.initialize()?;

    let summary_view = Arc::new(SummaryView::new());
    let mut summary = PresenterHost::new(SummaryPresenter::new(orders.clone(), bus.clone()));
    summary.attach_view(Arc::clone(&summary_view))?;
    summary.initialize()?;

    let status_view = Arc::new(StatusView::new());
    let mut status = PresenterHost::new(StatusPresenter::new(bus.clone()));
    status.attach_view(Arc::clone(&status_view))?;
    status.initialize()?;

    let mut keymap = default_keymap();
    match Keymap::load() {
        Ok(loaded) => keymap.merge(loaded),
        Err(err) => tracing::warn!(error = %err, "keymap file ignored"),
    }

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let run = run_loop(
        &keymap,
        &catalog,
        &summary,
        &catalog_view,
        &summary_view,
        &status_view,
    );
    let _ = io::stdout().execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();

    catalog.dispose();
    summary.dispose();
    status.dispose();
    run
}

fn default_keymap() -> Keymap {
    let mut keymap = Keymap::new();
    keymap.insert(
        KeyChord::new(KeyModifiers::NONE, KeyCode::Char('a')),
        add_to_order(),
    );
    keymap.insert(
        KeyChord::new(KeyModifiers::NONE, KeyCode::Char('d')),
        remove_item(),
    );
    keymap.insert(
        KeyChord::new(KeyModifiers::NONE, KeyCode::Delete),
        remove_item(),
    );
    keymap.insert(
        KeyChord::new(KeyModifiers::NONE, KeyCode::Char('q')),
        standard::close(),
    );
    keymap
}

fn run_loop(
    keymap: &Keymap,
    catalog: &PresenterHost<CatalogPresenter>,
    summary: &PresenterHost<SummaryPresenter>,
    catalog_view: &Arc<CatalogView>,
    summary_view: &Arc<SummaryView>,
    status_view: &Arc<StatusView>,
) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let mut focus = Focus::Catalog;

    loop {
        terminal.draw(|frame| {
            ui::draw(frame, catalog_view, summary_view, status_view, focus);
        })?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        if let Some(id) = keymap.action_for(&key) {
            if *id == standard::close() {
                return Ok(());
            }
            dispatch(id, catalog, summary, status_view);
            continue;
        }

        handle_navigation(key, &mut focus, catalog_view, summary_view, summary);
    }
}

/// Route a keymap hit to the presenter owning the action's qualifier.
fn dispatch(
    id: &ActionId,
    catalog: &PresenterHost<CatalogPresenter>,
    summary: &PresenterHost<SummaryPresenter>,
    status_view: &Arc<StatusView>,
) {
    let dispatcher = match id.qualifier() {
        "Catalog" => catalog.dispatcher(),
        "OrderSummary" => summary.dispatcher(),
        other => {
            tracing::warn!(action = %id, qualifier = other, "no presenter for qualifier");
            return;
        }
    };
    match dispatcher.execute(id) {
        Ok(()) => {}
        Err(DispatchError::ActionDisabled(_)) => {
            // Keyboard equivalent of a disabled button: drop it.
            tracing::trace!(action = %id, "key ignored while disabled");
        }
        Err(err) => {
            tracing::error!(action = %id, error = ?err, "action failed");
            status_view.set_text(format!("Error: {err}"));
        }
    }
}

fn handle_navigation(
    key: KeyEvent,
    focus: &mut Focus,
    catalog_view: &Arc<CatalogView>,
    summary_view: &Arc<SummaryView>,
    summary: &PresenterHost<SummaryPresenter>,
) {
    match (key.code, *focus) {
        (KeyCode::Tab, _) => {
            *focus = match focus {
                Focus::Catalog => Focus::Summary,
                Focus::Summary => Focus::Catalog,
            };
        }
        (KeyCode::Up, Focus::Catalog) => catalog_view.select_prev(),
        (KeyCode::Down, Focus::Catalog) => catalog_view.select_next(),
        (KeyCode::Up, Focus::Summary) => {
            summary_view.select_prev();
            summary.dispatcher().raise_can_execute_changed();
        }
        (KeyCode::Down, Focus::Summary) => {
            summary_view.select_next();
            summary.dispatcher().raise_can_execute_changed();
        }
        (KeyCode::Enter, Focus::Catalog) => catalog_view.add_button().press(),
        (KeyCode::Enter, Focus::Summary) => summary_view.remove_button().press(),
        _ => {}
    }
}
