//! Tank dashboard - terminal UI for the water-tank monitoring dashboard.
//!
//! Main entry point and event loop for the application.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
};
use std::io;
use std::time::Duration;
use tank_dashboard::app::{App, UiMode};
use tank_dashboard::config::Config;
use tank_dashboard::requests::RequestBackend;
use tank_dashboard::subscribers::{InMemorySubscriberStore, SubscriberList};
use tank_dashboard::{telemetry, ui};

/// Rows above the first table row: top border and header.
const TABLE_HEADER_ROWS: u16 = 2;

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Loads configuration, starts file logging, builds the application state
/// and runs the event loop until the user quits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = Config::default_config_path()?;
    let config = Config::load(Some(&config_path))?;
    if !config_path.exists() {
        config.save(Some(&config_path))?;
    }

    telemetry::init_file_logging(&config.log_file_path()?, &config.log_level)?;
    tracing::info!(config = %config_path.display(), "tank dashboard starting");

    let backend = RequestBackend::from_config(&config)?;
    let subscribers = SubscriberList::new(InMemorySubscriberStore::seeded());
    let mut app = App::new(
        subscribers,
        backend,
        config.export_dir_path(),
        config.success_display(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "tank dashboard exited with error");
    }
    result
}

/// Split the screen into search bar, table and status bar.
fn layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Subscriber table
            Constraint::Length(3), // Status bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Render the complete UI.
///
/// # Arguments
/// * `f` - Frame to render to
/// * `app` - Application state
///
/// # Details
/// Renders the search bar, the subscriber table and the status bar, then the
/// request form popup on top when it is open.
fn render_ui(f: &mut ratatui::Frame, app: &App) {
    let [search_area, list_area, status_area] = layout(f.area());

    ui::render_search(app, search_area, f.buffer_mut());
    ui::render_list(app, list_area, f.buffer_mut());

    let status_text = app.status_message.as_deref().unwrap_or(
        "Press 'q' to quit, '/' to search, 'd' to delete, 'e' to export, 'n' to request a tank",
    );
    let status = ratatui::widgets::Paragraph::new(ratatui::text::Line::from(status_text))
        .block(ratatui::widgets::Block::default().borders(ratatui::widgets::Borders::ALL));
    f.render_widget(status, status_area);

    if let Some(form) = &app.request_form {
        let area = f.area();
        ui::render_request_form(form, area, f.buffer_mut());
    }
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Applies finished form events, redraws, then handles keyboard and mouse input.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut list_area = Rect::default();

    loop {
        app.tick();

        terminal.draw(|f| {
            list_area = layout(f.area())[1];
            render_ui(f, app);
        })?;

        // Poll with a timeout so form timers are picked up without input
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !handle_key_event(key, app) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, list_area),
                _ => {}
            }
        }
    }

    // Cancels pending form work before the runtime shuts down
    app.close_request_form();
    Ok(())
}

/// Handle a key press.
///
/// # Returns
/// * `bool` - False when the application should quit
fn handle_key_event(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match app.mode {
        UiMode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return false,
            KeyCode::Up | KeyCode::Char('k') => app.subscribers.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.subscribers.move_down(),
            KeyCode::Char('/') => app.mode = UiMode::Search,
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('e') => app.export_subscribers(chrono::Local::now().date_naive()),
            KeyCode::Char('n') => app.open_request_form(),
            _ => {}
        },
        UiMode::Search => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.mode = UiMode::List,
            KeyCode::Backspace => app.subscribers.remove_search_char(),
            KeyCode::Char(c) => app.subscribers.add_search_char(c),
            _ => {}
        },
        UiMode::RequestForm => {
            if key.code == KeyCode::Esc {
                app.close_request_form();
                return true;
            }
            if key.code == KeyCode::Enter {
                app.submit_request();
                return true;
            }
            if let Some(form) = app.request_form.as_mut() {
                match key.code {
                    KeyCode::Tab | KeyCode::Down => form.focus_next(),
                    KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                    KeyCode::Left => form.cycle_purpose(false),
                    KeyCode::Right => form.cycle_purpose(true),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Char(c) => form.input_char(c),
                    _ => {}
                }
            }
        }
    }

    true
}

/// Handle mouse events (scroll and click).
///
/// # Arguments
/// * `mouse` - Mouse event
/// * `app` - Application state
/// * `list_area` - Area of the subscriber table
///
/// # Details
/// Scrolling moves the selection. A left click selects the row under the
/// cursor while the whole table fits on screen.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App, list_area: Rect) {
    if app.mode != UiMode::List {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => app.subscribers.move_up(),
        MouseEventKind::ScrollDown => app.subscribers.move_down(),
        MouseEventKind::Down(MouseButton::Left) => {
            let first_row = list_area.y + TABLE_HEADER_ROWS;
            let last_row = list_area.y + list_area.height.saturating_sub(1); // Bottom border
            let table_rows = last_row.saturating_sub(first_row) as usize;
            if app.subscribers.visible_count() <= table_rows
                && mouse.column >= list_area.x
                && mouse.column < list_area.x + list_area.width
                && mouse.row >= first_row
                && mouse.row < last_row
            {
                app.subscribers.select((mouse.row - first_row) as usize);
            }
        }
        _ => {}
    }
}
