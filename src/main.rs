use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use impact_map::app::App;
use impact_map::net::Endpoints;
use impact_map::{data, ui};

fn main() -> Result<()> {
    // Load .env locally; safe to ignore when not present.
    dotenvy::dotenv().ok();
    init_tracing()?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Logs go to a file; stdout belongs to the terminal UI
fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let file = std::fs::File::create("impact-map.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}

/// Mouse wiring: left button pans, wheel zooms, right button sets the
/// impact point (the map-click of the original)
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        // Right click marks the impact point
        MouseEventKind::Down(MouseButton::Right) => {
            app.set_impact_point(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    if app.is_editing() {
        match code {
            KeyCode::Tab => app.focus_next(),
            KeyCode::BackTab => app.focus_prev(),
            KeyCode::Esc | KeyCode::Enter => app.focus_clear(),
            KeyCode::Backspace => app.handle_edit_backspace(),
            KeyCode::Left => app.handle_edit_arrow(-0.5),
            KeyCode::Right => app.handle_edit_arrow(0.5),
            KeyCode::Char(c) => app.handle_edit_char(c),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Simulation actions
        KeyCode::Char('1') => app.run_impact(),
        KeyCode::Char('2') => app.run_earthquake(),
        KeyCode::Char('3') => app.run_tsunami(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.clear(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.load_neo(),

        // Form editing
        KeyCode::Tab => app.focus_next(),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        size.width as usize,
        size.height as usize,
        Endpoints::from_env(),
    );

    // Load all available GeoJSON data at different resolutions
    let data_dir = Path::new("data");
    if data_dir.exists() {
        let _ = data::load_all_geojson(&mut app.map_renderer, data_dir);
    }

    // Fall back to simple world if no data loaded
    if !app.map_renderer.has_data() {
        data::generate_simple_world(&mut app.map_renderer);
    }

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        handle_key(&mut app, key.code);
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        // Step animations and collect finished lookups
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
