use crate::app::{App, Field, SIDEBAR_WIDTH};
use crate::map::session::{BLAST_ORANGE, IMPACT_RED, WAVE_BLUE};
use crate::map::RenderedMap;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into main area and status bar
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map + sidebar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
        .split(rows[0]);

    render_map(frame, app, cols[0]);
    render_sidebar(frame, app, cols[1]);
    render_status_bar(frame, app, rows[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Impact Map ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let rendered = app.map_renderer.render(&app.session, &viewport);

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        if cx < inner.width && cy < inner.height {
            Some((cx, cy))
        } else {
            None
        }
    });

    let map_widget = MapWidget {
        rendered,
        cursor_pos,
    };
    frame.render_widget(map_widget, inner);
}

/// Widget painting the base map, simulation overlays, and marker label
struct MapWidget {
    rendered: RenderedMap,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    /// Blit a braille canvas layer in a single color, skipping blank cells
    fn render_layer(
        canvas: &crate::braille::BrailleCanvas,
        color: Color,
        area: Rect,
        buf: &mut Buffer,
    ) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Base geography at the back
        Self::render_layer(&self.rendered.base, Color::Cyan, area, buf);

        // Simulation shapes, back to front, each with its shaded color
        for (canvas, (r, g, b)) in &self.rendered.overlays {
            Self::render_layer(canvas, Color::Rgb(*r, *g, *b), area, buf);
        }

        // Marker label next to the pixel cross
        if let Some((px, py, label)) = &self.rendered.marker {
            let cx = (px / 2) as u16;
            let cy = (py / 4) as u16;
            if cx < area.width && cy < area.height {
                let style = Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                let text: String = label
                    .chars()
                    .take((area.width - cx).saturating_sub(2) as usize)
                    .collect();
                for (i, ch) in text.chars().enumerate() {
                    let x = area.x + cx + 2 + i as u16;
                    if x < area.x + area.width {
                        buf[(x, area.y + cy)].set_char(ch).set_style(style);
                    }
                }
            }
        }

        // Mouse cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Form
            Constraint::Min(5),     // Results
            Constraint::Length(5),  // Legend
        ])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_results(frame, app, chunks[1]);
    render_legend(frame, chunks[2]);
}

fn field_line<'a>(app: &App, field: Field, label: &'a str, value: String) -> Line<'a> {
    let focused = app.focus == Some(field);
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let value_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:<10}"), label_style),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.is_editing() {
        " Parameters [EDIT] "
    } else {
        " Parameters "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(title, Style::default().fg(Color::Cyan)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        field_line(app, Field::Latitude, "Lat", app.form.latitude.clone()),
        field_line(app, Field::Longitude, "Lng", app.form.longitude.clone()),
        field_line(app, Field::Diameter, "Diam m", app.form.diameter.clone()),
        field_line(app, Field::Velocity, "Vel km/s", app.form.velocity.clone()),
        field_line(app, Field::Density, "Dens kg/m³", app.form.density.clone()),
        field_line(app, Field::ApiKey, "API key", app.form.api_key.clone()),
        field_line(
            app,
            Field::Deflection,
            "Deflect",
            format!("{} km/s", app.form.deflection_km_s),
        ),
        Line::from(vec![
            Span::styled("NEO       ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.form.neo_name.clone(), Style::default().fg(Color::Magenta)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Results ", Style::default().fg(Color::Cyan)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(alert) = &app.alert {
        lines.push(Line::from(Span::styled(
            alert.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    for (i, text) in app.results.iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(text.clone(), style)));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Static legend, rendered every frame and unaffected by clear
fn render_legend(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Legend ", Style::default().fg(Color::Cyan)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = [
        (IMPACT_RED, "Impact zone"),
        (BLAST_ORANGE, "Earthquake waves"),
        (WAVE_BLUE, "Tsunami waves"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|((r, g, b), label)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(Color::Rgb(*r, *g, *b))),
                Span::styled(*label, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = if app.is_editing() {
        Span::styled(" EDIT ", Style::default().fg(Color::Black).bg(Color::Yellow))
    } else {
        Span::styled(" MAP ", Style::default().fg(Color::Black).bg(Color::Cyan))
    };

    let status = Line::from(vec![
        mode,
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", Style::default().fg(Color::DarkGray)),
        Span::styled(app.lod_level(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | RClick:point 1:impact 2:quake 3:tsunami n:NEO x:clear Tab:edit q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
