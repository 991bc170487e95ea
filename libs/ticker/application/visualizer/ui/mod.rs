//! UI widgets for the ticker

pub mod table;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::App;
use crate::infrastructure::config::Theme;

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub header: Color,
    pub up: Color,
    pub down: Color,
    pub flash_up: Color,
    pub flash_down: Color,
    pub selected_bg: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            fg: Color::White,
            muted: Color::DarkGray,
            header: Color::Yellow,
            up: Color::Green,
            down: Color::Red,
            flash_up: Color::Rgb(20, 83, 45),
            flash_down: Color::Rgb(127, 29, 29),
            selected_bg: Color::Rgb(31, 41, 55),
        },
        Theme::Light => Palette {
            fg: Color::Black,
            muted: Color::Gray,
            header: Color::Blue,
            up: Color::Rgb(22, 163, 74),
            down: Color::Rgb(220, 38, 38),
            flash_up: Color::Rgb(187, 247, 208),
            flash_down: Color::Rgb(254, 202, 202),
            selected_bg: Color::Rgb(239, 246, 255),
        },
    }
}

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    table::draw(frame, app, now, chunks[1]);
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.theme);

    let (status, status_color) = if let Some(error) = &app.status.error {
        (format!("Error: {}", error), colors.down)
    } else if app.status.loading {
        ("Waiting for data...".to_string(), colors.header)
    } else if app.is_feed_running() {
        ("Live".to_string(), colors.up)
    } else {
        ("Paused".to_string(), colors.muted)
    };

    let updated = app
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let header_text = format!(
        " Status: {} | Assets: {} | Ticks: {} | Updated: {}",
        status,
        app.rows.len(),
        app.tick_count(),
        updated
    );

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Real-Time Crypto Price Tracker "),
        );

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.theme);
    let theme = match app.theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };

    let footer_text = match app.status_message.as_deref() {
        Some(status) => format!(" {} | q=quit j/k=nav p=pause t=theme ({})", status, theme),
        None => format!(" q=quit j/k=nav p=pause t=theme ({})", theme),
    };

    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(colors.fg))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
