//! Market table widget - one row per asset with flashing numeric cells

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{palette, Palette};
use crate::application::presentation::format::{
    format_max_supply, format_percentage, format_supply, format_usd,
};
use crate::application::presentation::{Direction, Field, FlashState};
use crate::application::visualizer::App;
use crate::domain::Asset;

const HEADERS: [&str; 11] = [
    "#",
    "Name",
    "Symbol",
    "Price",
    "1h %",
    "24h %",
    "7d %",
    "Market Cap",
    "24h Volume",
    "Circulating Supply",
    "Max Supply",
];

const WIDTHS: [Constraint; 11] = [
    Constraint::Length(3),
    Constraint::Min(10),
    Constraint::Length(6),
    Constraint::Length(12),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(12),
    Constraint::Length(16),
    Constraint::Length(20),
    Constraint::Length(16),
];

/// Draw the asset table
pub fn draw(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let colors = palette(app.theme);

    let header_cells = HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells)
        .style(Style::default().fg(colors.header))
        .height(1);

    let rows = app
        .rows
        .iter()
        .enumerate()
        .map(|(index, asset)| build_row(app, asset, index, now, &colors));

    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Markets ")
                .border_style(Style::default().fg(colors.fg)),
        )
        .row_highlight_style(Style::default().bg(colors.selected_bg).add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn build_row<'a>(app: &App, asset: &'a Asset, index: usize, now: Instant, colors: &Palette) -> Row<'a> {
    let flash = |field: Field| flash_style(app.flashes.state(asset.id, field, now), colors);

    let volume = Text::from(vec![
        Line::from(format_usd(asset.volume_24h, 2)),
        Line::from(Span::styled(
            format_supply(asset.volume_24h, &asset.symbol),
            Style::default().fg(colors.muted),
        )),
    ]);

    Row::new(vec![
        Cell::from((index + 1).to_string()).style(Style::default().fg(colors.muted)),
        Cell::from(asset.name.as_str()).style(Style::default().fg(colors.fg).add_modifier(Modifier::BOLD)),
        Cell::from(asset.symbol.as_str()).style(Style::default().fg(colors.muted)),
        Cell::from(format_usd(asset.price, 2)).style(flash(Field::Price).fg(colors.fg)),
        change_cell(asset.change_1h, colors).style(flash(Field::Change1h)),
        change_cell(asset.change_24h, colors).style(flash(Field::Change24h)),
        change_cell(asset.change_7d, colors).style(flash(Field::Change7d)),
        Cell::from(format_usd(asset.market_cap, 0)).style(flash(Field::MarketCap).fg(colors.fg)),
        Cell::from(volume).style(flash(Field::Volume24h).fg(colors.fg)),
        Cell::from(format_supply(asset.circulating_supply, &asset.symbol)).style(Style::default().fg(colors.fg)),
        Cell::from(format_max_supply(asset.max_supply, &asset.symbol)).style(Style::default().fg(colors.fg)),
    ])
    .height(2)
}

/// Glyph plus signed percentage, colored by the current sign
fn change_cell(value: f64, colors: &Palette) -> Cell<'static> {
    let direction = Direction::from_value(value);
    let glyph_color = match direction {
        Direction::Up => colors.up,
        Direction::Down => colors.down,
        Direction::Flat => colors.muted,
    };
    let text_color = if value >= 0.0 { colors.up } else { colors.down };

    Cell::from(Line::from(vec![
        Span::styled(direction.glyph(), Style::default().fg(glyph_color).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(format_percentage(value), Style::default().fg(text_color)),
    ]))
}

fn flash_style(state: FlashState, colors: &Palette) -> Style {
    match state {
        FlashState::Up => Style::default().bg(colors.flash_up),
        FlashState::Down => Style::default().bg(colors.flash_down),
        FlashState::Neutral => Style::default(),
    }
}
