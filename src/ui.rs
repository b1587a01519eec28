use crate::{
    app::{App, Mode},
    catalog::{slot_label, Day, LESSON_SLOTS},
    ratings::MAX_RATING,
    surface::RenderedEntry,
};

use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    style::{Color, Style},
    text::Text,
    widgets::{Block, Borders, Cell as TableCell, Gauge, Paragraph, Row, Table},
};

pub fn draw_ui(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(size);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    draw_header(f, app, top_chunks[0]);
    draw_slider(f, app, top_chunks[1]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(chunks[1]);

    draw_pages(f, app, main_chunks[0]);
    draw_grid(f, app, main_chunks[1]);
    draw_help(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.surface.subject.is_empty() {
        "no pages".to_string()
    } else {
        format!("{} — {}", app.surface.subject, app.surface.kind)
    };
    let header = Paragraph::new(text)
        .block(Block::default().title("Subject / Type").borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn draw_slider(f: &mut Frame, app: &App, area: Rect) {
    let value = app.surface.slider;
    let label = match app.controller.active_group() {
        Some(group) => format!("gr. {group}: {value}/{MAX_RATING}"),
        None => "no group selected".to_string(),
    };
    let (r, g, b) = crate::surface::badness_color(value);
    let gauge = Gauge::default()
        .block(Block::default().title("Badness").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Rgb(r, g, b)))
        .ratio(f64::from(value) / f64::from(MAX_RATING))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_pages(f: &mut Frame, app: &mut App, area: Rect) {
    // One line per navigation button, grouped under its subject heading.
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_row = 0;
    let mut page_idx = 0;
    let mut last_subject: Option<&str> = None;
    for page in app.controller.pages() {
        if last_subject != Some(page.subject.as_str()) {
            lines.push(Line::from(Span::styled(
                page.subject.clone(),
                Style::default().fg(Color::Cyan),
            )));
            last_subject = Some(page.subject.as_str());
        }
        let mut style = Style::default();
        if page_idx == app.selected_page {
            style = style.fg(Color::Yellow);
            selected_row = lines.len();
        }
        lines.push(Line::from(Span::styled(format!("  {}", page.kind), style)));
        page_idx += 1;
    }

    let height = area.height.saturating_sub(2) as usize;
    if selected_row < app.scroll_offset {
        app.scroll_offset = selected_row;
    }
    if height > 0 && selected_row >= app.scroll_offset + height {
        app.scroll_offset = selected_row + 1 - height;
    }
    let start = app.scroll_offset.min(lines.len());
    let end = (start + height).min(lines.len());
    let visible = lines[start..end].to_vec();

    let list = Paragraph::new(Text::from(visible)).block(
        Block::default()
            .title("Pages (↑/↓, Enter)")
            .borders(Borders::ALL)
            .border_style(if matches!(app.mode, Mode::PickingPage) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(list, area);
}

fn entry_line(entry: &RenderedEntry, selected: bool) -> Line<'static> {
    let mut text = format!("gr. {} · {}", entry.group, entry.teacher);
    if let Some(note) = entry.parity_note {
        text.push(' ');
        text.push_str(note);
    }
    let (r, g, b) = entry.color;
    let mut style = Style::default().bg(Color::Rgb(r, g, b)).fg(Color::White);
    if selected {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    Line::from(Span::styled(text, style))
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let browsing = matches!(app.mode, Mode::Browsing);

    let mut rows: Vec<Row> = Vec::new();
    for lesson in 0..LESSON_SLOTS {
        let mut cells: Vec<TableCell> = vec![TableCell::from(slot_label(lesson))];
        let mut row_height = 1;
        for day in Day::ALL {
            let entries = app.surface.cell(lesson, day.index());
            row_height = row_height.max(entries.len());
            let lines: Vec<Line> = entries
                .iter()
                .map(|entry| {
                    entry_line(entry, browsing && app.selected_entry == Some(entry.id))
                })
                .collect();
            cells.push(TableCell::from(Text::from(lines)));
        }
        rows.push(Row::new(cells).height(row_height as u16));
    }

    let mut widths = vec![Constraint::Length(6)];
    widths.extend(std::iter::repeat(Constraint::Fill(1)).take(Day::ALL.len()));

    let header: Vec<&str> = std::iter::once("godz.")
        .chain(Day::ALL.iter().map(|day| day.label()))
        .collect();

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(Color::Cyan)))
        .block(
            Block::default()
                .title("Timetable (Tab, ↑/↓)")
                .borders(Borders::ALL)
                .border_style(if browsing {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );
    f.render_widget(table, area);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let keys = match app.mode {
        Mode::PickingPage => "↑/↓ page · Enter open · e export · q quit",
        Mode::Browsing => "Tab/←/→ entry · ↑/↓ adjust · 0-9/= set · e export · Esc pages",
    };
    let text = match &app.status {
        Some(status) => format!("{keys}   [{status}]"),
        None => keys.to_string(),
    };
    f.render_widget(Paragraph::new(text), area);
}
