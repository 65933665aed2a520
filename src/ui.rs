//! Terminal UI for the cost estimation form
//!
//! Rendering is a pure function of [`EstimatorApp`]: the row editor on top,
//! the itemized results table and cost chart in the middle, the summary and
//! a status footer at the bottom.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{EstimatorApp, StatusMessage};
use crate::results::PieChart;
use crate::rows::{ResourceRow, RowField};

const SLICE_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

/// Render the whole form
pub fn render(app: &EstimatorApp, f: &mut Frame) {
    let row_height = (app.rows().len() as u16).clamp(1, 10) + 3;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),          // Header
            Constraint::Length(row_height), // Rows
            Constraint::Min(8),             // Results
            Constraint::Length(6),          // Summary
            Constraint::Length(3),          // Footer
        ])
        .split(f.area());

    render_header(app, f, chunks[0]);
    render_rows(app, f, chunks[1]);

    let results = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_results_table(app, f, results[0]);
    render_chart(app, f, results[1]);

    render_summary(app, f, chunks[3]);
    render_footer(app, f, chunks[4]);
}

fn render_header(app: &EstimatorApp, f: &mut Frame, area: Rect) {
    let catalog = if app.catalog_loaded() {
        Span::styled("loaded", Style::default().fg(Color::Green))
    } else {
        Span::styled("unavailable", Style::default().fg(Color::Red))
    };

    let title = vec![
        Line::from(vec![
            Span::styled(
                "Cloud Cost Estimator",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  Catalog: "),
            catalog,
            Span::raw("  |  Rows: "),
            Span::styled(app.rows().len().to_string(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(
            "a add | x remove | ↑↓ row | ←→ field | space cycle | 0-9 edit | c calculate | q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn field_text(row: &ResourceRow, field: RowField) -> String {
    match field {
        RowField::Type => row.resource_type().label().to_string(),
        RowField::Sku => row.sku_text().unwrap_or("(none)").to_string(),
        RowField::Region => row.region().unwrap_or("(none)").to_string(),
        RowField::Quantity => row.quantity().to_string(),
        RowField::Hours => row.hours().to_string(),
    }
}

fn render_rows(app: &EstimatorApp, f: &mut Frame, area: Rect) {
    let header = Row::new(["Type", "SKU", "Region", "Qty", "Hours/mo"].map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows: Vec<Row> = if app.rows().is_empty() {
        vec![Row::new(vec![Cell::from("No resources. Press 'a' to add one.")])]
    } else {
        app.rows()
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let selected = index == app.selected();
                let cells = RowField::ALL.into_iter().map(|field| {
                    let style = if selected && field == app.field() {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else if selected {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    };
                    Cell::from(field_text(row, field)).style(style)
                });
                Row::new(cells)
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(14),
            Constraint::Percentage(30),
            Constraint::Percentage(26),
            Constraint::Percentage(12),
            Constraint::Percentage(18),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Resources"))
    .column_spacing(1);

    // Scrolls the table so the focused row is always drawn
    let mut state = TableState::default();
    if !app.rows().is_empty() {
        state.select(Some(app.selected()));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_results_table(app: &EstimatorApp, f: &mut Frame, area: Rect) {
    let header = Row::new(["Type", "SKU", "Region", "Qty", "Hours", "Cost"].map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let results = app.results();
    let rows: Vec<Row> = if !results.has_results() {
        vec![Row::new(vec![Cell::from("Press 'c' to calculate.")])]
    } else {
        results
            .table()
            .iter()
            .map(|line| Row::new(line.cells().map(|c| Cell::from(c.to_string()))))
            .collect()
    };

    let title = match results.total() {
        Some(total) => format!("Itemized Costs (total {})", total),
        None => "Itemized Costs".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(12),
            Constraint::Percentage(26),
            Constraint::Percentage(18),
            Constraint::Percentage(10),
            Constraint::Percentage(12),
            Constraint::Percentage(22),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .column_spacing(1);

    f.render_widget(table, area);
}

/// Lines of the cost chart: one proportional bar plus legend per slice
pub fn chart_lines(chart: &PieChart, bar_width: u16) -> Vec<Line<'static>> {
    chart
        .slices
        .iter()
        .enumerate()
        .map(|(index, slice)| {
            let share = chart.share(index).unwrap_or(0.0);
            let filled = ((share / 100.0) * bar_width as f64).round() as usize;
            let color = SLICE_COLORS[index % SLICE_COLORS.len()];

            Line::from(vec![
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::raw(" ".repeat((bar_width as usize).saturating_sub(filled))),
                Span::styled(
                    format!(" {} {:.2} ({:.1}%)", slice.label, slice.value, share),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect()
}

fn render_chart(app: &EstimatorApp, f: &mut Frame, area: Rect) {
    let lines = match app.results().chart() {
        Some(chart) if !chart.slices.is_empty() => chart_lines(chart, area.width / 4),
        _ => vec![Line::from(Span::styled(
            "No data",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Cost Breakdown"),
    );
    f.render_widget(paragraph, area);
}

fn render_summary(app: &EstimatorApp, f: &mut Frame, area: Rect) {
    let results = app.results();
    let mut lines = Vec::new();

    if let Some(summary) = results.summary() {
        lines.push(Line::from(summary.to_string()));
    }
    if let Some(savings) = results.savings_estimate() {
        lines.push(Line::from(vec![
            Span::styled("Potential savings: ", Style::default().fg(Color::Cyan)),
            Span::styled(savings.to_string(), Style::default().fg(Color::Green)),
        ]));
    }
    for hint in results.hints() {
        lines.push(Line::from(Span::styled(
            format!("• {}", hint),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("AI Summary"));
    f.render_widget(paragraph, area);
}

fn render_footer(app: &EstimatorApp, f: &mut Frame, area: Rect) {
    let line = match app.status() {
        Some(StatusMessage::Error(msg)) => Line::from(Span::styled(
            format!("Error: {}", msg),
            Style::default().fg(Color::Red),
        )),
        Some(StatusMessage::Info(msg)) => {
            Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)))
        }
        None => Line::from(Span::styled("Ready", Style::default().fg(Color::Green))),
    };

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
