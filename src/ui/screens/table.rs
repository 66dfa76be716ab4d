use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::engine::{days_in_year, Summary};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_amount_whole};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Month grid
            Constraint::Length(5), // Summary cards
        ])
        .split(area);

    render_grid(f, chunks[0], app);
    render_summary_cards(f, chunks[1], app.session.summary());
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = [
        "Month",
        "Days",
        "Price/kg",
        "Not Delivered",
        "Delivered",
        "Amount",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    // Borders, header and totals row
    let page = area.height.saturating_sub(4) as usize;

    let rows: Vec<Row> = app
        .session
        .table()
        .rows()
        .iter()
        .enumerate()
        .skip(app.month_scroll)
        .take(page)
        .map(|(i, row)| {
            let style = if i == app.month_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let is_cursor = i == app.month_index;
            let missed = if row.not_delivered() > 0 && !is_cursor {
                theme::missed_style()
            } else {
                Style::default()
            };
            let delivered = if is_cursor {
                Style::default()
            } else {
                theme::delivered_style()
            };
            let amount = if is_cursor {
                Style::default()
            } else {
                theme::amount_style()
            };

            Row::new(vec![
                Cell::from(row.label().to_string()),
                Cell::from(row.days_in_month().to_string()),
                Cell::from(format_amount(row.price_per_kg())),
                Cell::from(Span::styled(row.not_delivered().to_string(), missed)),
                Cell::from(Span::styled(row.delivered().to_string(), delivered)),
                Cell::from(Span::styled(format_amount(row.amount()), amount)),
            ])
            .style(style)
        })
        .collect();

    let summary = app.session.summary();
    let total_days = days_in_year(app.session.year()).unwrap_or_default();
    let footer = Row::new(vec![
        Cell::from("Total"),
        Cell::from(total_days.to_string()),
        Cell::from(format_amount(summary.average_price)),
        Cell::from(summary.total_not_delivered.to_string()),
        Cell::from(summary.total_delivered.to_string()),
        Cell::from(format_amount(summary.total_amount)),
    ])
    .style(theme::total_row_style());

    let widths = [
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Min(14),
    ];

    let year = app.session.year();
    let table = Table::new(rows, widths)
        .header(header)
        .footer(footer)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(format!(" Milk Delivery {year} "), theme::title_style())),
        );

    f.render_widget(table, area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, summary: &Summary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Total Annual Payment",
        format_amount_whole(summary.total_amount),
        theme::YELLOW,
    );
    render_card(
        f,
        cards[1],
        "Delivered Days",
        summary.total_delivered.to_string(),
        theme::GREEN,
    );
    render_card(
        f,
        cards[2],
        "Not Delivered Days",
        summary.total_not_delivered.to_string(),
        theme::RED,
    );
    render_card(
        f,
        cards[3],
        "Avg Monthly Payment",
        format_amount_whole(summary.average_monthly_amount),
        theme::ACCENT,
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}
