use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::engine::{MonthTable, Summary};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount_whole;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Monthly amounts
            Constraint::Length(9), // Delivery split
            Constraint::Length(3), // Delivery ratio
        ])
        .split(area);

    let summary = app.session.summary();
    render_monthly_chart(f, chunks[0], app.session.table(), app.month_index);
    render_delivery_split(f, chunks[1], summary);
    render_delivery_gauge(f, chunks[2], summary);
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_monthly_chart(f: &mut Frame, area: Rect, table: &MonthTable, selected: usize) {
    let bars: Vec<Bar> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let color = if i == selected {
                theme::ACCENT
            } else {
                theme::YELLOW
            };
            Bar::default()
                .value(row.amount().round().to_u64().unwrap_or(0))
                .label(Line::from(row.month().short_name()))
                .text_value(format_amount_whole(row.amount()).replace("Rs ", ""))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    // Spread the twelve bars over the available width
    let inner = area.width.saturating_sub(2);
    let bar_width = (inner / 12).saturating_sub(1).clamp(3, 8);

    let chart = BarChart::default()
        .block(bordered(format!(" Monthly Amount (Rs) {} ", table.year())))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);

    f.render_widget(chart, area);
}

fn render_delivery_split(f: &mut Frame, area: Rect, summary: &Summary) {
    let bars = [
        Bar::default()
            .value(u64::from(summary.total_delivered))
            .label(Line::from("Delivered"))
            .style(theme::delivered_style())
            .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::GREEN)),
        Bar::default()
            .value(u64::from(summary.total_not_delivered))
            .label(Line::from("Not Delivered"))
            .style(theme::missed_style())
            .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::RED)),
    ];

    let chart = BarChart::default()
        .block(bordered(" Delivery Status (days) ".to_string()))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1);

    f.render_widget(chart, area);
}

fn render_delivery_gauge(f: &mut Frame, area: Rect, summary: &Summary) {
    let total = summary.total_delivered + summary.total_not_delivered;
    let ratio = if total > 0 {
        f64::from(summary.total_delivered) / f64::from(total)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(bordered(" Delivered Share ".to_string()))
        .gauge_style(Style::default().fg(theme::GREEN).bg(theme::SURFACE))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{:.1}% of {total} days",
            ratio * 100.0
        ));

    f.render_widget(gauge, area);
}
