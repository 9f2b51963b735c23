use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;
use crate::view::{ChartDataset, EMPTY_PLACEHOLDER};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Month total
            Constraint::Min(5),    // List + chart
        ])
        .split(area);

    render_total_card(f, chunks[0], app);

    match &app.chart {
        Some(chart) => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
                .split(chunks[1]);
            render_expense_list(f, body[0], app);
            render_category_chart(f, body[1], app, chart);
        }
        None => render_expense_list(f, chunks[1], app),
    }
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_total_card(f: &mut Frame, area: Rect, app: &App) {
    let count = app.list.len();
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            app.total_display(),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{count} expense{}", if count == 1 { "" } else { "s" }),
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(titled_block(format!(" Spent in {} ", app.month_label)));

    f.render_widget(text, area);
}

fn render_expense_list(f: &mut Frame, area: Rect, app: &App) {
    let items = app.list.items();
    if items.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(EMPTY_PLACEHOLDER, theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add one, e.g. :add 12.50 food lunch",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg)
                .centered()
                .block(titled_block(" Expenses (0) ".to_string())),
            area,
        );
        return;
    }

    let header_cells = ["", "Expense", "Date", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let label_width = area.width.saturating_sub(2 + 3 + 8 + 14 + 3) as usize;

    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, item)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let amount_style = if i == app.expense_index {
                style
            } else {
                theme::expense_style()
            };
            Row::new(vec![
                Cell::from(item.glyph),
                Cell::from(truncate(&item.label, label_width.max(8))),
                Cell::from(item.date.clone()),
                Cell::from(item.amount.clone()).style(amount_style),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(titled_block(format!(" Expenses ({}) ", items.len())));

    f.render_widget(table, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App, chart: &ChartDataset) {
    let bars: Vec<Bar> = chart
        .slices
        .iter()
        .map(|slice| {
            let cents = slice
                .value
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|c| c.to_u64())
                .unwrap_or(u64::MAX);
            Bar::default()
                .value(cents)
                .label(Line::from(slice.label.clone()))
                .text_value(slice.annotation(&app.currency_symbol))
                .style(Style::default().fg(theme::category_color(slice.category)))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::category_color(slice.category))
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let widget = BarChart::default()
        .block(titled_block(" By Category ".to_string()))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .label_style(theme::normal_style());

    f.render_widget(widget, area);
}
