use std::borrow::Cow;

use super::state::{AppState, InputMode};
use grocer_review::access::NavView;
use grocer_review::engine::ReviewStatus;
use grocer_review::feed::types::{SpoilageReason, Trend};
use grocer_review::session::LoadState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw(f: &mut Frame, state: &AppState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, chunks[0], spinner_frame);
    draw_tabs(f, state, chunks[1]);
    match state.view {
        NavView::Orders => draw_orders(f, state, chunks[2]),
        NavView::OrderHistory => draw_history(f, state, chunks[2]),
        NavView::SpoilageAnalysis => draw_spoilage(f, state, chunks[2]),
        NavView::RegionalView => draw_regional(f, state, chunks[2]),
        NavView::Mailbox => draw_mailbox(f, state, chunks[2]),
        NavView::Corporate => draw_corporate(f, state, chunks[2]),
    }
    draw_last_log(f, state, chunks[3]);
    draw_footer(f, state, chunks[4]);
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let user = &state.signed_in.user;
    let activity = if state.is_loading() {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        Span::styled(format!(" {} loading", ch), Style::default().fg(Color::Cyan))
    } else {
        Span::styled(" ready", Style::default().fg(Color::Green))
    };

    let mut spans = vec![
        Span::styled(" GreenGrocer ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::raw(user.name.clone()),
        Span::styled(format!(" ({})", user.role), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(store) = state.signed_in.store_name() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(store.to_string()));
    }
    if state.signed_in.views().contains(&NavView::Mailbox) {
        let unread = state.mailbox.unread_count();
        let color = if unread > 0 { Color::Yellow } else { Color::DarkGray };
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(format!("{} unread", unread), Style::default().fg(color)));
    }
    spans.push(activity);

    let para = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_tabs(f: &mut Frame, state: &AppState, area: Rect) {
    let views = state.signed_in.views();
    let titles: Vec<Line> = views.iter().map(|v| Line::from(v.label())).collect();
    let selected = views.iter().position(|v| *v == state.view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn status_color(status: ReviewStatus) -> Color {
    match status {
        ReviewStatus::PendingForReview => Color::Yellow,
        ReviewStatus::Adjusted => Color::Cyan,
        ReviewStatus::Approved => Color::Green,
        ReviewStatus::AdjustedAndApproved => Color::LightGreen,
    }
}

fn empty_panel(f: &mut Frame, area: Rect, title: &str, message: &str, detail: Option<&str>) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = detail {
        lines.push(Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let block = Block::default().title(format!(" {} ", title)).borders(Borders::ALL);
    let para = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    f.render_widget(para, area);
}

fn draw_orders(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(session) = state.session.as_ref() else {
        empty_panel(f, area, "Order Recommendations", "No store assigned", None);
        return;
    };
    let engine = session.engine();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let totals = engine.totals();
    let mut summary = vec![
        Span::styled(" Status: ", Style::default().fg(Color::DarkGray)),
        Span::raw(engine.status_filter().to_string()),
        Span::styled("  Category: ", Style::default().fg(Color::DarkGray)),
        Span::raw(engine.category_filter().to_string()),
        Span::styled("  Selected: ", Style::default().fg(Color::DarkGray)),
        Span::raw(engine.selected_count().to_string()),
        Span::styled("  Units: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{} rec / {} adj", totals.recommended_units, totals.adjusted_units)),
    ];
    let counts: Vec<Span> = engine
        .status_counts()
        .into_iter()
        .flat_map(|(status, n)| {
            [
                Span::raw("  "),
                Span::styled(format!("{}: {}", status, n), Style::default().fg(status_color(status))),
            ]
        })
        .collect();
    let mut count_line = vec![Span::raw("")];
    count_line.extend(counts);
    if let InputMode::EditQuantity { sku, buffer } = &state.input {
        summary.push(Span::styled(
            format!("  Qty for {}: {}_", sku, buffer),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let InputMode::CountInventory(form) = &state.input {
        let product = engine
            .catalog()
            .products()
            .get(form.product)
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        summary.push(Span::styled(
            format!("  Count for {}: {}_", product, form.count),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(
        Paragraph::new(vec![Line::from(summary), Line::from(count_line)]),
        chunks[0],
    );

    let view = engine.filtered_view();
    let title = format!(" Order Recommendations: {} [{}/{}] ", session.store(), view.len(), engine.len());
    if view.is_empty() {
        let (message, detail) = match session.state() {
            LoadState::Idle | LoadState::Loading => ("Loading recommendations...", None),
            LoadState::Ready if engine.is_empty() => ("No recommendations for this store", session.error()),
            LoadState::Ready => ("Nothing matches the current filters", Some("[s] status  [c] category")),
        };
        empty_panel(f, chunks[1], title.trim(), message, detail);
        return;
    }

    let inner_width = chunks[1].width.saturating_sub(2) as usize;
    let visible_lines = chunks[1].height.saturating_sub(3) as usize;
    let offset = state.cursor.saturating_sub(visible_lines.saturating_sub(1));

    let fixed: usize = 3 + 10 + 10 + 5 + 5 + 5 + 9 + 20 + 22;
    let name_w = inner_width.saturating_sub(fixed).max(8);

    let header = Row::new(vec![
        "", "SKU", "Product", "Category", "Inv", "Fcst", "Rec", "Adj", "Justification", "Status",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = view
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_lines.max(1))
        .map(|(i, rec)| {
            let check = if engine.is_selected(&rec.sku) { "[x]" } else { "[ ]" };
            let category = engine.catalog().category_of(&rec.sku).unwrap_or("-");
            let delta = rec.delta();
            let adj_cell = if delta == 0 {
                Cell::from(rec.adjusted_qty().to_string())
            } else {
                let color = if delta > 0 { Color::Cyan } else { Color::Magenta };
                Cell::from(format!("{} ({:+})", rec.adjusted_qty(), delta))
                    .style(Style::default().fg(color))
            };
            let status = rec.status();
            let row = Row::new(vec![
                Cell::from(check),
                Cell::from(rec.sku.clone()),
                Cell::from(truncate_with_ellipsis(&rec.product_name, name_w).into_owned()),
                Cell::from(category.to_string()),
                Cell::from(rec.current_inventory.to_string()),
                Cell::from(rec.forecasted_qty.to_string()),
                Cell::from(rec.recommended_qty.to_string()),
                adj_cell,
                Cell::from(truncate_with_ellipsis(rec.justification(), 20).into_owned()),
                Cell::from(status.label()).style(Style::default().fg(status_color(status))),
            ]);
            if i == state.cursor {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(name_w as u16),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Length(20),
            Constraint::Length(22),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(table, chunks[1]);
}

fn draw_history(f: &mut Frame, state: &AppState, area: Rect) {
    if state.history.is_empty() {
        let message = if state.loading.contains(&NavView::OrderHistory) {
            "Loading order history..."
        } else {
            "No order history"
        };
        empty_panel(f, area, "Order History", message, None);
        return;
    }

    let header = Row::new(vec!["Date", "SKU", "Product", "Ordered", "On Hand", "Shelf Life"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .history
        .iter()
        .map(|h| {
            Row::new(vec![
                Cell::from(h.order_date.format("%Y-%m-%d").to_string()),
                Cell::from(h.sku.clone()),
                Cell::from(h.product_name.clone()),
                Cell::from(h.quantity_ordered.to_string()),
                Cell::from(h.current_inventory.to_string()),
                Cell::from(format!("{}d", h.shelf_life_days)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().title(" Order History ").borders(Borders::ALL));
    f.render_widget(table, area);
}

fn draw_spoilage(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Total units wasted: {}", state.spoilage.total_units()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" By reason", Style::default().fg(Color::Yellow))),
    ];
    for (reason, units) in state.spoilage.by_reason() {
        lines.push(Line::from(format!("   {:<10} {:>6}", reason.to_string(), units)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" By product", Style::default().fg(Color::Yellow))));
    for (name, units) in state.spoilage.by_product() {
        lines.push(Line::from(format!(
            "   {:<24} {:>6}",
            truncate_with_ellipsis(&name, 24),
            units
        )));
    }
    if let InputMode::LogWaste(form) = &state.input {
        let product = state
            .catalog
            .products()
            .get(form.product)
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let reason = SpoilageReason::ALL[form.reason % SpoilageReason::ALL.len()];
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Log waste",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("   Product [←/→]: {}", product)));
        lines.push(Line::from(format!("   Reason  [↑/↓]: {}", reason)));
        lines.push(Line::from(format!("   Quantity     : {}_", form.quantity)));
    }
    let summary = Paragraph::new(lines)
        .block(Block::default().title(" Spoilage Analysis ").borders(Borders::ALL));
    f.render_widget(summary, chunks[0]);

    let header = Row::new(vec!["Date", "Product", "Qty", "Reason"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .spoilage
        .recent(state.recent_spoilage_rows)
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.recorded_date.format("%Y-%m-%d").to_string()),
                Cell::from(r.product_name.clone()),
                Cell::from(r.quantity.to_string()),
                Cell::from(r.reason.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Min(16),
            Constraint::Length(5),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().title(" Recent Waste ").borders(Borders::ALL));
    f.render_widget(table, chunks[1]);
}

fn draw_regional(f: &mut Frame, state: &AppState, area: Rect) {
    let regional = &state.regional;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let summary = regional.summary();
    let lines = vec![
        Line::from(vec![
            Span::styled(" Region: ", Style::default().fg(Color::DarkGray)),
            Span::raw(regional.region().unwrap_or("-").to_string()),
            Span::styled("  Store: ", Style::default().fg(Color::DarkGray)),
            Span::raw(regional.store().unwrap_or("All").to_string()),
        ]),
        Line::from(vec![
            Span::styled(" Spoilage: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("${:.0}", summary.total_spoilage)),
            Span::styled("  Avg accuracy: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.1}%", summary.mean_accuracy)),
            Span::styled("  Best: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                summary.best_store.unwrap_or_else(|| "-".to_string()),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  Worst: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                summary.worst_store.unwrap_or_else(|| "-".to_string()),
                Style::default().fg(Color::Red),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let rows = regional.displayed();
    let title = format!(" {} ", regional.title());
    if rows.is_empty() {
        let message = if state.loading.contains(&NavView::RegionalView) {
            "Loading performance data..."
        } else {
            "No performance data"
        };
        empty_panel(f, chunks[1], title.trim(), message, None);
        return;
    }

    let header = Row::new(vec!["Store", "Spoilage", "Accuracy", "Turnover"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = rows
        .into_iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.store_name.clone()),
                Cell::from(format!("${:.0}", r.total_spoilage)),
                Cell::from(format!("{:.1}%", r.order_accuracy)),
                Cell::from(format!("{:.1}x", r.inventory_turnover)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(table, chunks[1]);
}

fn draw_mailbox(f: &mut Frame, state: &AppState, area: Rect) {
    let notifications = state.mailbox.notifications();
    if notifications.is_empty() {
        let message = if state.loading.contains(&NavView::Mailbox) {
            "Loading notifications..."
        } else {
            "No notifications"
        };
        empty_panel(f, area, "Mailbox", message, None);
        return;
    }

    let max_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (i, n) in notifications.iter().enumerate() {
        let marker = if n.read { "  " } else { "● " };
        let mut title_style = Style::default();
        if !n.read {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        if i == state.mailbox_cursor {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled(format!(" {}", marker), Style::default().fg(Color::Green)),
            Span::styled(format!("[{:?}] ", n.kind), Style::default().fg(Color::Yellow)),
            Span::styled(n.title.clone(), title_style),
            Span::styled(
                format!("  {}", n.date.format("%Y-%m-%d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", truncate_with_ellipsis(&n.message, max_width.saturating_sub(5))),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let title = format!(" Mailbox [{} unread] ", state.mailbox.unread_count());
    let para = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_corporate(f: &mut Frame, state: &AppState, area: Rect) {
    let corporate = &state.corporate;
    if corporate.kpis().is_empty() && corporate.performance().is_empty() {
        let message = if state.loading.contains(&NavView::Corporate) {
            "Loading corporate dashboard..."
        } else {
            "No corporate data"
        };
        empty_panel(f, area, "Corporate Analytics Dashboard", message, None);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(corporate.kpis().len() as u16 + 3),
            Constraint::Min(0),
        ])
        .split(area);

    let kpi_rows: Vec<Row> = corporate
        .kpis()
        .iter()
        .map(|k| {
            let (arrow, color) = match k.trend {
                Trend::Up => ("▲", Color::Green),
                Trend::Down => ("▼", Color::Red),
                Trend::Neutral => ("■", Color::DarkGray),
            };
            Row::new(vec![
                Cell::from(k.name.clone()),
                Cell::from(k.value.clone()),
                Cell::from(format!("{} {}", arrow, k.change)).style(Style::default().fg(color)),
            ])
        })
        .collect();
    let kpis = Table::new(
        kpi_rows,
        [Constraint::Min(20), Constraint::Length(12), Constraint::Min(20)],
    )
    .header(Row::new(vec!["KPI", "Value", "Change"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().title(" Corporate Analytics Dashboard ").borders(Borders::ALL));
    f.render_widget(kpis, chunks[0]);

    let worst = corporate.worst_category().map(|p| p.category.as_str());
    let perf_rows: Vec<Row> = corporate
        .performance()
        .iter()
        .map(|p| {
            let rate = corporate
                .spoilage_rate(&p.category)
                .map(|r| format!("{:.1}%", r * 100.0))
                .unwrap_or_else(|| "-".to_string());
            let row = Row::new(vec![
                Cell::from(p.category.clone()),
                Cell::from(format!("${:.0}k", p.sales / 1000.0)),
                Cell::from(format!("${:.0}k", p.spoilage / 1000.0)),
                Cell::from(rate),
            ]);
            if Some(p.category.as_str()) == worst {
                row.style(Style::default().fg(Color::Red))
            } else {
                row
            }
        })
        .collect();
    let perf = Table::new(
        perf_rows,
        [
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["Category", "Sales", "Spoilage", "Rate"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(" Performance by Category ").borders(Borders::ALL));
    f.render_widget(perf, chunks[1]);
}

fn draw_last_log(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(entry) = state.logs.back() else {
        return;
    };
    let color = match entry.level.as_str() {
        "ERROR" => Color::Red,
        "WARN" => Color::Yellow,
        _ => Color::DarkGray,
    };
    let prefix = format!(" {} [{}] ", entry.time, entry.level);
    let msg_max = (area.width as usize).saturating_sub(prefix.len());
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(color)),
        Span::raw(truncate_with_ellipsis(&entry.message, msg_max).into_owned()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn key_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    match (&state.input, state.view) {
        (InputMode::EditQuantity { .. }, _) => vec![("[Enter]", " save  "), ("[Esc]", " cancel  ")],
        (InputMode::LogWaste(_), _) => vec![
            ("[←/→]", " product  "),
            ("[↑/↓]", " reason  "),
            ("[0-9]", " qty  "),
            ("[Enter]", " log  "),
            ("[Esc]", " cancel  "),
        ],
        (InputMode::CountInventory(_), _) => vec![
            ("[←/→]", " product  "),
            ("[0-9]", " count  "),
            ("[Enter]", " update  "),
            ("[Esc]", " cancel  "),
        ],
        (InputMode::Normal, NavView::Orders) => vec![
            ("[q]", "uit  "),
            ("[Tab]", " view  "),
            ("[Space]", " select  "),
            ("[a]", "ll  "),
            ("[Enter]", " approve  "),
            ("[A]", "pprove sel  "),
            ("[e]", "dit qty  "),
            ("[n]", "ext reason  "),
            ("[s]", "tatus  "),
            ("[c]", "ategory  "),
            ("[m]", "anual count  "),
            ("[r]", "efresh  "),
        ],
        (InputMode::Normal, NavView::SpoilageAnalysis) => {
            vec![("[q]", "uit  "), ("[Tab]", " view  "), ("[w]", "aste  "), ("[r]", "efresh  ")]
        }
        (InputMode::Normal, NavView::RegionalView) => vec![
            ("[q]", "uit  "),
            ("[Tab]", " view  "),
            ("[g]", " region  "),
            ("[t]", " store  "),
            ("[r]", "efresh  "),
        ],
        (InputMode::Normal, NavView::Mailbox) => vec![
            ("[q]", "uit  "),
            ("[Tab]", " view  "),
            ("[j/k]", " move  "),
            ("[Enter]", " read/unread  "),
            ("[r]", "efresh  "),
        ],
        (InputMode::Normal, NavView::OrderHistory | NavView::Corporate) => {
            vec![("[q]", "uit  "), ("[Tab]", " view  "), ("[r]", "efresh  ")]
        }
    }
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in key_hints(state) {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(label));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
