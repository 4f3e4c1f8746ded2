//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::adapters::model::Integrity;
use crate::domain::{format_number, SchemaVersion, Thresholds};
use crate::tui::styles::{BankTheme, LOGO_SMALL};

/// Dashboard state for rendering.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub dataset_path: String,
    pub dataset_rows: usize,
    pub dropped_cells: usize,
    pub thresholds: Thresholds,
    pub model_path: String,
    pub schema: SchemaVersion,
    pub integrity: Integrity,
    pub exposes_probability: bool,
    pub predictions_made: usize,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", BankTheme::text()),
        Span::styled(LOGO_SMALL, BankTheme::title()),
        Span::styled(" │ ", BankTheme::text_muted()),
        Span::styled(
            "Term Deposit Subscription Prediction",
            BankTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(BankTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    // Split into left (status) and right (thresholds)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_thresholds(f, chunks[1], state);
}

fn labelled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label}: "), BankTheme::text_secondary()),
        Span::styled(value, BankTheme::text()),
    ])
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let integrity_style = match state.integrity {
        Integrity::Signed => BankTheme::success(),
        Integrity::DigestsOnly => BankTheme::warning(),
        Integrity::Unsigned => BankTheme::danger(),
    };

    let status_items = vec![
        labelled("Dataset", state.dataset_path.clone()),
        labelled(
            "Rows",
            format!(
                "{} ({} null cells dropped)",
                state.dataset_rows, state.dropped_cells
            ),
        ),
        labelled("Model", state.model_path.clone()),
        labelled("Schema", state.schema.to_string()),
        Line::from(vec![
            Span::styled("  Integrity: ", BankTheme::text_secondary()),
            Span::styled(state.integrity.to_string(), integrity_style),
        ]),
        labelled(
            "Probability",
            if state.exposes_probability {
                "shown".to_string()
            } else {
                "not exposed".to_string()
            },
        ),
        labelled("Predictions", state.predictions_made.to_string()),
    ];

    let status_block = Block::default()
        .title(Span::styled(" System Status ", BankTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BankTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", BankTheme::key_hint()),
            Span::styled("New Prediction", BankTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", BankTheme::key_hint()),
            Span::styled("Quit", BankTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", BankTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BankTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn render_thresholds(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" Capping Thresholds ", BankTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BankTheme::border());

    let mut lines = vec![
        labelled("age (p99)", format_number(state.thresholds.age_cap)),
        labelled("campaign (p95)", format_number(state.thresholds.campaign_cap)),
        labelled("previous (p95)", format_number(state.thresholds.previous_cap)),
        Line::from(""),
    ];

    let note = if state.schema.normalizes() {
        "Values above a threshold are capped before prediction."
    } else {
        "This model takes raw values; thresholds are not applied."
    };
    lines.push(Line::from(Span::styled(note, BankTheme::text_muted())));

    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), inner);
}
