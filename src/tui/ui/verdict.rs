//! Record preview and verdict panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{CustomerRecord, PredictionOutcome};
use crate::tui::styles::BankTheme;

/// Columns whose model value differs from the selection as entered.
///
/// `raw` is the untransformed record for the same input; columns it lacks
/// (derived buckets) count as adjusted.
#[must_use]
pub fn adjusted_columns(record: &CustomerRecord, raw: &CustomerRecord) -> Vec<&'static str> {
    record
        .iter()
        .filter(|(column, value)| raw.get(column) != Some(*value))
        .map(|(column, _)| column)
        .collect()
}

/// Read-only view of the record exactly as the model will receive it.
///
/// Values the normalizer changed are highlighted.
pub fn render_preview(f: &mut Frame, area: Rect, record: &CustomerRecord, raw: &CustomerRecord) {
    let block = Block::default()
        .title(Span::styled(" Model Input ", BankTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BankTheme::border());

    let adjusted = adjusted_columns(record, raw);
    let lines: Vec<Line> = record
        .iter()
        .map(|(column, value)| {
            let value_style = if adjusted.contains(&column) {
                BankTheme::adjusted()
            } else {
                BankTheme::text()
            };
            Line::from(vec![
                Span::styled(format!(" {column:<16}"), BankTheme::text_secondary()),
                Span::styled("│ ", BankTheme::text_muted()),
                Span::styled(value.to_string(), value_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Verdict of the last prediction, or a prompt when there is none.
pub fn render_verdict(f: &mut Frame, area: Rect, outcome: Option<&PredictionOutcome>) {
    let block = Block::default()
        .title(Span::styled(" Prediction ", BankTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BankTheme::border());

    let Some(outcome) = outcome else {
        let prompt = Paragraph::new(Line::from(Span::styled(
            "Press [Enter] to predict.",
            BankTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(prompt, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let probability = match outcome {
        PredictionOutcome::Success { prediction, .. } => prediction.probability,
        PredictionOutcome::Failure { .. } => None,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(2),
            Constraint::Length(if probability.is_some() { 3 } else { 0 }),
        ])
        .split(inner);

    let mut lines = vec![Line::from(Span::styled(
        outcome.message().to_string(),
        BankTheme::outcome(outcome),
    ))];
    if let PredictionOutcome::Success { created_at, .. } = outcome {
        lines.push(Line::from(Span::styled(
            format!("at {}", created_at.format("%Y-%m-%d %H:%M:%S UTC")),
            BankTheme::text_muted(),
        )));
    }
    let message = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);

    if let Some(p) = probability {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(
                        " Subscription Probability ",
                        BankTheme::text_secondary(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(BankTheme::border()),
            )
            .gauge_style(BankTheme::probability(p))
            .ratio(p.clamp(0.0, 1.0))
            .label(format!("{:.1}%", p * 100.0));
        f.render_widget(gauge, chunks[1]);
    }
}
