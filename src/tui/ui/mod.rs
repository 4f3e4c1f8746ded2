//! UI module: View components for the TUI.

pub mod dashboard;
pub mod form;
pub mod verdict;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::BankTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Predictions are indicative estimates from a pre-trained model.",
            BankTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "They are not a commitment by the customer.",
            BankTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(BankTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
