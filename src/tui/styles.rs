//! Banking color palette and styles.
//!
//! Navy and gold on a dark background, with high-contrast semantic colors for
//! the verdict panel.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{PredictionOutcome, Verdict};

/// Banking theme color palette.
pub struct BankTheme;

impl BankTheme {
    // === Primary Colors ===

    /// Navy - Primary color
    pub const PRIMARY: Color = Color::Rgb(37, 99, 235); // #2563EB

    /// Lighter blue for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(96, 165, 250); // #60A5FA

    /// Gold accent
    pub const ACCENT: Color = Color::Rgb(234, 179, 8); // #EAB308

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    // === Background Colors ===

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for the selected sidebar row
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for values the normalizer changed
    #[must_use]
    pub fn adjusted() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Success for subscribe, warning for decline, danger for failure.
    #[must_use]
    pub fn outcome(outcome: &PredictionOutcome) -> Style {
        match outcome {
            PredictionOutcome::Success {
                verdict: Verdict::Subscribe,
                ..
            } => Self::success(),
            PredictionOutcome::Success {
                verdict: Verdict::Decline,
                ..
            } => Self::warning(),
            PredictionOutcome::Failure { .. } => Self::danger(),
        }
    }

    /// Gauge style for a positive-class probability
    #[must_use]
    pub fn probability(p: f64) -> Style {
        if p >= 0.5 {
            Self::success()
        } else {
            Self::warning()
        }
    }
}

/// Inline logo
pub const LOGO_SMALL: &str = "DepositScope";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Prediction;

    #[test]
    fn test_outcome_styles() {
        let yes = PredictionOutcome::success(Prediction::new(1, None));
        let no = PredictionOutcome::success(Prediction::new(0, None));
        let err = PredictionOutcome::failure("boom");

        assert_eq!(BankTheme::outcome(&yes), BankTheme::success());
        assert_eq!(BankTheme::outcome(&no), BankTheme::warning());
        assert_eq!(BankTheme::outcome(&err), BankTheme::danger());
    }
}
