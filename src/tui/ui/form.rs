//! Customer attribute form: sidebar widgets, record preview and verdict.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::schema::columns;
use crate::domain::{
    format_number, CustomerInput, CustomerRecord, FeatureValue, PredictionOutcome,
    ReferenceData, SchemaVersion,
};
use crate::tui::styles::BankTheme;

use super::verdict::{render_preview, render_verdict};

/// Longest duration the entry accepts, in digits.
const MAX_DURATION_DIGITS: usize = 6;

const SLIDER_WIDTH: usize = 12;

/// Input widget backing one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Integer slider; Left/Right step by 1
    Slider { value: f64, min: f64, max: f64 },
    /// Dropdown over reference values; Left/Right cycle
    Select {
        options: Vec<FeatureValue>,
        index: usize,
    },
    /// Free numeric entry (digits only)
    NumberEntry { buffer: String },
}

impl Widget {
    fn select(options: Vec<FeatureValue>, current: &FeatureValue) -> Self {
        let index = options.iter().position(|o| o == current).unwrap_or(0);
        Self::Select { options, index }
    }

    /// Current value, if the widget has one.
    #[must_use]
    pub fn value(&self) -> Option<FeatureValue> {
        match self {
            Self::Slider { value, .. } => Some(FeatureValue::Number(*value)),
            Self::Select { options, index } => options.get(*index).cloned(),
            Self::NumberEntry { buffer } => {
                Some(FeatureValue::Number(buffer.parse().unwrap_or(0.0)))
            }
        }
    }

    fn step(&mut self, forward: bool) -> bool {
        match self {
            Self::Slider { value, min, max } => {
                let next = if forward { *value + 1.0 } else { *value - 1.0 };
                let next = next.clamp(*min, *max);
                let changed = next != *value;
                *value = next;
                changed
            }
            Self::Select { options, index } => {
                let len = options.len();
                if len < 2 {
                    return false;
                }
                *index = if forward {
                    (*index + 1) % len
                } else {
                    (*index + len - 1) % len
                };
                true
            }
            Self::NumberEntry { .. } => false,
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Slider { value, min, max } => {
                let span = (max - min).max(1.0);
                let filled = (((value - min) / span) * SLIDER_WIDTH as f64).round() as usize;
                let filled = filled.min(SLIDER_WIDTH);
                format!(
                    "{:>3} {}{}",
                    format_number(*value),
                    "█".repeat(filled),
                    "░".repeat(SLIDER_WIDTH - filled)
                )
            }
            Self::Select { .. } => match self.value() {
                Some(v) => format!("◀ {v} ▶"),
                None => "<no values>".to_string(),
            },
            Self::NumberEntry { buffer } if buffer.is_empty() => "0".to_string(),
            Self::NumberEntry { buffer } => buffer.clone(),
        }
    }
}

/// One row of the sidebar.
#[derive(Debug, Clone)]
pub struct FormField {
    pub column: &'static str,
    pub label: &'static str,
    pub widget: Widget,
}

/// Form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    /// Verdict of the last button press; cleared when any selection changes
    pub outcome: Option<PredictionOutcome>,
}

fn label_for(column: &str) -> &'static str {
    match column {
        columns::AGE => "Age",
        columns::JOB => "Job",
        columns::MARITAL => "Marital status",
        columns::EDUCATION => "Education",
        columns::DEFAULT => "Credit in default",
        columns::HOUSING => "Housing loan",
        columns::LOAN => "Personal loan",
        columns::CONTACT => "Contact type",
        columns::MONTH => "Contact month",
        columns::DAY_OF_WEEK => "Contact weekday",
        columns::DURATION => "Call duration (s)",
        columns::CAMPAIGN => "Contacts this campaign",
        columns::PDAYS => "Days since contact (999 = never)",
        columns::PREVIOUS => "Contacts before",
        columns::POUTCOME => "Previous outcome",
        columns::EMP_VAR_RATE => "Employment var. rate",
        columns::CONS_PRICE_IDX => "Consumer price idx",
        columns::CONS_CONF_IDX => "Consumer confidence idx",
        columns::EURIBOR3M => "Euribor 3m",
        columns::NR_EMPLOYED => "Employees",
        _ => "?",
    }
}

fn input_value(input: &CustomerInput, column: &str) -> FeatureValue {
    match column {
        columns::AGE => input.age.into(),
        columns::JOB => input.job.as_str().into(),
        columns::MARITAL => input.marital.as_str().into(),
        columns::EDUCATION => input.education.as_str().into(),
        columns::DEFAULT => input.default.as_str().into(),
        columns::HOUSING => input.housing.as_str().into(),
        columns::LOAN => input.loan.as_str().into(),
        columns::CONTACT => input.contact.as_str().into(),
        columns::MONTH => input.month.as_str().into(),
        columns::DAY_OF_WEEK => input.day_of_week.as_str().into(),
        columns::DURATION => input.duration.into(),
        columns::CAMPAIGN => input.campaign.into(),
        columns::PDAYS => input.pdays.into(),
        columns::PREVIOUS => input.previous.into(),
        columns::POUTCOME => input.poutcome.as_str().into(),
        columns::EMP_VAR_RATE => input.emp_var_rate.into(),
        columns::CONS_PRICE_IDX => input.cons_price_idx.into(),
        columns::CONS_CONF_IDX => input.cons_conf_idx.into(),
        columns::EURIBOR3M => input.euribor3m.into(),
        _ => input.nr_employed.into(),
    }
}

fn set_input_value(input: &mut CustomerInput, column: &str, value: FeatureValue) {
    let number = value.as_number().unwrap_or_default();
    let text = || value.as_category().unwrap_or_default().to_string();
    match column {
        columns::AGE => input.age = number,
        columns::JOB => input.job = text(),
        columns::MARITAL => input.marital = text(),
        columns::EDUCATION => input.education = text(),
        columns::DEFAULT => input.default = text(),
        columns::HOUSING => input.housing = text(),
        columns::LOAN => input.loan = text(),
        columns::CONTACT => input.contact = text(),
        columns::MONTH => input.month = text(),
        columns::DAY_OF_WEEK => input.day_of_week = text(),
        columns::DURATION => input.duration = number,
        columns::CAMPAIGN => input.campaign = number,
        columns::PDAYS => input.pdays = number,
        columns::PREVIOUS => input.previous = number,
        columns::POUTCOME => input.poutcome = text(),
        columns::EMP_VAR_RATE => input.emp_var_rate = number,
        columns::CONS_PRICE_IDX => input.cons_price_idx = number,
        columns::CONS_CONF_IDX => input.cons_conf_idx = number,
        columns::EURIBOR3M => input.euribor3m = number,
        columns::NR_EMPLOYED => input.nr_employed = number,
        _ => {}
    }
}

/// Sidebar order: the raw dataset's column order.
const FIELD_ORDER: [&str; 20] = [
    columns::AGE,
    columns::JOB,
    columns::MARITAL,
    columns::EDUCATION,
    columns::DEFAULT,
    columns::HOUSING,
    columns::LOAN,
    columns::CONTACT,
    columns::MONTH,
    columns::DAY_OF_WEEK,
    columns::DURATION,
    columns::CAMPAIGN,
    columns::PDAYS,
    columns::PREVIOUS,
    columns::POUTCOME,
    columns::EMP_VAR_RATE,
    columns::CONS_PRICE_IDX,
    columns::CONS_CONF_IDX,
    columns::EURIBOR3M,
    columns::NR_EMPLOYED,
];

impl FormState {
    /// Build one widget per input the schema needs, starting from `initial`.
    #[must_use]
    pub fn new(reference: &ReferenceData, schema: SchemaVersion, initial: &CustomerInput) -> Self {
        let fields = FIELD_ORDER
            .iter()
            .filter(|column| match **column {
                columns::DURATION => schema.kind_of(columns::DURATION).is_some(),
                _ => true,
            })
            .map(|&column| {
                let current = input_value(initial, column);
                let widget = match column {
                    columns::AGE => {
                        let (min, max) = reference.range(column).unwrap_or((18.0, 100.0));
                        Widget::Slider {
                            value: initial.age.clamp(min, max),
                            min,
                            max,
                        }
                    }
                    columns::DURATION => Widget::NumberEntry {
                        buffer: format_number(initial.duration.max(0.0)),
                    },
                    _ => {
                        let options: Vec<FeatureValue> = match current {
                            FeatureValue::Number(_) => reference
                                .numeric_choices(column)
                                .iter()
                                .map(|v| FeatureValue::Number(*v))
                                .collect(),
                            FeatureValue::Category(_) => reference
                                .choices(column)
                                .iter()
                                .map(|c| FeatureValue::from(c.as_str()))
                                .collect(),
                        };
                        Widget::select(options, &current)
                    }
                };
                FormField {
                    column,
                    label: label_for(column),
                    widget,
                }
            })
            .collect();

        Self {
            fields,
            selected_field: 0,
            outcome: None,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Step the selected widget right (`forward`) or left.
    pub fn step(&mut self, forward: bool) {
        if self.fields[self.selected_field].widget.step(forward) {
            self.outcome = None;
        }
    }

    /// Type a digit into a number entry.
    pub fn input_char(&mut self, c: char) {
        if let Widget::NumberEntry { buffer } = &mut self.fields[self.selected_field].widget {
            if c.is_ascii_digit() && buffer.len() < MAX_DURATION_DIGITS {
                if buffer == "0" {
                    buffer.clear();
                }
                buffer.push(c);
                self.outcome = None;
            }
        }
    }

    /// Delete the last digit of a number entry.
    pub fn delete_char(&mut self) {
        if let Widget::NumberEntry { buffer } = &mut self.fields[self.selected_field].widget {
            if buffer.pop().is_some() {
                self.outcome = None;
            }
        }
    }

    /// Current selections as raw input.
    #[must_use]
    pub fn to_input(&self) -> CustomerInput {
        let mut input = CustomerInput::default();
        for field in &self.fields {
            if let Some(value) = field.widget.value() {
                set_input_value(&mut input, field.column, value);
            }
        }
        input
    }
}

/// Render the form screen
pub fn render_form(
    f: &mut Frame,
    area: Rect,
    state: &FormState,
    record: &CustomerRecord,
    raw: &CustomerRecord,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Sidebar + preview
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_form_header(f, chunks[0], record.schema());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_sidebar(f, body[0], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(body[1]);

    render_preview(f, right[0], record, raw);
    render_verdict(f, right[1], state.outcome.as_ref());

    render_form_footer(f, chunks[2]);
}

fn render_form_header(f: &mut Frame, area: Rect, schema: SchemaVersion) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", BankTheme::text()),
        Span::styled("Customer Profile", BankTheme::title()),
        Span::styled(" │ model schema ", BankTheme::text_secondary()),
        Span::styled(schema.to_string(), BankTheme::text_muted()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(BankTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_sidebar(f: &mut Frame, area: Rect, state: &FormState) {
    let block = Block::default()
        .title(Span::styled(" Attributes ", BankTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BankTheme::border_focused());

    // Keep the selected row visible on short terminals.
    let visible = area.height.saturating_sub(2).max(1) as usize;
    let start = (state.selected_field + 1).saturating_sub(visible);

    let lines: Vec<Line> = state
        .fields
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, field)| {
            let selected = i == state.selected_field;
            let label_style = if selected {
                BankTheme::selected()
            } else {
                BankTheme::text_secondary()
            };
            Line::from(vec![
                Span::styled(format!(" {:<24}", field.label), label_style),
                Span::styled(" ", BankTheme::text()),
                Span::styled(field.widget.display(), BankTheme::text()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_form_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[↑↓] ", BankTheme::key_hint()),
        Span::styled("Navigate ", BankTheme::key_desc()),
        Span::styled("[←→] ", BankTheme::key_hint()),
        Span::styled("Change ", BankTheme::key_desc()),
        Span::styled("[Enter] ", BankTheme::key_hint()),
        Span::styled("Predict ", BankTheme::key_desc()),
        Span::styled("[R] ", BankTheme::key_hint()),
        Span::styled("Reset ", BankTheme::key_desc()),
        Span::styled("[Esc] ", BankTheme::key_hint()),
        Span::styled("Back", BankTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(BankTheme::border()),
    );

    f.render_widget(footer, area);
}
