//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::model::LogisticModel;
use crate::application::{bootstrap, PredictionService};
use crate::config::AppConfig;
use crate::domain::{normalize, SchemaVersion};

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    form::{render_form, FormState},
    render_disclaimer,
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    CustomerForm,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    service: PredictionService<LogisticModel>,

    dashboard_state: DashboardState,

    form_state: FormState,
}

impl App {
    /// Create a new application from configuration.
    ///
    /// Loads the reference dataset and the model once; both stay read-only
    /// for the rest of the session.
    ///
    /// # Errors
    /// Returns error if the dataset or model cannot be loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let service = bootstrap(config).with_context(|| {
            format!(
                "Failed to start with dataset {:?} and model {:?}. Set DEPOSITSCOPE_DATASET_PATH and DEPOSITSCOPE_MODEL_PATH.",
                config.dataset_path, config.model_path
            )
        })?;
        Ok(Self::with_dependencies(
            service,
            config.dataset_path.display().to_string(),
        ))
    }

    /// Create application with an injected service (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(
        service: PredictionService<LogisticModel>,
        dataset_path: String,
    ) -> Self {
        let reference = service.reference();
        let model = service.classifier();
        let dashboard_state = DashboardState {
            dataset_path,
            dataset_rows: reference.row_count(),
            dropped_cells: reference.dropped_cells(),
            thresholds: reference.thresholds(),
            model_path: model.source().display().to_string(),
            schema: service.schema(),
            integrity: model.integrity(),
            exposes_probability: model.exposes_probability(),
            predictions_made: 0,
        };
        let form_state = FormState::new(reference, service.schema(), &service.default_input());

        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            service,
            dashboard_state,
            form_state,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, chunks[0], &self.dashboard_state),
                    Screen::CustomerForm => {
                        // Preview always reflects the current selections.
                        let input = self.form_state.to_input();
                        let record = self.service.build_record(&input);
                        let raw = normalize(
                            &input,
                            &self.service.reference().thresholds(),
                            SchemaVersion::Raw,
                        );
                        render_form(f, chunks[0], &self.form_state, &record, &raw);
                    }
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::CustomerForm => self.handle_form_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => {
                self.screen = Screen::CustomerForm;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.step(false),
            KeyCode::Right => self.form_state.step(true),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset_form(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => self.form_state.input_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let record = self.service.build_record(&self.form_state.to_input());
        tracing::debug!("Submitting record with {} columns", record.len());
        self.form_state.outcome = Some(self.service.predict(&record));
        self.dashboard_state.predictions_made += 1;
    }

    fn reset_form(&mut self) {
        let selected = self.form_state.selected_field;
        self.form_state = FormState::new(
            self.service.reference(),
            self.service.schema(),
            &self.service.default_input(),
        );
        self.form_state.selected_field = selected.min(self.form_state.fields.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::adapters::model::tests::grouped_model;
    use crate::domain::reference::tests::{row, HEADER};
    use crate::domain::{PredictionOutcome, ReferenceData};

    fn app() -> App {
        let rows = vec![
            row(56, "housemaid", 1, 999, 0),
            row(41, "admin.", 4, 6, 2),
            row(25, "technician", 2, 999, 0),
        ];
        let reference = ReferenceData::from_rows(&HEADER, &rows).expect("reference");
        let model = LogisticModel::from_exported(grouped_model(-1.0, true)).expect("model");
        let service = PredictionService::new(Arc::new(model), Arc::new(reference));
        App::with_dependencies(service, "bank.csv".into())
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_dashboard_navigation_and_quit() {
        let mut app = app();
        assert_eq!(app.screen, Screen::Dashboard);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::CustomerForm);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Dashboard);

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_predicts_and_change_clears() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Enter);

        let outcome = app.form_state.outcome.clone().expect("outcome");
        assert!(matches!(outcome, PredictionOutcome::Success { .. }));
        assert!(outcome.message().contains("will not subscribe"));
        assert_eq!(app.dashboard_state.predictions_made, 1);

        // Job is the second field and has several choices.
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert!(app.form_state.outcome.is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        let defaults = app.form_state.to_input();

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert_ne!(app.form_state.to_input(), defaults);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.form_state.to_input(), defaults);
        assert_eq!(app.form_state.selected_field, 1);
    }

    #[test]
    fn test_dashboard_reflects_loaded_state() {
        let app = app();
        assert_eq!(app.dashboard_state.dataset_rows, 3);
        assert_eq!(app.dashboard_state.schema, crate::domain::SchemaVersion::Grouped);
        assert!(app.dashboard_state.exposes_probability);
    }
}
