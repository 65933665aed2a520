//! Application state for the interactive cost estimation form
//!
//! [`EstimatorApp`] owns the row list, the rendered results and the focus
//! position. The catalog is injected at construction. Key handling is
//! synchronous and returns an [`AppAction`]; the event loop performs the
//! network submission and hands the outcome back through
//! [`EstimatorApp::finish_calculation`].

use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;

use crate::catalog::PricingCatalog;
use crate::error::{EstimatorError, Result};
use crate::models::{CalculationRequest, CalculationResult};
use crate::results::ResultsView;
use crate::rows::{RowField, RowId, RowManager};

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    None,
    Quit,
    Calculate(CalculationRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

pub struct EstimatorApp {
    rows: RowManager,
    results: ResultsView,
    selected: usize,
    field: RowField,
    pending: bool,
    status: Option<StatusMessage>,
}

impl EstimatorApp {
    /// Create the form with one default row
    pub fn new(catalog: Option<Arc<PricingCatalog>>) -> Self {
        let mut rows = RowManager::new(catalog);
        rows.add_row();

        Self {
            rows,
            results: ResultsView::new(),
            selected: 0,
            field: RowField::Type,
            pending: false,
            status: None,
        }
    }

    pub fn rows(&self) -> &RowManager {
        &self.rows
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    /// Index of the focused row
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row_id(&self) -> Option<RowId> {
        self.rows.rows().get(self.selected).map(|r| r.id())
    }

    pub fn field(&self) -> RowField {
        self.field
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn catalog_loaded(&self) -> bool {
        self.rows.catalog().is_some()
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('a') | KeyCode::Char('A') => self.add_row(),
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if let Some(request) = self.request_calculation() {
                    return AppAction::Calculate(request);
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::BackTab => self.field = self.field.prev(),
            KeyCode::Right | KeyCode::Tab => self.field = self.field.next(),
            KeyCode::Char(' ') | KeyCode::Enter => self.cycle_focused(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.edit_focused(|text| text.push(c)),
            KeyCode::Backspace => self.edit_focused(|text| {
                text.pop();
            }),
            _ => {}
        }
        AppAction::None
    }

    pub fn add_row(&mut self) {
        self.rows.add_row();
        self.selected = self.rows.len() - 1;
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected_row_id() else {
            return;
        };
        if let Err(e) = self.rows.remove_row(id) {
            self.report(e);
            return;
        }
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    /// Build a request from the current rows and mark it pending
    ///
    /// Returns `None` while another calculation is pending or when a row
    /// holds invalid input; the reason is left in the status line.
    pub fn request_calculation(&mut self) -> Option<CalculationRequest> {
        if self.pending {
            self.report(EstimatorError::SubmitInFlight);
            return None;
        }

        match self.rows.collect_rows() {
            Ok(request) => {
                self.pending = true;
                self.status = Some(StatusMessage::Info("Calculating…".to_string()));
                Some(request)
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// Apply the outcome of a submission
    ///
    /// On failure the previous results stay on screen untouched.
    pub fn finish_calculation(&mut self, outcome: Result<CalculationResult>) {
        self.pending = false;
        match outcome {
            Ok(result) => {
                self.results.apply(&result);
                self.status = None;
            }
            Err(e) => self.report(e),
        }
    }

    fn cycle_focused(&mut self) {
        let Some(id) = self.selected_row_id() else {
            return;
        };
        if self.field.is_choice() {
            if let Err(e) = self.rows.cycle_choice(id, self.field) {
                self.report(e);
            }
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(row) = self.rows.rows().get(self.selected) else {
            return;
        };
        let id = row.id();
        let result = match self.field {
            RowField::Quantity => {
                let mut text = row.quantity().to_string();
                edit(&mut text);
                self.rows.set_quantity(id, text)
            }
            RowField::Hours => {
                let mut text = row.hours().to_string();
                edit(&mut text);
                self.rows.set_hours(id, text)
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn report(&mut self, error: EstimatorError) {
        self.status = Some(StatusMessage::Error(error.to_string()));
    }
}
