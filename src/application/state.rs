//! Terminal session state for the recipient form.
//!
//! [`App`] wraps the [`FormController`] with everything that only matters to
//! the terminal: which field has focus, which dropdown is open, the status
//! line, and the sink that receives finished submissions.

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::application::controller::{FormController, FormEvent, Phase, Transition};
use crate::domain::{Field, Step, BANKS, COUNTRY_CODES};
use crate::infrastructure::{LogSink, SubmissionSink};

/// Longest the event loop waits for input before re-checking the lookup.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Represents the current mode of the terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Typing into the focused field
    Form,
    /// The bank list is open
    BankDropdown,
    /// The country code list is open
    CountryDropdown,
    /// Key reference popup
    Help,
}

pub struct App {
    /// The form state machine
    pub form: FormController,
    /// Where completed records go
    pub sink: Box<dyn SubmissionSink>,
    /// Current interaction mode
    pub mode: AppMode,
    /// Field receiving keystrokes
    pub focus: Field,
    /// Highlighted row in the open dropdown
    pub dropdown_index: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Number of recipients submitted this session
    pub submitted_count: usize,
    /// Set when the user asks to leave
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(FormController::default(), Box::new(LogSink))
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("form", &self.form)
            .field("mode", &self.mode)
            .field("focus", &self.focus)
            .field("status_message", &self.status_message)
            .finish_non_exhaustive()
    }
}

/// Fields that take focus in each step, in tab order.
pub fn focus_order(step: Step) -> &'static [Field] {
    match step {
        Step::One => &[Field::Bank, Field::AccountNumber],
        Step::Two => &[Field::Email, Field::CountryCode, Field::PhoneNumber],
    }
}

impl App {
    pub fn new(form: FormController, sink: Box<dyn SubmissionSink>) -> Self {
        Self {
            form,
            sink,
            mode: AppMode::Form,
            focus: Field::Bank,
            dropdown_index: 0,
            status_message: None,
            submitted_count: 0,
            should_quit: false,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.form.phase() == Phase::Submitted
    }

    /// Forwards an event to the form and reacts to the resulting transition.
    pub fn dispatch(&mut self, event: FormEvent, now: Instant) {
        let transition = match self.form.handle(event, now) {
            Ok(transition) => transition,
            Err(err) => {
                warn!("{err}");
                self.status_message = Some(err.to_string());
                return;
            }
        };

        match transition {
            Transition::Updated | Transition::Ignored => {}
            Transition::Invalid => {
                let first_error = self
                    .form
                    .errors()
                    .iter()
                    .map(|(field, _)| field)
                    .find(|field| self.is_focusable(*field));
                if let Some(field) = first_error {
                    self.focus = field;
                }
                self.status_message = Some("Please fix the highlighted fields".to_string());
            }
            Transition::Advanced => {
                self.focus = Field::Email;
                self.status_message = None;
            }
            Transition::WentBack => {
                self.focus = Field::Bank;
                self.status_message = None;
            }
            Transition::Submitted(data) => match self.sink.submit(&data) {
                Ok(destination) => {
                    self.submitted_count += 1;
                    info!("recipient {} saved to {destination}", data.account_number);
                    self.status_message = Some(format!("Form submitted successfully ({destination})"));
                }
                Err(err) => {
                    warn!("submission failed: {err}");
                    self.form.reopen();
                    self.status_message = Some(format!("Submission failed: {err}"));
                }
            },
        }
    }

    pub fn next(&mut self, now: Instant) {
        self.dispatch(FormEvent::Next, now);
    }

    pub fn back(&mut self, now: Instant) {
        self.dispatch(FormEvent::Back, now);
    }

    /// Lets a due lookup complete.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.form.tick(now)
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.form
            .next_deadline()
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(MAX_POLL_INTERVAL)
            .min(MAX_POLL_INTERVAL)
    }

    pub fn start_new_recipient(&mut self) {
        self.form.reset();
        self.mode = AppMode::Form;
        self.focus = Field::Bank;
        self.status_message = None;
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_previous(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, delta: isize) {
        let Some(step) = self.form.step() else {
            return;
        };
        let order = focus_order(step);
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(order.len() as isize) as usize;
        self.focus = order[next];
    }

    fn is_focusable(&self, field: Field) -> bool {
        self.form.step().is_some_and(|step| focus_order(step).contains(&field))
    }

    /// Current text of the focused field, as the user sees it before normalisation.
    fn focused_value(&self) -> Option<&str> {
        let data = self.form.data();
        match self.focus {
            Field::AccountNumber => Some(data.account_number.as_str()),
            Field::Email => Some(data.email.as_str()),
            Field::PhoneNumber => Some(data.phone_number.as_str()),
            Field::Bank | Field::AccountName | Field::CountryCode => None,
        }
    }

    fn text_event(&self, value: String) -> Option<FormEvent> {
        match self.focus {
            Field::AccountNumber => Some(FormEvent::AccountNumberChanged(value)),
            Field::Email => Some(FormEvent::EmailChanged(value)),
            Field::PhoneNumber => Some(FormEvent::PhoneNumberChanged(value)),
            Field::Bank | Field::AccountName | Field::CountryCode => None,
        }
    }

    pub fn type_char(&mut self, c: char, now: Instant) {
        let Some(current) = self.focused_value() else {
            return;
        };
        let mut value = current.to_string();
        value.push(c);
        self.edit_focused(value, now);
    }

    /// Appends pasted text to the focused field.
    pub fn paste(&mut self, text: &str, now: Instant) {
        let Some(current) = self.focused_value() else {
            return;
        };
        let value = format!("{current}{}", text.trim());
        self.edit_focused(value, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let Some(current) = self.focused_value() else {
            return;
        };
        let mut value = current.to_string();
        if value.pop().is_some() {
            self.edit_focused(value, now);
        }
    }

    pub fn clear_focused(&mut self, now: Instant) {
        if self.focused_value().is_some_and(|v| !v.is_empty()) {
            self.edit_focused(String::new(), now);
        }
    }

    fn edit_focused(&mut self, value: String, now: Instant) {
        if let Some(event) = self.text_event(value) {
            self.status_message = None;
            self.dispatch(event, now);
        }
    }

    /// Opens the list for the focused select field. Returns `false` if the focus is not a select.
    pub fn open_dropdown(&mut self) -> bool {
        let data = self.form.data();
        match self.focus {
            Field::Bank => {
                self.dropdown_index = BANKS.iter().position(|b| *b == data.bank).unwrap_or(0);
                self.mode = AppMode::BankDropdown;
                true
            }
            Field::CountryCode => {
                self.dropdown_index = COUNTRY_CODES
                    .iter()
                    .position(|c| c.code == data.country_code)
                    .unwrap_or(0);
                self.mode = AppMode::CountryDropdown;
                true
            }
            _ => false,
        }
    }

    pub fn close_dropdown(&mut self) {
        if matches!(self.mode, AppMode::BankDropdown | AppMode::CountryDropdown) {
            self.mode = AppMode::Form;
        }
    }

    /// Number of options in the open list, zero when none is open.
    pub fn dropdown_len(&self) -> usize {
        match self.mode {
            AppMode::BankDropdown => BANKS.len(),
            AppMode::CountryDropdown => COUNTRY_CODES.len(),
            AppMode::Form | AppMode::Help => 0,
        }
    }

    pub fn dropdown_down(&mut self) {
        let len = self.dropdown_len();
        if len > 0 {
            self.dropdown_index = (self.dropdown_index + 1) % len;
        }
    }

    pub fn dropdown_up(&mut self) {
        let len = self.dropdown_len();
        if len > 0 {
            self.dropdown_index = (self.dropdown_index + len - 1) % len;
        }
    }

    /// Sends the highlighted option to the form and closes the list.
    pub fn confirm_dropdown(&mut self, now: Instant) {
        let event = match self.mode {
            AppMode::BankDropdown => BANKS.get(self.dropdown_index).map(|b| FormEvent::BankChanged(b.to_string())),
            AppMode::CountryDropdown => COUNTRY_CODES
                .get(self.dropdown_index)
                .map(|c| FormEvent::CountryCodeChanged(c.code.to_string())),
            AppMode::Form | AppMode::Help => None,
        };
        self.mode = AppMode::Form;
        if let Some(event) = event {
            self.dispatch(event, now);
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Form,
            _ => AppMode::Help,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, DomainResult, FormData, SimulatedResolver};
    use std::cell::RefCell;
    use std::rc::Rc;

    const LATENCY: Duration = Duration::from_millis(800);

    #[derive(Default, Clone)]
    struct RecordingSink {
        records: Rc<RefCell<Vec<FormData>>>,
    }

    impl SubmissionSink for RecordingSink {
        fn submit(&mut self, data: &FormData) -> DomainResult<String> {
            self.records.borrow_mut().push(data.clone());
            Ok("memory".to_string())
        }
    }

    struct FailingSink;

    impl SubmissionSink for FailingSink {
        fn submit(&mut self, _data: &FormData) -> DomainResult<String> {
            Err(DomainError::Io(std::io::Error::other("disk full")))
        }
    }

    fn app_with_sink() -> (App, RecordingSink) {
        let sink = RecordingSink::default();
        let form = FormController::new(Box::new(SimulatedResolver::new("ODUTUGA GBEKE", LATENCY)));
        (App::new(form, Box::new(sink.clone())), sink)
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.type_char(c, now);
        }
    }

    fn complete_step1(app: &mut App, now: Instant) {
        app.focus = Field::Bank;
        assert!(app.open_dropdown());
        app.dropdown_down();
        app.confirm_dropdown(now);
        app.focus = Field::AccountNumber;
        type_str(app, "1234567890", now);
        app.tick(now + LATENCY);
        app.next(now + LATENCY);
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.focus, Field::Bank);
        assert!(app.status_message.is_none());
        assert!(!app.is_submitted());
    }

    #[test]
    fn test_bank_dropdown_selection() {
        let (mut app, _) = app_with_sink();
        let now = Instant::now();

        assert!(app.open_dropdown());
        assert_eq!(app.mode, AppMode::BankDropdown);
        app.dropdown_up();
        assert_eq!(app.dropdown_index, BANKS.len() - 1);
        app.confirm_dropdown(now);

        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.form.data().bank, "Sterling Bank");
    }

    #[test]
    fn test_typing_account_number_starts_lookup() {
        let (mut app, _) = app_with_sink();
        let now = Instant::now();
        app.focus = Field::AccountNumber;

        type_str(&mut app, "12ab345678901", now);

        assert_eq!(app.form.data().account_number, "1234567890");
        assert!(app.form.is_loading());
        assert_eq!(app.poll_timeout(now), MAX_POLL_INTERVAL);
        assert_eq!(app.poll_timeout(now + Duration::from_millis(700)), Duration::from_millis(100));

        assert!(app.tick(now + LATENCY));
        assert_eq!(app.form.data().account_name, "ODUTUGA GBEKE");

        app.backspace(now + LATENCY);
        assert_eq!(app.form.data().account_number, "123456789");
        assert!(app.form.data().account_name.is_empty());
    }

    #[test]
    fn test_invalid_step1_focuses_first_error() {
        let (mut app, _) = app_with_sink();
        app.focus = Field::AccountNumber;

        app.next(Instant::now());

        assert_eq!(app.focus, Field::Bank);
        assert_eq!(app.status_message.as_deref(), Some("Please fix the highlighted fields"));
    }

    #[test]
    fn test_full_flow_submits_once() {
        let (mut app, sink) = app_with_sink();
        let now = Instant::now();

        complete_step1(&mut app, now);
        assert_eq!(app.form.step(), Some(Step::Two));
        assert_eq!(app.focus, Field::Email);

        type_str(&mut app, "a@b.com", now);
        app.focus_next();
        assert_eq!(app.focus, Field::CountryCode);
        app.focus_next();
        app.paste(" 0801 234 5678 ", now);
        app.next(now);

        assert!(app.is_submitted());
        assert_eq!(app.submitted_count, 1);
        let records = sink.records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bank, "GTBank");
        assert_eq!(records[0].account_name, "ODUTUGA GBEKE");
        assert_eq!(records[0].email, "a@b.com");
        assert_eq!(records[0].phone_number, "08012345678");
    }

    #[test]
    fn test_failed_submission_keeps_form_open() {
        let (mut app, sink) = app_with_sink();
        app.sink = Box::new(FailingSink);
        let now = Instant::now();

        complete_step1(&mut app, now);
        type_str(&mut app, "a@b.com", now);
        app.focus = Field::PhoneNumber;
        type_str(&mut app, "08012345678", now);
        app.next(now);

        assert!(!app.is_submitted());
        assert_eq!(app.form.step(), Some(Step::Two));
        assert_eq!(app.submitted_count, 0);
        assert!(app.status_message.as_deref().unwrap().starts_with("Submission failed"));
        assert_eq!(app.form.data().email, "a@b.com");

        app.sink = Box::new(sink.clone());
        app.next(now);

        assert!(app.is_submitted());
        assert_eq!(app.submitted_count, 1);
        assert_eq!(sink.records.borrow().len(), 1);
    }

    #[test]
    fn test_back_restores_step1_focus() {
        let (mut app, _) = app_with_sink();
        let now = Instant::now();
        complete_step1(&mut app, now);

        app.back(now);

        assert_eq!(app.form.step(), Some(Step::One));
        assert_eq!(app.focus, Field::Bank);
    }

    #[test]
    fn test_country_dropdown() {
        let (mut app, _) = app_with_sink();
        let now = Instant::now();
        complete_step1(&mut app, now);
        app.focus = Field::CountryCode;

        assert!(app.open_dropdown());
        assert_eq!(app.dropdown_index, 0);
        app.dropdown_down();
        app.dropdown_down();
        app.confirm_dropdown(now);

        assert_eq!(app.form.data().country_code, "+44");
    }

    #[test]
    fn test_focus_wraps_within_step() {
        let (mut app, _) = app_with_sink();

        app.focus_next();
        assert_eq!(app.focus, Field::AccountNumber);
        app.focus_next();
        assert_eq!(app.focus, Field::Bank);
        app.focus_previous();
        assert_eq!(app.focus, Field::AccountNumber);
    }

    #[test]
    fn test_start_new_recipient() {
        let (mut app, _) = app_with_sink();
        let now = Instant::now();
        complete_step1(&mut app, now);

        app.start_new_recipient();

        assert_eq!(app.form.step(), Some(Step::One));
        assert!(app.form.data().bank.is_empty());
        assert_eq!(app.focus, Field::Bank);
    }

    #[test]
    fn test_dropdown_only_opens_on_selects() {
        let (mut app, _) = app_with_sink();
        app.focus = Field::AccountNumber;

        assert!(!app.open_dropdown());
        assert_eq!(app.mode, AppMode::Form);
    }
}
