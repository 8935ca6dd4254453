//! The recipient form state machine.
//!
//! [`FormController`] owns the one [`FormData`] record of a session along with
//! the current step, the error map and the pending account lookup. Views never
//! touch that state directly: they read [`BankDetailsProps`] /
//! [`ContactDetailsProps`] snapshots and send [`FormEvent`]s back.

use std::time::Instant;

use log::{debug, info, warn};

use crate::domain::{
    find_country_code, is_known_bank, normalize_account_number, normalize_phone_number,
    validate_step1, validate_step2, AccountResolver, DomainError, DomainResult, ErrorMap, Field,
    FormData, LookupToken, LookupTracker, SimulatedResolver, Step, ACCOUNT_NUMBER_LEN,
};

/// Events emitted by the step views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    BankChanged(String),
    AccountNumberChanged(String),
    EmailChanged(String),
    CountryCodeChanged(String),
    PhoneNumberChanged(String),
    Next,
    Back,
}

/// What a handled event did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A field value changed; the step is unchanged.
    Updated,
    /// Validation failed; the error map now holds one message per bad field.
    Invalid,
    /// Step 1 passed validation and step 2 is now showing.
    Advanced,
    /// Returned from step 2 to step 1.
    WentBack,
    /// Step 2 passed validation. Carries the completed record for the submission sink.
    Submitted(FormData),
    /// The event has no meaning in the current phase.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing(Step),
    Submitted,
}

/// Snapshot handed to the bank details view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDetailsProps {
    pub bank: String,
    pub account_number: String,
    pub account_name: String,
    pub is_loading: bool,
    pub errors: ErrorMap,
}

/// Snapshot handed to the contact details view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetailsProps {
    pub email: String,
    pub country_code: String,
    pub phone_number: String,
    pub errors: ErrorMap,
}

pub struct FormController {
    data: FormData,
    errors: ErrorMap,
    phase: Phase,
    lookup: LookupTracker,
    resolver: Box<dyn AccountResolver>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(Box::new(SimulatedResolver::default()))
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("data", &self.data)
            .field("errors", &self.errors)
            .field("phase", &self.phase)
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

impl FormController {
    pub fn new(resolver: Box<dyn AccountResolver>) -> Self {
        Self {
            data: FormData::default(),
            errors: ErrorMap::new(),
            phase: Phase::Editing(Step::One),
            lookup: LookupTracker::new(),
            resolver,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The step being edited, or `None` once the form has been submitted.
    pub fn step(&self) -> Option<Step> {
        match self.phase {
            Phase::Editing(step) => Some(step),
            Phase::Submitted => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lookup.is_pending()
    }

    /// When the pending lookup becomes due, if one is in flight.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lookup.next_deadline()
    }

    pub fn bank_details_props(&self) -> BankDetailsProps {
        BankDetailsProps {
            bank: self.data.bank.clone(),
            account_number: self.data.account_number.clone(),
            account_name: self.data.account_name.clone(),
            is_loading: self.is_loading(),
            errors: self.errors.clone(),
        }
    }

    pub fn contact_details_props(&self) -> ContactDetailsProps {
        ContactDetailsProps {
            email: self.data.email.clone(),
            country_code: self.data.country_code.clone(),
            phone_number: self.data.phone_number.clone(),
            errors: self.errors.clone(),
        }
    }

    /// Applies one view event.
    ///
    /// Field events for fields outside the current step are ignored.
    /// Bank and country code changes outside their fixed sets are rejected
    /// and leave the form untouched.
    pub fn handle(&mut self, event: FormEvent, now: Instant) -> DomainResult<Transition> {
        let step = match self.phase {
            Phase::Editing(step) => step,
            Phase::Submitted => {
                debug!("ignoring {event:?} after submission");
                return Ok(Transition::Ignored);
            }
        };

        let transition = match (step, event) {
            (Step::One, FormEvent::BankChanged(bank)) => {
                if !is_known_bank(&bank) {
                    return Err(DomainError::UnknownBank(bank));
                }
                self.data.bank = bank;
                self.errors.clear_field(Field::Bank);
                Transition::Updated
            }
            (Step::One, FormEvent::AccountNumberChanged(raw)) => {
                self.change_account_number(&raw, now);
                Transition::Updated
            }
            (Step::Two, FormEvent::EmailChanged(email)) => {
                self.data.email = email;
                self.errors.clear_field(Field::Email);
                Transition::Updated
            }
            (Step::Two, FormEvent::CountryCodeChanged(code)) => {
                if find_country_code(&code).is_none() {
                    return Err(DomainError::UnknownCountryCode(code));
                }
                self.data.country_code = code;
                Transition::Updated
            }
            (Step::Two, FormEvent::PhoneNumberChanged(raw)) => {
                self.data.phone_number = normalize_phone_number(&raw);
                self.errors.clear_field(Field::PhoneNumber);
                Transition::Updated
            }
            (_, FormEvent::Next) => self.next(step),
            (Step::Two, FormEvent::Back) => {
                self.phase = Phase::Editing(Step::One);
                self.errors.clear();
                debug!("back to step 1");
                Transition::WentBack
            }
            (step, event) => {
                debug!("ignoring {event:?} in step {}", step.number());
                Transition::Ignored
            }
        };

        Ok(transition)
    }

    /// Completes the pending lookup if it is due at `now`.
    ///
    /// Returns `true` when the account name or loading flag changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(pending) = self.lookup.due(now) else {
            return false;
        };
        let result = self.resolver.resolve(&pending.account_number);
        self.complete_lookup(pending.token, &pending.account_number, result)
    }

    /// Applies the result of the lookup behind `token`.
    ///
    /// The result only lands if that request is still pending and
    /// `account_number` is still the number on the form. Each request lands
    /// at most once. Returns whether it was applied.
    pub fn complete_lookup(
        &mut self,
        token: LookupToken,
        account_number: &str,
        result: DomainResult<String>,
    ) -> bool {
        let matches_form = self
            .lookup
            .pending()
            .is_some_and(|p| p.token == token && p.account_number == account_number)
            && account_number == self.data.account_number;
        if !matches_form || !self.lookup.finish(token) {
            debug!("dropping stale lookup {token:?} for {account_number}");
            return false;
        }

        match result {
            Ok(name) => {
                debug!("lookup {token:?} resolved");
                self.data.account_name = name;
            }
            Err(err) => {
                warn!("{err}");
                self.data.account_name.clear();
            }
        }
        true
    }

    /// Returns a submitted form to step 2 so the user can retry.
    ///
    /// Used when the submission sink rejects the record.
    pub fn reopen(&mut self) {
        if self.phase == Phase::Submitted {
            self.phase = Phase::Editing(Step::Two);
            info!("form reopened at step 2 after a failed submission");
        }
    }

    /// Discards everything and starts a new recipient at step 1.
    pub fn reset(&mut self) {
        self.lookup.cancel();
        self.data = FormData::default();
        self.errors.clear();
        self.phase = Phase::Editing(Step::One);
        info!("form reset for a new recipient");
    }

    fn next(&mut self, step: Step) -> Transition {
        if self.is_loading() {
            debug!("next ignored while account lookup is in flight");
            return Transition::Ignored;
        }

        match step {
            Step::One => {
                let errors = validate_step1(&self.data);
                if errors.is_empty() {
                    self.errors.clear();
                    self.phase = Phase::Editing(Step::Two);
                    debug!("step 1 passed validation");
                    Transition::Advanced
                } else {
                    debug!("step 1 failed validation on {} field(s)", errors.len());
                    self.errors = errors;
                    Transition::Invalid
                }
            }
            Step::Two => {
                let errors = validate_step2(&self.data);
                if errors.is_empty() {
                    self.errors.clear();
                    self.phase = Phase::Submitted;
                    info!("recipient form completed for {}", self.data.bank);
                    Transition::Submitted(self.data.clone())
                } else {
                    debug!("step 2 failed validation on {} field(s)", errors.len());
                    self.errors = errors;
                    Transition::Invalid
                }
            }
        }
    }

    fn change_account_number(&mut self, raw: &str, now: Instant) {
        let account_number = normalize_account_number(raw);
        if account_number == self.data.account_number {
            return;
        }

        self.data.account_number = account_number;
        self.data.account_name.clear();

        if self.data.account_number.len() < ACCOUNT_NUMBER_LEN {
            self.lookup.cancel();
            return;
        }

        let due = now + self.resolver.latency();
        let token = self.lookup.start(&self.data.account_number, due);
        debug!("started account lookup {token:?} for {}", self.data.account_number);
    }
}
