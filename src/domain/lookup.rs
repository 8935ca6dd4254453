//! Account-name resolution.
//!
//! The real service would be a network call; [`SimulatedResolver`] stands in
//! for it with a fixed name and a fixed latency. [`LookupTracker`] holds at
//! most one pending request and hands out monotonically increasing tokens so
//! that only the latest request may apply its result, and only once.

use std::time::{Duration, Instant};

use super::errors::{DomainError, DomainResult};

pub const DEFAULT_LOOKUP_LATENCY: Duration = Duration::from_millis(800);
pub const DEFAULT_ACCOUNT_NAME: &str = "ODUTUGA GBEKE";

pub trait AccountResolver {
    /// Delay between issuing a request and its result becoming available.
    fn latency(&self) -> Duration;

    fn resolve(&self, account_number: &str) -> DomainResult<String>;
}

#[derive(Debug, Clone)]
pub struct SimulatedResolver {
    name: String,
    latency: Duration,
    failure: Option<String>,
}

impl Default for SimulatedResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_NAME, DEFAULT_LOOKUP_LATENCY)
    }
}

impl SimulatedResolver {
    pub fn new(name: impl Into<String>, latency: Duration) -> Self {
        Self {
            name: name.into(),
            latency,
            failure: None,
        }
    }

    /// A resolver whose every lookup fails with `reason`.
    pub fn fail_with(reason: impl Into<String>, latency: Duration) -> Self {
        Self {
            name: String::new(),
            latency,
            failure: Some(reason.into()),
        }
    }
}

impl AccountResolver for SimulatedResolver {
    fn latency(&self) -> Duration {
        self.latency
    }

    fn resolve(&self, account_number: &str) -> DomainResult<String> {
        match &self.failure {
            Some(reason) => Err(DomainError::LookupFailed(format!("{account_number}: {reason}"))),
            None => Ok(self.name.clone()),
        }
    }
}

/// Identifies one lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub token: LookupToken,
    pub account_number: String,
    pub due: Instant,
}

#[derive(Debug, Default)]
pub struct LookupTracker {
    last_token: u64,
    pending: Option<PendingLookup>,
}

impl LookupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new request, superseding whatever was pending.
    pub fn start(&mut self, account_number: &str, due: Instant) -> LookupToken {
        self.last_token += 1;
        let token = LookupToken(self.last_token);
        self.pending = Some(PendingLookup {
            token,
            account_number: account_number.to_string(),
            due,
        });
        token
    }

    /// Drops the pending request. Its token stops being current.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingLookup> {
        self.pending.as_ref()
    }

    /// A token is current only while its request is still pending.
    /// Completing, cancelling or superseding the request retires it.
    pub fn is_current(&self, token: LookupToken) -> bool {
        self.pending.as_ref().is_some_and(|p| p.token == token)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// The pending request, if it is due at `now`. It stays pending until [`finish`](Self::finish).
    pub fn due(&self, now: Instant) -> Option<PendingLookup> {
        self.pending.as_ref().filter(|p| p.due <= now).cloned()
    }

    /// Retires the request behind `token`. Returns `false` if it was not the pending one.
    pub fn finish(&mut self, token: LookupToken) -> bool {
        if self.is_current(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
