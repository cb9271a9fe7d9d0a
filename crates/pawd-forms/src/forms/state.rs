use serde::Serialize;

use super::client::SubmissionError;
use super::domain::{Destination, Field, FieldInput, Form, SubmissionContext};
use super::validation::{FieldErrors, FormRules, Validate};

/// Banner state shown above a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmitStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, SubmitStatus::Success | SubmitStatus::Error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormStateError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error("form has invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error("field `{field}` is not part of the {destination} form")]
    UnknownField {
        field: Field,
        destination: Destination,
    },
    #[error("field `{field}` expects {expected} input")]
    InputKind {
        field: Field,
        expected: &'static str,
    },
}

/// Values, per-field errors, and submission status for one form instance.
#[derive(Debug, Clone)]
pub struct FormState<F> {
    values: F,
    errors: FieldErrors,
    status: SubmitStatus,
}

impl<F: Form> Default for FormState<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Form> FormState<F> {
    pub fn new() -> Self {
        Self::from_values(F::default())
    }

    pub fn from_values(values: F) -> Self {
        Self {
            values,
            errors: FieldErrors::default(),
            status: SubmitStatus::Idle,
        }
    }

    pub fn values(&self) -> &F {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// Store a new value. Only that field's error is cleared, and a finished banner
    /// falls back to idle.
    pub fn edit(
        &mut self,
        field: Field,
        input: impl Into<FieldInput>,
    ) -> Result<(), FormStateError> {
        self.values.apply(field, input.into())?;
        self.errors.clear(field);
        if self.status.is_terminal() {
            self.status = SubmitStatus::Idle;
        }
        Ok(())
    }

    /// Validate the current values. On success the state moves to `submitting` and the
    /// payload to deliver is returned.
    pub fn begin_submit(
        &mut self,
        rules: &FormRules,
        context: &SubmissionContext,
    ) -> Result<F::Payload, FormStateError> {
        if self.is_submitting() {
            return Err(FormStateError::SubmissionInFlight);
        }

        match self.values.validate(rules, context) {
            Ok(payload) => {
                self.errors = FieldErrors::default();
                self.status = SubmitStatus::Submitting;
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.status = SubmitStatus::Idle;
                Err(FormStateError::Invalid(errors))
            }
        }
    }

    /// Record the delivery outcome. A successful delivery clears the form.
    pub fn finish(
        &mut self,
        outcome: &Result<(), SubmissionError>,
    ) -> Result<SubmitStatus, FormStateError> {
        if !self.is_submitting() {
            return Err(FormStateError::NotSubmitting);
        }

        self.status = match outcome {
            Ok(()) => {
                self.values = F::default();
                SubmitStatus::Success
            }
            Err(_) => SubmitStatus::Error,
        };
        Ok(self.status)
    }
}
