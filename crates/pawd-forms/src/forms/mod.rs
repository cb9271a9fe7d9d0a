//! Club form intake: field state, validation, and delivery to spreadsheet webhooks.

pub mod client;
pub mod domain;
pub mod router;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
mod tests;

pub use client::{Endpoints, SubmissionClient, SubmissionError, WebhookClient};
pub use domain::{
    Application, AttendanceForm, AttendanceRecord, Destination, Field, FieldInput, Form, Grade,
    SchoolEmail, SignupForm, SubmissionContext, UnknownGrade,
};
pub use router::forms_router;
pub use service::{Clock, FixedClock, FormsService, FormsServiceError, SystemClock};
pub use state::{FormState, FormStateError, SubmitStatus};
pub use validation::{FieldErrors, FormRules, SchoolEmailRule, Validate};
