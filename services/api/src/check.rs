use chrono::{Local, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use pawd_forms::config::AppConfig;
use pawd_forms::error::AppError;
use pawd_forms::forms::{AttendanceForm, Form, FormRules, SignupForm, SubmissionContext, Validate};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormKind {
    Attendance,
    Signup,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Which form the file holds
    #[arg(value_enum)]
    pub(crate) kind: FormKind,
    /// JSON file with the form fields as the browser sends them
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Treat this date as today when checking meeting dates (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Override the configured school email domain
    #[arg(long)]
    pub(crate) domain: Option<String>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        kind,
        file,
        today,
        domain,
    } = args;

    let domain = match domain {
        Some(domain) => domain,
        None => AppConfig::load()?.forms.school_domain,
    };
    let rules = FormRules::for_domain(&domain)?;
    let context = SubmissionContext {
        submitted_at: Utc::now(),
        today: today.unwrap_or_else(|| Local::now().date_naive()),
    };

    let raw = std::fs::read_to_string(&file)?;
    let rendered = match kind {
        FormKind::Attendance => check_form::<AttendanceForm>(&raw, &rules, &context)?,
        FormKind::Signup => check_form::<SignupForm>(&raw, &rules, &context)?,
    };

    println!("Form is valid; webhook body:");
    println!("{rendered}");
    Ok(())
}

/// Validate a raw JSON form and render the single-row body that would be posted.
pub(crate) fn check_form<F>(
    raw: &str,
    rules: &FormRules,
    context: &SubmissionContext,
) -> Result<String, AppError>
where
    F: Form + DeserializeOwned,
{
    let form: F = serde_json::from_str(raw)?;
    match form.validate(rules, context) {
        Ok(payload) => Ok(serde_json::to_string_pretty(&[payload])?),
        Err(errors) => {
            for field in F::FIELDS {
                if let Some(message) = errors.get(*field) {
                    eprintln!("- {field}: {message}");
                }
            }
            Err(errors.into())
        }
    }
}
