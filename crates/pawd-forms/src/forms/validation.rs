use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::domain::{
    Application, AttendanceForm, AttendanceRecord, Field, Grade, SchoolEmail, SignupForm,
    SubmissionContext,
};

pub const DATE_REQUIRED: &str = "Date is required";
pub const DATE_FORMAT: &str = "Date must use the YYYY-MM-DD format";
pub const DATE_IN_FUTURE: &str = "Date cannot be in the future";
pub const NAME_REQUIRED: &str = "Name is required";
pub const GRADE_REQUIRED: &str = "Please select your grade";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const ANSWER_REQUIRED: &str = "Please answer this question";
pub const HONOR_CODE_REQUIRED: &str = "You must agree to the Honor Code to join PAWD";

/// Field name -> message. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub(crate) fn clear(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Student account pattern `s` + seven ASCII digits at the online subdomain of the school domain.
#[derive(Debug, Clone)]
pub struct SchoolEmailRule {
    domain: String,
    pattern: Regex,
}

impl SchoolEmailRule {
    pub fn new(domain: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"^s[0-9]{{7}}@online\.{}$", regex::escape(domain)))?;
        Ok(Self {
            domain: domain.to_string(),
            pattern,
        })
    }

    pub fn matches(&self, email: &str) -> bool {
        self.pattern.is_match(email)
    }

    pub fn format_message(&self) -> String {
        format!("Email must be in format s#######@online.{}", self.domain)
    }
}

/// Rules shared by both forms.
#[derive(Debug, Clone)]
pub struct FormRules {
    email: SchoolEmailRule,
}

impl FormRules {
    pub fn new(email: SchoolEmailRule) -> Self {
        Self { email }
    }

    pub fn for_domain(domain: &str) -> Result<Self, regex::Error> {
        SchoolEmailRule::new(domain).map(Self::new)
    }

    fn required_text(
        errors: &mut FieldErrors,
        field: Field,
        raw: &str,
        message: &str,
    ) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            errors.insert(field, message);
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Only the exact picker labels are accepted.
    fn grade(errors: &mut FieldErrors, raw: &str) -> Option<Grade> {
        match raw.parse::<Grade>() {
            Ok(grade) => Some(grade),
            Err(_) => {
                errors.insert(Field::Grade, GRADE_REQUIRED);
                None
            }
        }
    }

    /// The address is matched as typed; only the emptiness check trims.
    fn school_email(&self, errors: &mut FieldErrors, raw: &str) -> Option<SchoolEmail> {
        if raw.trim().is_empty() {
            errors.insert(Field::Email, EMAIL_REQUIRED);
            None
        } else if !self.email.matches(raw) {
            errors.insert(Field::Email, self.email.format_message());
            None
        } else {
            Some(SchoolEmail::new(raw.to_string()))
        }
    }

    fn meeting_date(errors: &mut FieldErrors, raw: &str, today: NaiveDate) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            errors.insert(Field::Date, DATE_REQUIRED);
            return None;
        }

        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) if date > today => {
                errors.insert(Field::Date, DATE_IN_FUTURE);
                None
            }
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert(Field::Date, DATE_FORMAT);
                None
            }
        }
    }
}

/// Pure check from raw field values to either a deliverable payload or field errors.
pub trait Validate {
    type Payload: Serialize + Send + Sync;

    fn validate(
        &self,
        rules: &FormRules,
        context: &SubmissionContext,
    ) -> Result<Self::Payload, FieldErrors>;

    fn errors(&self, rules: &FormRules, context: &SubmissionContext) -> FieldErrors {
        self.validate(rules, context).err().unwrap_or_default()
    }
}

impl Validate for AttendanceForm {
    type Payload = AttendanceRecord;

    fn validate(
        &self,
        rules: &FormRules,
        context: &SubmissionContext,
    ) -> Result<AttendanceRecord, FieldErrors> {
        let mut errors = FieldErrors::default();
        let date = FormRules::meeting_date(&mut errors, &self.date, context.today);
        let name = FormRules::required_text(&mut errors, Field::Name, &self.name, NAME_REQUIRED);
        let grade = FormRules::grade(&mut errors, &self.grade);
        let email = rules.school_email(&mut errors, &self.email);

        match (date, name, grade, email) {
            (Some(date), Some(name), Some(grade), Some(email)) => Ok(AttendanceRecord {
                timestamp: context.submitted_at,
                date,
                name,
                grade,
                email,
            }),
            _ => Err(errors),
        }
    }
}

impl Validate for SignupForm {
    type Payload = Application;

    fn validate(
        &self,
        rules: &FormRules,
        _context: &SubmissionContext,
    ) -> Result<Application, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = FormRules::required_text(&mut errors, Field::Name, &self.name, NAME_REQUIRED);
        let grade = FormRules::grade(&mut errors, &self.grade);
        let email = rules.school_email(&mut errors, &self.email);
        let q1 = FormRules::required_text(&mut errors, Field::Q1, &self.q1, ANSWER_REQUIRED);
        let q2 = FormRules::required_text(&mut errors, Field::Q2, &self.q2, ANSWER_REQUIRED);
        let q3 = FormRules::required_text(&mut errors, Field::Q3, &self.q3, ANSWER_REQUIRED);
        if !self.honor_code {
            errors.insert(Field::HonorCode, HONOR_CODE_REQUIRED);
        }

        match (name, grade, email, q1, q2, q3) {
            (Some(name), Some(grade), Some(email), Some(q1), Some(q2), Some(q3))
                if errors.is_empty() =>
            {
                Ok(Application {
                    name,
                    grade,
                    email,
                    q1,
                    q2,
                    q3,
                    honor_code: true,
                })
            }
            _ => Err(errors),
        }
    }
}
