use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::state::FormStateError;
use super::validation::Validate;

/// School year of a student, serialized with the labels shown in the grade picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "9th - Freshman")]
    Freshman,
    #[serde(rename = "10th - Sophomore")]
    Sophomore,
    #[serde(rename = "11th - Junior")]
    Junior,
    #[serde(rename = "12th - Senior")]
    Senior,
}

impl Grade {
    pub const ALL: [Grade; 4] = [
        Grade::Freshman,
        Grade::Sophomore,
        Grade::Junior,
        Grade::Senior,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Grade::Freshman => "9th - Freshman",
            Grade::Sophomore => "10th - Sophomore",
            Grade::Junior => "11th - Junior",
            Grade::Senior => "12th - Senior",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade '{0}'")]
pub struct UnknownGrade(pub String);

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|grade| grade.label() == value)
            .ok_or_else(|| UnknownGrade(value.to_string()))
    }
}

/// Every input that appears on either club form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Date,
    Name,
    Grade,
    Email,
    Q1,
    Q2,
    Q3,
    HonorCode,
}

impl Field {
    pub const fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Name => "name",
            Field::Grade => "grade",
            Field::Email => "email",
            Field::Q1 => "q1",
            Field::Q2 => "q2",
            Field::Q3 => "q3",
            Field::HonorCode => "honorCode",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw value coming out of a text box, select, or checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Checked(bool),
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        FieldInput::Text(value)
    }
}

impl From<bool> for FieldInput {
    fn from(value: bool) -> Self {
        FieldInput::Checked(value)
    }
}

/// Webhook a validated form is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Attendance,
    Signup,
}

impl Destination {
    pub const fn label(self) -> &'static str {
        match self {
            Destination::Attendance => "attendance",
            Destination::Signup => "signup",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clock readings captured once per submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionContext {
    pub submitted_at: DateTime<Utc>,
    pub today: NaiveDate,
}

/// Editable values for one form instance plus the typed payload its validator produces.
pub trait Form: Validate + Default + Clone + Send + Sync + 'static {
    const DESTINATION: Destination;
    const FIELDS: &'static [Field];

    fn apply(&mut self, field: Field, input: FieldInput) -> Result<(), FormStateError>;
}

fn text_input(field: Field, input: FieldInput) -> Result<String, FormStateError> {
    match input {
        FieldInput::Text(value) => Ok(value),
        FieldInput::Checked(_) => Err(FormStateError::InputKind {
            field,
            expected: "text",
        }),
    }
}

/// Attendance check-in exactly as typed into the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceForm {
    pub date: String,
    pub name: String,
    pub grade: String,
    pub email: String,
}

impl Form for AttendanceForm {
    const DESTINATION: Destination = Destination::Attendance;
    const FIELDS: &'static [Field] = &[Field::Date, Field::Name, Field::Grade, Field::Email];

    fn apply(&mut self, field: Field, input: FieldInput) -> Result<(), FormStateError> {
        let slot = match field {
            Field::Date => &mut self.date,
            Field::Name => &mut self.name,
            Field::Grade => &mut self.grade,
            Field::Email => &mut self.email,
            other => {
                return Err(FormStateError::UnknownField {
                    field: other,
                    destination: Self::DESTINATION,
                })
            }
        };
        *slot = text_input(field, input)?;
        Ok(())
    }
}

/// Membership application exactly as typed into the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub grade: String,
    pub email: String,
    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub honor_code: bool,
}

impl Form for SignupForm {
    const DESTINATION: Destination = Destination::Signup;
    const FIELDS: &'static [Field] = &[
        Field::Name,
        Field::Grade,
        Field::Email,
        Field::Q1,
        Field::Q2,
        Field::Q3,
        Field::HonorCode,
    ];

    fn apply(&mut self, field: Field, input: FieldInput) -> Result<(), FormStateError> {
        if field == Field::HonorCode {
            return match input {
                FieldInput::Checked(checked) => {
                    self.honor_code = checked;
                    Ok(())
                }
                FieldInput::Text(_) => Err(FormStateError::InputKind {
                    field,
                    expected: "checkbox",
                }),
            };
        }

        let slot = match field {
            Field::Name => &mut self.name,
            Field::Grade => &mut self.grade,
            Field::Email => &mut self.email,
            Field::Q1 => &mut self.q1,
            Field::Q2 => &mut self.q2,
            Field::Q3 => &mut self.q3,
            other => {
                return Err(FormStateError::UnknownField {
                    field: other,
                    destination: Self::DESTINATION,
                })
            }
        };
        *slot = text_input(field, input)?;
        Ok(())
    }
}

/// Address that matched the school account pattern. Only the validator builds these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SchoolEmail(String);

impl SchoolEmail {
    pub(crate) fn new(address: String) -> Self {
        Self(address)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Row appended to the attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub name: String,
    pub grade: Grade,
    pub email: SchoolEmail,
}

/// Row forwarded to the signup sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    pub grade: Grade,
    pub email: SchoolEmail,
    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub honor_code: bool,
}

/// Millisecond UTC timestamps with a `Z` suffix, the shape spreadsheet rows already hold.
fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
