use super::common::*;
use crate::forms::domain::{AttendanceForm, Field, Form, Grade, SignupForm};
use crate::forms::validation::{
    FormRules, SchoolEmailRule, Validate, ANSWER_REQUIRED, DATE_FORMAT, DATE_IN_FUTURE,
    DATE_REQUIRED, EMAIL_REQUIRED, GRADE_REQUIRED, HONOR_CODE_REQUIRED, NAME_REQUIRED,
};

#[test]
fn school_email_rule_accepts_only_the_student_pattern() {
    let rule = SchoolEmailRule::new(DOMAIN).expect("rule compiles");

    for email in [
        "s1234567@online.example.org",
        "s0000000@online.example.org",
        "s9999999@online.example.org",
    ] {
        assert!(rule.matches(email), "{email} should match");
    }

    for email in [
        "",
        "s123456@online.example.org",
        "s12345678@online.example.org",
        "S1234567@online.example.org",
        "t1234567@online.example.org",
        "s1234567@example.org",
        "s1234567@online.example.com",
        "s1234567@onlineXexample.org",
        "s1234567@online.exampleXorg",
        " s1234567@online.example.org",
        "s1234567@online.example.org ",
        "s12a4567@online.example.org",
        "xs1234567@online.example.org",
        "s\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}\u{0667}@online.example.org",
        "s\u{FF11}234567@online.example.org",
    ] {
        assert!(!rule.matches(email), "{email:?} should not match");
    }
}

#[test]
fn domain_is_escaped_before_compiling() {
    let rule = SchoolEmailRule::new("houstonisd.org").expect("rule compiles");
    assert!(rule.matches("s1234567@online.houstonisd.org"));
    assert!(!rule.matches("s1234567@online.houstonisdxorg"));
    assert_eq!(
        rule.format_message(),
        "Email must be in format s#######@online.houstonisd.org"
    );
}

#[test]
fn valid_attendance_produces_trimmed_record() {
    let mut form = valid_attendance();
    form.name = "  Jane Doe ".to_string();

    let record = form.validate(&rules(), &context()).expect("valid form");

    assert_eq!(record.name, "Jane Doe");
    assert_eq!(record.grade, Grade::Freshman);
    assert_eq!(record.date, today());
    assert_eq!(record.email.as_str(), "s1234567@online.example.org");
    assert_eq!(record.timestamp, context().submitted_at);
}

#[test]
fn empty_attendance_reports_every_field() {
    let errors = AttendanceForm::default().errors(&rules(), &context());

    assert_eq!(errors.len(), AttendanceForm::FIELDS.len());
    assert_eq!(errors.get(Field::Date), Some(DATE_REQUIRED));
    assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
    assert_eq!(errors.get(Field::Grade), Some(GRADE_REQUIRED));
    assert_eq!(errors.get(Field::Email), Some(EMAIL_REQUIRED));
}

#[test]
fn whitespace_only_fields_count_as_empty() {
    let mut form = valid_attendance();
    form.name = "   ".to_string();
    form.email = "\t".to_string();

    let errors = form.errors(&rules(), &context());
    assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
    assert_eq!(errors.get(Field::Email), Some(EMAIL_REQUIRED));
    assert_eq!(errors.len(), 2);
}

#[test]
fn each_missing_attendance_field_fails_alone() {
    for field in AttendanceForm::FIELDS {
        let mut form = valid_attendance();
        form.apply(*field, "".into()).expect("text field");

        let errors = form.errors(&rules(), &context());
        assert_eq!(errors.len(), 1, "only {field} should fail");
        assert!(errors.contains(*field));
    }
}

#[test]
fn future_dates_are_rejected_and_past_dates_pass() {
    let mut form = valid_attendance();

    form.date = "2024-01-11".to_string();
    assert_eq!(
        form.errors(&rules(), &context()).get(Field::Date),
        Some(DATE_IN_FUTURE)
    );

    form.date = "2024-01-10".to_string();
    assert!(form.validate(&rules(), &context()).is_ok());

    form.date = "2023-09-01".to_string();
    assert!(form.validate(&rules(), &context()).is_ok());
}

#[test]
fn malformed_dates_are_rejected() {
    let mut form = valid_attendance();
    for raw in ["01/10/2024", "2024-13-01", "yesterday"] {
        form.date = raw.to_string();
        assert_eq!(
            form.errors(&rules(), &context()).get(Field::Date),
            Some(DATE_FORMAT),
            "{raw} should be malformed"
        );
    }
}

#[test]
fn unknown_grade_label_is_rejected() {
    let mut form = valid_attendance();
    form.grade = "8th - Middle School".to_string();
    assert_eq!(
        form.errors(&rules(), &context()).get(Field::Grade),
        Some(GRADE_REQUIRED)
    );
}

#[test]
fn padded_grade_label_is_rejected() {
    let mut form = valid_signup();
    form.grade = " 9th - Freshman ".to_string();

    assert_eq!(
        form.errors(&rules(), &context()).get(Field::Grade),
        Some(GRADE_REQUIRED)
    );
}

#[test]
fn malformed_email_uses_configured_domain_in_message() {
    let mut form = valid_attendance();
    form.email = "jane@example.org".to_string();
    assert_eq!(
        form.errors(&rules(), &context()).get(Field::Email),
        Some("Email must be in format s#######@online.example.org")
    );
}

#[test]
fn other_domain_rules_reject_example_addresses() {
    let rules = FormRules::for_domain("houstonisd.org").expect("rule compiles");
    let errors = valid_attendance().errors(&rules, &context());
    assert!(errors.contains(Field::Email));
}

#[test]
fn valid_signup_produces_application() {
    let application = valid_signup()
        .validate(&rules(), &context())
        .expect("valid signup");

    assert_eq!(application.grade, Grade::Junior);
    assert!(application.honor_code);
    assert_eq!(application.q2, "Web apps and a little Rust.");
}

#[test]
fn signup_requires_answers_and_honor_code() {
    let mut form = valid_signup();
    form.q1 = " ".to_string();
    form.q3.clear();
    form.honor_code = false;

    let errors = form.errors(&rules(), &context());
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get(Field::Q1), Some(ANSWER_REQUIRED));
    assert_eq!(errors.get(Field::Q3), Some(ANSWER_REQUIRED));
    assert_eq!(errors.get(Field::HonorCode), Some(HONOR_CODE_REQUIRED));
}

#[test]
fn empty_signup_reports_every_field() {
    let errors = SignupForm::default().errors(&rules(), &context());
    assert_eq!(errors.len(), SignupForm::FIELDS.len());
}

#[test]
fn field_errors_serialize_with_form_keys() {
    let mut form = valid_signup();
    form.honor_code = false;
    form.q2.clear();

    let errors = form.errors(&rules(), &context());
    let value = serde_json::to_value(&errors).expect("serializes");
    assert_eq!(
        value,
        serde_json::json!({
            "q2": ANSWER_REQUIRED,
            "honorCode": HONOR_CODE_REQUIRED,
        })
    );
    assert_eq!(
        errors.to_string(),
        format!("q2: {ANSWER_REQUIRED}; honorCode: {HONOR_CODE_REQUIRED}")
    );
}
