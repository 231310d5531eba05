//! Declarative form validation.
//!
//! Every console form has a schema: a serde struct holding the raw form values
//! plus a [`FormSchema::check`] that records field-level errors. Errors are
//! keyed by the form's wire field names (`firstName`, `endTime`, ...) so the
//! console can show each message under its input.
//!
//! Checks that depend on "today" (age, appointment date) take the evaluation
//! date as an argument; [`FormSchema::validate`] supplies the local date.

mod appointment;
mod catalog;
mod centre;
mod patient;
mod session;
mod staff;

pub use appointment::AppointmentForm;
pub use catalog::{GenericForm, ProductForm};
pub use centre::MedicalCentreForm;
pub use patient::PatientForm;
pub use session::SessionForm;
pub use staff::UserForm;

use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::{ClinicError, ClinicResult};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use docflex_types::{ContactNumber, EmailAddress, NonEmptyText};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Field-level validation failures, keyed by wire field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A form with a declarative validation schema.
pub trait FormSchema: DeserializeOwned {
    /// Schema name as used on the wire and in the CLI.
    const NAME: &'static str;

    /// Records every failing rule into `errors`.
    fn check(&self, today: NaiveDate, errors: &mut ValidationErrors);

    /// Validates against an explicit evaluation date.
    fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check(today, &mut errors);
        errors.into_result()
    }

    /// Validates against the local calendar date.
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(Local::now().date_naive())
    }
}

/// The schemas available for JSON-driven validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Patient,
    User,
    Appointment,
    Session,
    MedicalCentre,
    Generic,
    Product,
}

impl FormKind {
    pub const ALL: [FormKind; 7] = [
        FormKind::Patient,
        FormKind::User,
        FormKind::Appointment,
        FormKind::Session,
        FormKind::MedicalCentre,
        FormKind::Generic,
        FormKind::Product,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormKind::Patient => PatientForm::NAME,
            FormKind::User => UserForm::NAME,
            FormKind::Appointment => AppointmentForm::NAME,
            FormKind::Session => SessionForm::NAME,
            FormKind::MedicalCentre => MedicalCentreForm::NAME,
            FormKind::Generic => GenericForm::NAME,
            FormKind::Product => ProductForm::NAME,
        }
    }

    /// Parses `json` as this kind of form and validates it.
    ///
    /// # Errors
    ///
    /// - `ClinicError::FormParse` with the failing path if the JSON does not
    ///   match the form's shape.
    /// - `ClinicError::Validation` with every failing field.
    pub fn validate_json(self, json: &str, today: NaiveDate) -> ClinicResult<()> {
        match self {
            FormKind::Patient => validate_json_as::<PatientForm>(json, today),
            FormKind::User => validate_json_as::<UserForm>(json, today),
            FormKind::Appointment => validate_json_as::<AppointmentForm>(json, today),
            FormKind::Session => validate_json_as::<SessionForm>(json, today),
            FormKind::MedicalCentre => validate_json_as::<MedicalCentreForm>(json, today),
            FormKind::Generic => validate_json_as::<GenericForm>(json, today),
            FormKind::Product => validate_json_as::<ProductForm>(json, today),
        }
    }
}

impl FromStr for FormKind {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClinicError::UnknownSchema(wanted.to_string()))
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deserialises a form, reporting the path of the offending field on failure.
pub fn parse_form<T: FormSchema>(json: &str) -> ClinicResult<T> {
    let de = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(de).map_err(|e| ClinicError::FormParse {
        schema: T::NAME,
        path: e.path().to_string(),
        source: e.into_inner(),
    })
}

fn validate_json_as<T: FormSchema>(json: &str, today: NaiveDate) -> ClinicResult<()> {
    let form: T = parse_form(json)?;
    form.validate_on(today).map_err(ClinicError::Validation)
}

/// Whole years between `dob` and `today`; zero for future dates.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    if dob > today {
        return 0;
    }
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

// ----------------------------------------------------------------------------
// Rule helpers shared by the schemas
// ----------------------------------------------------------------------------

/// Records "`label` is required" for blank values; returns the trimmed value
/// otherwise.
pub(crate) fn required(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<NonEmptyText> {
    match NonEmptyText::new(value) {
        Ok(text) => Some(text),
        Err(_) => {
            errors.add(field, format!("{label} is required"));
            None
        }
    }
}

pub(crate) fn email(errors: &mut ValidationErrors, field: &str, value: &str, mandatory: bool) {
    if value.trim().is_empty() {
        if mandatory {
            errors.add(field, "Email is required");
        }
        return;
    }
    if EmailAddress::parse(value).is_err() {
        errors.add(field, "Invalid email address");
    }
}

pub(crate) fn contact_number(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    mandatory: bool,
) {
    if value.trim().is_empty() {
        if mandatory {
            errors.add(field, "Contact number is required");
        }
        return;
    }
    if let Err(e) = ContactNumber::parse(value) {
        errors.add(field, e.to_string());
    }
}

pub(crate) fn date(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<NaiveDate> {
    let text = required(errors, field, label, value)?;
    match NaiveDate::parse_from_str(text.as_str(), DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.add(field, format!("{label} must be a date (YYYY-MM-DD)"));
            None
        }
    }
}

pub(crate) fn time(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<NaiveTime> {
    let text = required(errors, field, label, value)?;
    match NaiveTime::parse_from_str(text.as_str(), TIME_FORMAT) {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add(field, format!("{label} must be a time (HH:MM)"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        assert_eq!(age_on(ymd(2008, 3, 15), ymd(2026, 3, 14)), 17);
        assert_eq!(age_on(ymd(2008, 3, 15), ymd(2026, 3, 15)), 18);
        assert_eq!(age_on(ymd(2030, 1, 1), ymd(2026, 3, 15)), 0);
        assert_eq!(age_on(ymd(2004, 2, 29), ymd(2026, 2, 28)), 21);
    }

    #[test]
    fn form_kind_parses_names_case_insensitively() {
        assert_eq!("medicalCentre".parse::<FormKind>().unwrap(), FormKind::MedicalCentre);
        assert_eq!("SESSION".parse::<FormKind>().unwrap(), FormKind::Session);
        assert!(matches!(
            "invoice".parse::<FormKind>(),
            Err(ClinicError::UnknownSchema(name)) if name == "invoice"
        ));
    }

    #[test]
    fn json_parse_errors_carry_the_path() {
        let err = FormKind::User
            .validate_json(r#"{"name": "A", "centerIds": [1]}"#, ymd(2026, 1, 1))
            .unwrap_err();
        match err {
            ClinicError::FormParse { schema, path, .. } => {
                assert_eq!(schema, "user");
                assert_eq!(path, "centerIds[0]");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn required_trims_and_treats_spaces_as_missing() {
        let mut errors = ValidationErrors::new();
        let name = required(&mut errors, "name", "Name", "  Nimal ").unwrap();
        assert_eq!(name.as_str(), "Nimal");
        assert!(required(&mut errors, "address", "Address", " \t ").is_none());
        assert_eq!(errors.to_string(), "address: Address is required");
    }

    #[test]
    fn errors_display_in_field_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        errors.add("email", "Invalid email address");
        assert_eq!(
            errors.to_string(),
            "email: Invalid email address; name: Name is required"
        );
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
