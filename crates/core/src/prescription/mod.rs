//! Prescriptions and the client-side prescription editor.
//!
//! - [`editor`]: the ordered medication rows and their transitions
//! - [`preview`]: read-only projection of the form into a document
//! - [`drafts`]: in-memory editors keyed by draft id, for the REST surface
//!
//! The server owns prescriptions once submitted and assigns their
//! `prescriptionNo`; this module never invents one.

pub mod drafts;
pub mod editor;
pub mod preview;

use crate::vitals::VitalSigns;
use crate::{ClinicError, ClinicResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use drafts::DraftBook;
pub use editor::{DeleteOutcome, PrescriptionEditor};
pub use preview::{PreviewDocument, PreviewSection, PrescriptionPreview};

/// One editable field of a [`MedicationRow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MedicationField {
    Route,
    ProductName,
    GenericName,
    Dose,
    DoseUnit,
    Frequency,
    Duration,
    Note,
}

impl MedicationField {
    /// Fields that must be filled before another row may be added, in the
    /// order they are reported.
    pub const REQUIRED: [MedicationField; 6] = [
        MedicationField::Route,
        MedicationField::ProductName,
        MedicationField::GenericName,
        MedicationField::Dose,
        MedicationField::Frequency,
        MedicationField::Duration,
    ];

    pub const ALL: [MedicationField; 8] = [
        MedicationField::Route,
        MedicationField::ProductName,
        MedicationField::GenericName,
        MedicationField::Dose,
        MedicationField::DoseUnit,
        MedicationField::Frequency,
        MedicationField::Duration,
        MedicationField::Note,
    ];

    /// Name used on the wire and in user-facing messages.
    pub fn wire_name(self) -> &'static str {
        match self {
            MedicationField::Route => "route",
            MedicationField::ProductName => "productName",
            MedicationField::GenericName => "genericName",
            MedicationField::Dose => "dose",
            MedicationField::DoseUnit => "doseUnit",
            MedicationField::Frequency => "frequency",
            MedicationField::Duration => "duration",
            MedicationField::Note => "note",
        }
    }
}

impl fmt::Display for MedicationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for MedicationField {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MedicationField::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| ClinicError::UnknownField(s.to_string()))
    }
}

/// One medication line of a prescription, as typed by the prescriber.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicationRow {
    pub route: String,
    pub product_name: String,
    /// Derived from `product_name` via the centre's product list.
    pub generic_name: String,
    pub dose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_unit: Option<String>,
    pub frequency: String,
    pub duration: String,
    pub note: String,
}

impl MedicationRow {
    pub fn get(&self, field: MedicationField) -> &str {
        match field {
            MedicationField::Route => &self.route,
            MedicationField::ProductName => &self.product_name,
            MedicationField::GenericName => &self.generic_name,
            MedicationField::Dose => &self.dose,
            MedicationField::DoseUnit => self.dose_unit.as_deref().unwrap_or(""),
            MedicationField::Frequency => &self.frequency,
            MedicationField::Duration => &self.duration,
            MedicationField::Note => &self.note,
        }
    }

    /// Assigns one field. An empty dose unit is stored as `None`.
    pub fn set(&mut self, field: MedicationField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MedicationField::Route => self.route = value,
            MedicationField::ProductName => self.product_name = value,
            MedicationField::GenericName => self.generic_name = value,
            MedicationField::Dose => self.dose = value,
            MedicationField::DoseUnit => {
                self.dose_unit = (!value.trim().is_empty()).then_some(value)
            }
            MedicationField::Frequency => self.frequency = value,
            MedicationField::Duration => self.duration = value,
            MedicationField::Note => self.note = value,
        }
    }

    /// Required fields that are blank, in [`MedicationField::REQUIRED`] order.
    pub fn missing_required(&self) -> Vec<MedicationField> {
        MedicationField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        MedicationField::ALL
            .into_iter()
            .all(|field| self.get(field).trim().is_empty())
    }

    /// Dose with its unit, e.g. `500 mg`.
    pub fn dose_with_unit(&self) -> String {
        match self.dose_unit.as_deref() {
            Some(unit) => format!("{} {}", self.dose.trim(), unit.trim()),
            None => self.dose.trim().to_string(),
        }
    }
}

/// Where a prescription sits in the worklist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrescriptionStatus {
    #[default]
    Pending,
    Issued,
    Dispensed,
    Cancelled,
}

impl FromStr for PrescriptionStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PrescriptionStatus::Pending),
            "issued" => Ok(PrescriptionStatus::Issued),
            "dispensed" => Ok(PrescriptionStatus::Dispensed),
            "cancelled" | "canceled" => Ok(PrescriptionStatus::Cancelled),
            other => Err(ClinicError::InvalidInput(format!(
                "unknown prescription status: '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrescriptionStatus::Pending => "pending",
            PrescriptionStatus::Issued => "issued",
            PrescriptionStatus::Dispensed => "dispensed",
            PrescriptionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Narrative sections written by the prescriber.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClinicalNotes {
    pub symptoms: String,
    pub clinical_details: String,
    pub diagnosis: String,
    pub investigations: String,
    pub advice: String,
    pub follow_up_date: String,
}

/// Snapshot of the prescriber at the time of writing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prescriber {
    pub name: String,
    pub qualifications: String,
    pub registration_no: String,
    pub center_name: String,
}

/// Patient header shown on the prescription.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientSummary {
    pub name: String,
    pub age: String,
    pub gender: String,
}

/// Everything the prescription form holds while it is being written.
///
/// The preview is a pure function of this value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrescriptionForm {
    pub patient_id: String,
    pub center_id: String,
    pub appointment_id: Option<String>,
    pub patient: PatientSummary,
    pub vitals: VitalSigns,
    pub notes: ClinicalNotes,
    pub medications: Vec<MedicationRow>,
    pub prescriber: Option<Prescriber>,
}

impl PrescriptionForm {
    /// Builds the body sent to the server on submit.
    ///
    /// Empty staging rows are dropped. The server assigns `prescriptionNo` and
    /// timestamps, so both are left unset.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidInput` if the patient or centre reference
    /// is blank, or `ClinicError::MissingFields` for the first non-empty row
    /// that is incomplete.
    pub fn into_submission(self) -> ClinicResult<Prescription> {
        if self.patient_id.trim().is_empty() {
            return Err(ClinicError::InvalidInput("patient is required".into()));
        }
        if self.center_id.trim().is_empty() {
            return Err(ClinicError::InvalidInput("center is required".into()));
        }

        let medications: Vec<MedicationRow> = self
            .medications
            .into_iter()
            .filter(|row| !row.is_empty())
            .collect();
        if let Some(missing) = medications
            .iter()
            .map(MedicationRow::missing_required)
            .find(|missing| !missing.is_empty())
        {
            return Err(ClinicError::MissingFields(missing));
        }

        Ok(Prescription {
            prescription_no: None,
            patient_id: self.patient_id,
            center_id: self.center_id,
            appointment_id: self.appointment_id,
            vitals: self.vitals,
            medications,
            notes: self.notes,
            prescriber: self.prescriber,
            status: PrescriptionStatus::Pending,
            created_at: None,
        })
    }
}

/// A prescription as stored by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    /// Server-generated; absent until the prescription is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription_no: Option<String>,
    pub patient_id: String,
    pub center_id: String,
    #[serde(default)]
    pub appointment_id: Option<String>,
    #[serde(default)]
    pub vitals: VitalSigns,
    #[serde(default)]
    pub medications: Vec<MedicationRow>,
    #[serde(flatten)]
    pub notes: ClinicalNotes,
    #[serde(default)]
    pub prescriber: Option<Prescriber>,
    #[serde(default)]
    pub status: PrescriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
