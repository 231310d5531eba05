use super::{date, required, FormSchema, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Booking of a patient into a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentForm {
    pub patient_id: String,
    pub session_id: String,
    pub center_id: String,
    pub date: String,
    pub notes: String,
}

impl FormSchema for AppointmentForm {
    const NAME: &'static str = "appointment";

    fn check(&self, today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "patientId", "Patient", &self.patient_id);
        required(errors, "sessionId", "Session", &self.session_id);
        required(errors, "centerId", "Medical centre", &self.center_id);

        if let Some(day) = date(errors, "date", "Appointment date", &self.date) {
            if day < today {
                errors.add("date", "Appointments cannot be booked in the past");
            }
        }
    }
}
