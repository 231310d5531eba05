use super::{age_on, contact_number, date, email, required, FormSchema, ValidationErrors};
use crate::constants::NIC_REQUIRED_FROM_AGE;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient registration and edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    /// National identity card number.
    pub nic: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub center_id: String,
}

impl FormSchema for PatientForm {
    const NAME: &'static str = "patient";

    fn check(&self, today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "firstName", "First name", &self.first_name);
        required(errors, "lastName", "Last name", &self.last_name);
        required(errors, "gender", "Gender", &self.gender);
        contact_number(errors, "contactNumber", &self.contact_number, false);
        email(errors, "email", &self.email, false);

        let Some(dob) = date(errors, "dateOfBirth", "Date of birth", &self.date_of_birth) else {
            return;
        };
        if dob > today {
            errors.add("dateOfBirth", "Date of birth cannot be in the future");
            return;
        }

        // Minors may be registered without an identity card.
        if age_on(dob, today) >= NIC_REQUIRED_FROM_AGE && self.nic.trim().is_empty() {
            errors.add(
                "nic",
                format!("NIC is required for patients aged {NIC_REQUIRED_FROM_AGE} or over"),
            );
        }
    }
}
