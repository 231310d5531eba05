use super::{contact_number, email, required, FormSchema, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Medical centre (tenant) details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalCentreForm {
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub email: String,
}

impl FormSchema for MedicalCentreForm {
    const NAME: &'static str = "medicalCentre";

    fn check(&self, _today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "name", "Centre name", &self.name);
        required(errors, "address", "Address", &self.address);
        contact_number(errors, "contactNumber", &self.contact_number, true);
        email(errors, "email", &self.email, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_number_is_mandatory_and_bounded() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut form = MedicalCentreForm {
            name: "Kandy Family Clinic".into(),
            address: "12 Peradeniya Rd, Kandy".into(),
            ..Default::default()
        };
        let errors = form.validate_on(today).unwrap_err();
        assert_eq!(
            errors.field("contactNumber").unwrap(),
            ["Contact number is required".to_string()]
        );

        form.contact_number = "0812345".into();
        assert!(form.validate_on(today).unwrap_err().has("contactNumber"));

        form.contact_number = "0812345678".into();
        assert!(form.validate_on(today).is_ok());
    }
}
