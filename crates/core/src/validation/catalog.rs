use super::{required, FormSchema, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generic medicine name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenericForm {
    pub name: String,
}

impl FormSchema for GenericForm {
    const NAME: &'static str = "generic";

    fn check(&self, _today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "name", "Generic name", &self.name);
    }
}

/// Branded product stocked by a centre.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductForm {
    pub name: String,
    pub generic_id: String,
    pub center_id: String,
}

impl FormSchema for ProductForm {
    const NAME: &'static str = "product";

    fn check(&self, _today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "name", "Product name", &self.name);
        required(errors, "genericId", "Generic", &self.generic_id);
        required(errors, "centerId", "Medical centre", &self.center_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_requires_generic_and_centre() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let errors = ProductForm {
            name: "Amoxil".into(),
            ..Default::default()
        }
        .validate_on(today)
        .unwrap_err();
        assert!(errors.has("genericId"));
        assert!(errors.has("centerId"));
        assert!(!errors.has("name"));

        assert!(GenericForm { name: " ".into() }.validate_on(today).is_err());
        assert!(GenericForm { name: "Amoxicillin".into() }.validate_on(today).is_ok());
    }
}
