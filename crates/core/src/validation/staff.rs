use super::{contact_number, email, required, FormSchema, ValidationErrors};
use crate::constants::MIN_PASSWORD_LEN;
use crate::roles::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Staff account form, used for both create and edit.
///
/// `id` is set when editing an existing account; the password is then
/// optional and only checked if a new one is typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserForm {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub contact_number: String,
    pub center_ids: Vec<String>,
}

impl FormSchema for UserForm {
    const NAME: &'static str = "user";

    fn check(&self, _today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "name", "Name", &self.name);
        email(errors, "email", &self.email, true);
        contact_number(errors, "contactNumber", &self.contact_number, false);

        let creating = self.id.as_deref().map_or(true, |id| id.trim().is_empty());
        if self.password.is_empty() {
            if creating {
                errors.add("password", "Password is required");
            }
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        let Some(role) = required(errors, "role", "Role", &self.role) else {
            return;
        };
        match role.as_str().parse::<Role>() {
            Ok(role) => {
                let has_centre = self.center_ids.iter().any(|c| !c.trim().is_empty());
                if !role.spans_all_centres() && !has_centre {
                    errors.add("centerIds", "Assign at least one medical centre");
                }
            }
            Err(_) => errors.add("role", "Unknown role"),
        }
    }
}
