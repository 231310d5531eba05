//! Staff roles and what each role may do in the console.

use crate::{ClinicError, ClinicResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a staff account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Manages every centre.
    SuperAdmin,
    /// Manages the centres assigned to them.
    Admin,
    Doctor,
    Nurse,
    Receptionist,
    Pharmacist,
}

/// Console capabilities gated by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageCentres,
    ManageUsers,
    ManagePatients,
    ManageSessions,
    ManageAppointments,
    ManageCatalog,
    WritePrescriptions,
    ViewPrescriptions,
    DispensePrescriptions,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Doctor,
        Role::Nurse,
        Role::Receptionist,
        Role::Pharmacist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "superAdmin",
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Receptionist => "receptionist",
            Role::Pharmacist => "pharmacist",
        }
    }

    /// Whether accounts with this role work across every centre rather than
    /// an assigned subset.
    pub fn spans_all_centres(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn allows(self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::SuperAdmin => true,
            Role::Admin => !matches!(permission, WritePrescriptions | DispensePrescriptions),
            Role::Doctor => matches!(
                permission,
                ManagePatients | ManageAppointments | WritePrescriptions | ViewPrescriptions
            ),
            Role::Nurse => matches!(permission, ManagePatients | ViewPrescriptions),
            Role::Receptionist => {
                matches!(permission, ManagePatients | ManageAppointments | ManageSessions)
            }
            Role::Pharmacist => matches!(
                permission,
                ManageCatalog | ViewPrescriptions | DispensePrescriptions
            ),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ClinicError;

    fn from_str(s: &str) -> ClinicResult<Self> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClinicError::InvalidInput(format!("unknown role: '{wanted}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_doctors_and_super_admins_write_prescriptions() {
        let writers: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| r.allows(Permission::WritePrescriptions))
            .collect();
        assert_eq!(writers, vec![Role::SuperAdmin, Role::Doctor]);
    }

    #[test]
    fn roles_parse_from_wire_names() {
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(" Doctor ".parse::<Role>().unwrap(), Role::Doctor);
        assert!("janitor".parse::<Role>().is_err());
    }
}
