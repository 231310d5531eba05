//! Prescription worklist filtering.
//!
//! The worklist shows prescriptions narrowed by an inclusive date range, a
//! status and a centre. The same filter renders to list query parameters for
//! the server and applies locally to an already-fetched page, newest first.

use crate::constants::DATE_FORMAT;
use crate::listing::ListQuery;
use crate::prescription::{Prescription, PrescriptionStatus};
use crate::{ClinicError, ClinicResult};
use chrono::NaiveDate;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorklistFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<PrescriptionStatus>,
    pub center_id: Option<String>,
}

impl WorklistFilter {
    /// Builds a filter from the raw values of the worklist inputs. Blank
    /// inputs leave that criterion open.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidInput` if a date is not `YYYY-MM-DD`, the
    /// status is unknown, or `from` is after `to`.
    pub fn from_inputs(from: &str, to: &str, status: &str, center_id: &str) -> ClinicResult<Self> {
        let filter = Self {
            from: parse_date("from", from)?,
            to: parse_date("to", to)?,
            status: non_blank(status)
                .map(str::parse::<PrescriptionStatus>)
                .transpose()?,
            center_id: non_blank(center_id).map(str::to_string),
        };
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(ClinicError::InvalidInput(format!(
                    "date range is reversed: {from} is after {to}"
                )));
            }
        }
        Ok(filter)
    }

    pub fn matches(&self, prescription: &Prescription) -> bool {
        if let Some(status) = self.status {
            if prescription.status != status {
                return false;
            }
        }
        if let Some(center_id) = &self.center_id {
            if &prescription.center_id != center_id {
                return false;
            }
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        // Undated prescriptions only pass an open date range.
        let Some(created) = prescription.created_at.map(|at| at.date_naive()) else {
            return false;
        };
        self.from.map_or(true, |from| created >= from) && self.to.map_or(true, |to| created <= to)
    }

    /// Keeps the matching prescriptions, newest first.
    pub fn apply(&self, prescriptions: Vec<Prescription>) -> Vec<Prescription> {
        let mut kept: Vec<Prescription> = prescriptions
            .into_iter()
            .filter(|p| self.matches(p))
            .collect();
        kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        kept
    }

    /// Adds this filter to a list query as `startDate`, `endDate`, `status`
    /// and `centerId`.
    pub fn to_query(&self, mut query: ListQuery) -> ListQuery {
        if let Some(from) = self.from {
            query = query.with_filter("startDate", from.format(DATE_FORMAT).to_string());
        }
        if let Some(to) = self.to {
            query = query.with_filter("endDate", to.format(DATE_FORMAT).to_string());
        }
        if let Some(status) = self.status {
            query = query.with_filter("status", status.to_string());
        }
        if let Some(center_id) = &self.center_id {
            query = query.with_center(center_id.clone());
        }
        query
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_date(name: &str, value: &str) -> ClinicResult<Option<NaiveDate>> {
    non_blank(value)
        .map(|v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT).map_err(|_| {
                ClinicError::InvalidInput(format!("{name} must be a YYYY-MM-DD date, got: '{v}'"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use chrono::{TimeZone, Utc};

    fn prescription(no: &str, center: &str, status: PrescriptionStatus, day: u32) -> Prescription {
        Prescription {
            prescription_no: Some(no.into()),
            patient_id: "p-1".into(),
            center_id: center.into(),
            appointment_id: None,
            vitals: Default::default(),
            medications: Vec::new(),
            notes: Default::default(),
            prescriber: None,
            status,
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()),
        }
    }

    fn numbers(list: &[Prescription]) -> Vec<&str> {
        list.iter()
            .map(|p| p.prescription_no.as_deref().unwrap_or_default())
            .collect()
    }

    #[test]
    fn filters_by_range_status_and_centre_newest_first() {
        let all = vec![
            prescription("RX-1", "c-1", PrescriptionStatus::Pending, 1),
            prescription("RX-2", "c-1", PrescriptionStatus::Pending, 5),
            prescription("RX-3", "c-2", PrescriptionStatus::Pending, 6),
            prescription("RX-4", "c-1", PrescriptionStatus::Issued, 7),
            prescription("RX-5", "c-1", PrescriptionStatus::Pending, 10),
        ];
        let filter = WorklistFilter::from_inputs("2026-03-02", "2026-03-10", "pending", "c-1").unwrap();
        assert_eq!(numbers(&filter.apply(all)), vec!["RX-5", "RX-2"]);
    }

    #[test]
    fn open_filter_keeps_undated_prescriptions() {
        let mut undated = prescription("RX-9", "c-1", PrescriptionStatus::Pending, 1);
        undated.created_at = None;
        assert!(WorklistFilter::default().matches(&undated));

        let dated = WorklistFilter::from_inputs("2026-03-01", "", "", "").unwrap();
        assert!(!dated.matches(&undated));
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(WorklistFilter::from_inputs("01/03/2026", "", "", "").is_err());
        assert!(WorklistFilter::from_inputs("", "", "archived", "").is_err());
        assert!(WorklistFilter::from_inputs("2026-03-10", "2026-03-01", "", "").is_err());
    }

    #[test]
    fn renders_query_pairs() {
        let filter = WorklistFilter::from_inputs("2026-03-01", "", "issued", "c-7").unwrap();
        let query = filter.to_query(ListQuery::new(&CoreConfig::default()));
        let pairs = query.to_pairs();
        assert!(pairs.contains(&("startDate".to_string(), "2026-03-01".to_string())));
        assert!(pairs.contains(&("status".to_string(), "issued".to_string())));
        assert!(pairs.contains(&("centerId".to_string(), "c-7".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "endDate"));
    }
}
