use super::{date, required, time, FormSchema, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A bookable clinic session (a time window on one day at one centre).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionForm {
    pub name: String,
    pub center_id: String,
    pub doctor_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl FormSchema for SessionForm {
    const NAME: &'static str = "session";

    fn check(&self, _today: NaiveDate, errors: &mut ValidationErrors) {
        required(errors, "name", "Session name", &self.name);
        required(errors, "centerId", "Medical centre", &self.center_id);
        date(errors, "date", "Date", &self.date);

        let start = time(errors, "startTime", "Start time", &self.start_time);
        let end = time(errors, "endTime", "End time", &self.end_time);
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.add("endTime", "End time must be later than start time");
            }
        }
    }
}
