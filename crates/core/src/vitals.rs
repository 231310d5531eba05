//! Vital signs captured on a prescription and the derived body-mass index.
//!
//! Vitals are kept exactly as typed ("180cm", "65 kg") because the prescription
//! document reproduces them verbatim. BMI is derived from weight and height and
//! is never stored independently of them.

use serde::{Deserialize, Serialize};

/// Vital signs as entered on the prescription form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VitalSigns {
    pub weight: String,
    pub height: String,
    pub temperature: String,
    pub pulse_rate: String,
}

impl VitalSigns {
    /// Body-mass index for the current weight and height, see [`bmi`].
    pub fn bmi(&self) -> String {
        bmi(&self.height, &self.weight)
    }

    pub fn is_empty(&self) -> bool {
        [&self.weight, &self.height, &self.temperature, &self.pulse_rate]
            .iter()
            .all(|v| v.trim().is_empty())
    }
}

// Serialised with the derived `bmi` so the server receives it alongside the
// inputs it was computed from. An incoming `bmi` is ignored on deserialise.
impl Serialize for VitalSigns {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct VitalsWire<'a> {
            weight: &'a str,
            height: &'a str,
            bmi: String,
            temperature: &'a str,
            pulse_rate: &'a str,
        }

        VitalsWire {
            weight: &self.weight,
            height: &self.height,
            bmi: self.bmi(),
            temperature: &self.temperature,
            pulse_rate: &self.pulse_rate,
        }
        .serialize(serializer)
    }
}

/// Keeps digits and decimal points only, then parses what is left.
fn parse_measurement(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = cleaned.parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Computes BMI from a height in centimetres and a weight in kilograms.
///
/// Units and other decoration are stripped first, so `"180cm"` and `"180"` are
/// equivalent. The result is rounded to one decimal place and formatted with
/// exactly one decimal (`"20.1"`).
///
/// Returns an empty string when either input is missing, non-numeric, or not
/// strictly positive.
pub fn bmi(height: &str, weight: &str) -> String {
    let (Some(height_cm), Some(weight_kg)) = (parse_measurement(height), parse_measurement(weight))
    else {
        return String::new();
    };

    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    if !value.is_finite() {
        return String::new();
    }

    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_matches_worked_example() {
        assert_eq!(bmi("180cm", "65kg"), "20.1");
        assert_eq!(bmi("180", "65"), "20.1");
        assert_eq!(bmi(" 165 cm ", "72.5 kg"), "26.6");
    }

    #[test]
    fn bmi_is_empty_for_unusable_inputs() {
        assert_eq!(bmi("", "65"), "");
        assert_eq!(bmi("180", ""), "");
        assert_eq!(bmi("tall", "65kg"), "");
        assert_eq!(bmi("0", "65"), "");
        assert_eq!(bmi("180", "0kg"), "");
        assert_eq!(bmi("1.8.0", "65"), "");
    }

    #[test]
    fn negative_sign_is_stripped_like_other_decoration() {
        // Only digits and '.' survive, so "-180" reads as 180.
        assert_eq!(bmi("-180", "65"), "20.1");
    }

    #[test]
    fn serialised_vitals_carry_derived_bmi() {
        let vitals = VitalSigns {
            weight: "65kg".into(),
            height: "180cm".into(),
            temperature: "98.4F".into(),
            pulse_rate: "72".into(),
        };
        let json = serde_json::to_value(&vitals).unwrap();
        assert_eq!(json["bmi"], "20.1");
        assert_eq!(json["pulseRate"], "72");

        let back: VitalSigns = serde_json::from_value(json).unwrap();
        assert_eq!(back, vitals);
    }
}
