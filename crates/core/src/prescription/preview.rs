//! Live preview of a prescription.
//!
//! The preview is recomputed from the whole form on every change. It holds no
//! state of its own, so rendering the same form twice gives the same document.

use super::{MedicationRow, PrescriptionForm};
use serde::Serialize;
use std::fmt;

/// A titled block of the preview document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PreviewSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Read-only document projected from a [`PrescriptionForm`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PreviewDocument {
    pub sections: Vec<PreviewSection>,
}

impl PreviewDocument {
    pub fn section(&self, heading: &str) -> Option<&PreviewSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

impl fmt::Display for PreviewDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.heading)?;
            for line in &section.lines {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

/// Renders forms into preview documents.
pub struct PrescriptionPreview;

impl PrescriptionPreview {
    pub const PATIENT: &'static str = "Patient";
    pub const VITALS: &'static str = "Vitals";
    pub const MEDICATIONS: &'static str = "Rx";
    pub const PRESCRIBER: &'static str = "Prescriber";

    /// Projects `form` into a document.
    ///
    /// Blank values are left out line by line; a narrative section with no
    /// text is left out entirely. Blank medication rows are skipped and the
    /// remaining ones are numbered from 1.
    pub fn render(form: &PrescriptionForm) -> PreviewDocument {
        let mut sections = Vec::new();

        let patient = &form.patient;
        sections.push(PreviewSection {
            heading: Self::PATIENT.into(),
            lines: labelled(&[
                ("Name", &patient.name),
                ("Age", &patient.age),
                ("Gender", &patient.gender),
            ]),
        });

        let vitals = &form.vitals;
        let bmi = vitals.bmi();
        let vital_lines = labelled(&[
            ("Weight", &vitals.weight),
            ("Height", &vitals.height),
            ("BMI", &bmi),
            ("Temperature", &vitals.temperature),
            ("Pulse rate", &vitals.pulse_rate),
        ]);
        if !vital_lines.is_empty() {
            sections.push(PreviewSection {
                heading: Self::VITALS.into(),
                lines: vital_lines,
            });
        }

        let notes = &form.notes;
        for (heading, text) in [
            ("Symptoms", &notes.symptoms),
            ("Clinical details", &notes.clinical_details),
            ("Diagnosis", &notes.diagnosis),
            ("Investigations", &notes.investigations),
        ] {
            push_narrative(&mut sections, heading, text);
        }

        let medication_lines: Vec<String> = form
            .medications
            .iter()
            .filter(|row| !row.is_empty())
            .enumerate()
            .map(|(i, row)| format!("{}. {}", i + 1, medication_line(row)))
            .collect();
        sections.push(PreviewSection {
            heading: Self::MEDICATIONS.into(),
            lines: medication_lines,
        });

        push_narrative(&mut sections, "Advice", &notes.advice);
        if !notes.follow_up_date.trim().is_empty() {
            sections.push(PreviewSection {
                heading: "Follow-up".into(),
                lines: vec![notes.follow_up_date.trim().to_string()],
            });
        }

        if let Some(prescriber) = &form.prescriber {
            let lines = labelled(&[
                ("Name", &prescriber.name),
                ("Qualifications", &prescriber.qualifications),
                ("Reg. no", &prescriber.registration_no),
                ("Centre", &prescriber.center_name),
            ]);
            if !lines.is_empty() {
                sections.push(PreviewSection {
                    heading: Self::PRESCRIBER.into(),
                    lines,
                });
            }
        }

        PreviewDocument { sections }
    }
}

fn labelled(pairs: &[(&str, &String)]) -> Vec<String> {
    pairs
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{label}: {}", value.trim()))
        .collect()
}

fn push_narrative(sections: &mut Vec<PreviewSection>, heading: &str, text: &str) {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    if !lines.is_empty() {
        sections.push(PreviewSection {
            heading: heading.into(),
            lines,
        });
    }
}

/// `Route Product (Generic) dose - frequency - duration [note]`
fn medication_line(row: &MedicationRow) -> String {
    let mut line = String::new();
    let mut push = |part: &str| {
        let part = part.trim();
        if part.is_empty() {
            return;
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(part);
    };

    push(&row.route);
    push(&row.product_name);
    if !row.generic_name.trim().is_empty() {
        push(&format!("({})", row.generic_name.trim()));
    }
    push(&row.dose_with_unit());

    let schedule: Vec<&str> = [row.frequency.trim(), row.duration.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !schedule.is_empty() {
        push("-");
        push(&schedule.join(" - "));
    }
    if !row.note.trim().is_empty() {
        push(&format!("[{}]", row.note.trim()));
    }
    line
}
