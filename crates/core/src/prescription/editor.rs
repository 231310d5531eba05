//! Row-state manager for the medication list of a prescription.
//!
//! ## Row model
//!
//! The editor holds an ordered, never-empty list of [`MedicationRow`]s. Row 0 is
//! the *staging* row: the prescriber fills it in, then adds a new blank row in
//! front of it. Deleting the staging row clears it rather than removing it,
//! unless it is already blank and other rows exist.
//!
//! ## Validation gate
//!
//! A new row can only be added once the row being added in front of has every
//! required field filled. The error names exactly the missing fields and the
//! list is left untouched.

use super::{MedicationField, MedicationRow, PrescriptionForm};
use crate::catalog::{Product, ProductCatalog};
use crate::{ClinicError, ClinicResult};

/// What [`PrescriptionEditor::delete_row`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The staging row had content and was blanked.
    Cleared,
    /// The row was removed from the list.
    Removed,
    /// The only row is already blank; nothing to do.
    Unchanged,
    /// The user did not confirm the removal.
    Declined,
}

/// Medication rows plus the product cache used to fill generic names.
#[derive(Clone, Debug)]
pub struct PrescriptionEditor {
    rows: Vec<MedicationRow>,
    catalog: ProductCatalog,
}

impl Default for PrescriptionEditor {
    fn default() -> Self {
        Self::new(ProductCatalog::default())
    }
}

impl PrescriptionEditor {
    /// Creates an editor with a single blank staging row.
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            rows: vec![MedicationRow::default()],
            catalog,
        }
    }

    /// Opens an existing medication list, e.g. when editing a prescription.
    ///
    /// An empty list still gets its staging row.
    pub fn with_rows(rows: Vec<MedicationRow>, catalog: ProductCatalog) -> Self {
        let rows = if rows.is_empty() {
            vec![MedicationRow::default()]
        } else {
            rows
        };
        Self { rows, catalog }
    }

    pub fn rows(&self) -> &[MedicationRow] {
        &self.rows
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    fn check_index(&self, index: usize) -> ClinicResult<()> {
        if index >= self.rows.len() {
            return Err(ClinicError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Inserts a blank row.
    ///
    /// With `Some(index)` the row at `index` is validated and the blank row is
    /// inserted immediately before it. With `None` the first row is validated
    /// and the blank row is prepended.
    ///
    /// # Errors
    ///
    /// - `ClinicError::RowOutOfRange` if `index` does not name a row.
    /// - `ClinicError::MissingFields` with the blank required fields of the
    ///   validated row. The list is not modified.
    pub fn add_row(&mut self, target_index: Option<usize>) -> ClinicResult<usize> {
        let index = target_index.unwrap_or(0);
        self.check_index(index)?;

        let missing = self.rows[index].missing_required();
        if !missing.is_empty() {
            tracing::debug!("add row refused, missing fields: {:?}", missing);
            return Err(ClinicError::MissingFields(missing));
        }

        self.rows.insert(index, MedicationRow::default());
        Ok(index)
    }

    /// Deletes a row.
    ///
    /// Row 0 is never confirmed: it is cleared if it has content, removed if it
    /// is blank and other rows exist, and left alone if it is the only blank
    /// row. Any other row is removed only if `confirm` returns `true`.
    pub fn delete_row<F>(&mut self, index: usize, confirm: F) -> ClinicResult<DeleteOutcome>
    where
        F: FnOnce(&MedicationRow) -> bool,
    {
        self.check_index(index)?;

        if index == 0 {
            if !self.rows[0].is_empty() {
                self.rows[0] = MedicationRow::default();
                return Ok(DeleteOutcome::Cleared);
            }
            if self.rows.len() > 1 {
                self.rows.remove(0);
                return Ok(DeleteOutcome::Removed);
            }
            return Ok(DeleteOutcome::Unchanged);
        }

        if !confirm(&self.rows[index]) {
            return Ok(DeleteOutcome::Declined);
        }
        self.rows.remove(index);
        Ok(DeleteOutcome::Removed)
    }

    /// Assigns one field of one row.
    ///
    /// No cross-field checks happen here. Typing a new product name clears the
    /// derived generic name until a suggestion is selected.
    pub fn update_field(
        &mut self,
        index: usize,
        field: MedicationField,
        value: impl Into<String>,
    ) -> ClinicResult<()> {
        self.check_index(index)?;
        let row = &mut self.rows[index];
        let value = value.into();
        if field == MedicationField::ProductName && row.product_name != value {
            row.generic_name.clear();
        }
        row.set(field, value);
        Ok(())
    }

    /// Applies a chosen product suggestion to a row and derives its generic
    /// name from the cached product list.
    pub fn select_suggestion(&mut self, index: usize, product_name: &str) -> ClinicResult<()> {
        self.check_index(index)?;
        let generic_name = self.catalog.generic_name_or_placeholder(product_name);
        let row = &mut self.rows[index];
        row.product_name = product_name.to_string();
        row.generic_name = generic_name;
        Ok(())
    }

    /// Product suggestions for free-text input.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<&Product> {
        self.catalog.suggest(query, limit)
    }

    /// Swaps the product cache after the centre selection changed.
    pub fn change_center(&mut self, center_id: Option<String>, products: Vec<Product>) {
        self.catalog.set_center(center_id, products);
    }

    /// Enter pressed inside row `index`.
    ///
    /// Only the last row reacts, by adding a row as [`add_row`](Self::add_row)
    /// would for that index. Returns `Ok(None)` for any other row.
    pub fn on_enter(&mut self, index: usize) -> ClinicResult<Option<usize>> {
        self.check_index(index)?;
        if index + 1 != self.rows.len() {
            return Ok(None);
        }
        self.add_row(Some(index)).map(Some)
    }

    /// Copies the rows into a form for preview or submission.
    pub fn fill_form(&self, form: &mut PrescriptionForm) {
        form.medications = self.rows.clone();
    }

    /// The non-blank rows, in order.
    pub fn into_medications(self) -> Vec<MedicationRow> {
        self.rows.into_iter().filter(|row| !row.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GENERIC_NAME_NOT_FOUND;

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(
            Some("c-1".into()),
            vec![Product {
                id: "1".into(),
                name: "Amoxil".into(),
                generic_name: "Amoxicillin".into(),
                center_id: Some("c-1".into()),
            }],
        )
    }

    fn filled(editor: &mut PrescriptionEditor, index: usize) {
        editor.update_field(index, MedicationField::Route, "Oral").unwrap();
        editor.select_suggestion(index, "Amoxil").unwrap();
        editor.update_field(index, MedicationField::Dose, "500").unwrap();
        editor.update_field(index, MedicationField::Frequency, "TDS").unwrap();
        editor.update_field(index, MedicationField::Duration, "5 days").unwrap();
    }

    #[test]
    fn starts_with_one_blank_staging_row() {
        let editor = PrescriptionEditor::default();
        assert_eq!(editor.rows().len(), 1);
        assert!(editor.rows()[0].is_empty());
        assert_eq!(PrescriptionEditor::with_rows(vec![], catalog()).rows().len(), 1);
    }

    #[test]
    fn add_row_reports_exact_missing_fields_without_mutating() {
        let mut editor = PrescriptionEditor::new(catalog());
        editor.update_field(0, MedicationField::Route, "Oral").unwrap();
        editor.update_field(0, MedicationField::Dose, "500").unwrap();
        let before = editor.rows().to_vec();

        let err = editor.add_row(None).unwrap_err();
        match err {
            ClinicError::MissingFields(missing) => assert_eq!(
                missing,
                vec![
                    MedicationField::ProductName,
                    MedicationField::GenericName,
                    MedicationField::Frequency,
                    MedicationField::Duration,
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(editor.rows(), before.as_slice());
    }

    #[test]
    fn add_row_prepends_or_inserts_before_target() {
        let mut editor = PrescriptionEditor::new(catalog());
        filled(&mut editor, 0);

        assert_eq!(editor.add_row(None).unwrap(), 0);
        assert_eq!(editor.rows().len(), 2);
        assert!(editor.rows()[0].is_empty());
        assert_eq!(editor.rows()[1].product_name, "Amoxil");

        assert_eq!(editor.add_row(Some(1)).unwrap(), 1);
        assert_eq!(editor.rows().len(), 3);
        assert!(editor.rows()[1].is_empty());
        assert_eq!(editor.rows()[2].generic_name, "Amoxicillin");

        // Row 0 is blank, so prepending is refused.
        assert!(matches!(
            editor.add_row(None),
            Err(ClinicError::MissingFields(_))
        ));
        assert!(matches!(
            editor.add_row(Some(9)),
            Err(ClinicError::RowOutOfRange { index: 9, len: 3 })
        ));
    }

    #[test]
    fn deleting_first_row_clears_then_removes_then_noops() {
        let mut editor = PrescriptionEditor::new(catalog());
        filled(&mut editor, 0);
        editor.add_row(None).unwrap();
        filled(&mut editor, 0);

        // Non-empty first row: cleared, never confirmed.
        let outcome = editor
            .delete_row(0, |_| panic!("row 0 must not ask for confirmation"))
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Cleared);
        assert_eq!(editor.rows().len(), 2);
        assert!(editor.rows()[0].is_empty());

        // Empty first row with another row behind it: removed.
        assert_eq!(editor.delete_row(0, |_| false).unwrap(), DeleteOutcome::Removed);
        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.rows()[0].product_name, "Amoxil");

        // Clear the last row, then deleting it again changes nothing.
        assert_eq!(editor.delete_row(0, |_| false).unwrap(), DeleteOutcome::Cleared);
        assert_eq!(editor.delete_row(0, |_| true).unwrap(), DeleteOutcome::Unchanged);
        assert_eq!(editor.rows().len(), 1);
    }

    #[test]
    fn deleting_later_rows_requires_confirmation() {
        let mut editor = PrescriptionEditor::new(catalog());
        filled(&mut editor, 0);
        editor.add_row(None).unwrap();

        assert_eq!(editor.delete_row(1, |_| false).unwrap(), DeleteOutcome::Declined);
        assert_eq!(editor.rows().len(), 2);

        let outcome = editor
            .delete_row(1, |row| row.product_name == "Amoxil")
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed);
        assert_eq!(editor.rows().len(), 1);
    }

    #[test]
    fn update_field_is_direct_assignment() {
        let mut editor = PrescriptionEditor::new(catalog());
        editor.update_field(0, MedicationField::Dose, "two").unwrap();
        editor.update_field(0, MedicationField::DoseUnit, "ml").unwrap();
        assert_eq!(editor.rows()[0].dose, "two");
        assert_eq!(editor.rows()[0].dose_unit.as_deref(), Some("ml"));
        assert!(editor.update_field(3, MedicationField::Dose, "1").is_err());
    }

    #[test]
    fn retyping_product_name_clears_derived_generic() {
        let mut editor = PrescriptionEditor::new(catalog());
        editor.select_suggestion(0, "Amoxil").unwrap();
        assert_eq!(editor.rows()[0].generic_name, "Amoxicillin");

        editor.update_field(0, MedicationField::ProductName, "Amoxil").unwrap();
        assert_eq!(editor.rows()[0].generic_name, "Amoxicillin");

        editor.update_field(0, MedicationField::ProductName, "Amox").unwrap();
        assert_eq!(editor.rows()[0].generic_name, "");

        editor.select_suggestion(0, "Unknown brand").unwrap();
        assert_eq!(editor.rows()[0].generic_name, GENERIC_NAME_NOT_FOUND);
    }

    #[test]
    fn enter_only_adds_from_last_row() {
        let mut editor = PrescriptionEditor::new(catalog());
        filled(&mut editor, 0);
        editor.add_row(None).unwrap();
        filled(&mut editor, 0);

        assert_eq!(editor.on_enter(0).unwrap(), None);
        assert_eq!(editor.rows().len(), 2);

        assert_eq!(editor.on_enter(1).unwrap(), Some(1));
        assert_eq!(editor.rows().len(), 3);
        assert!(editor.rows()[1].is_empty());
    }

    #[test]
    fn medications_skip_blank_rows() {
        let mut editor = PrescriptionEditor::new(catalog());
        filled(&mut editor, 0);
        editor.add_row(None).unwrap();
        let meds = editor.into_medications();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].generic_name, "Amoxicillin");
    }
}
