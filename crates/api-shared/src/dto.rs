//! Request and response bodies of the REST API.
//!
//! Field names are camelCase on the wire, matching the clinic backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of every non-2xx answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    /// Missing row fields, present on a refused row insert.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BmiReq {
    /// Height in centimetres, as typed (e.g. `"180cm"`).
    pub height: String,
    /// Weight in kilograms, as typed (e.g. `"65kg"`).
    pub weight: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BmiRes {
    /// One decimal place, or empty when either input is unusable.
    pub bmi: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidateRes {
    pub valid: bool,
    /// Messages keyed by field name.
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub generic_name: String,
    #[serde(default)]
    pub center_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDraftReq {
    pub center_id: Option<String>,
    /// Product list of the centre, used for suggestions.
    pub products: Vec<ProductDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftRes {
    pub draft_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicationRowDto {
    pub route: String,
    pub product_name: String,
    pub generic_name: String,
    pub dose: String,
    pub dose_unit: Option<String>,
    pub frequency: String,
    pub duration: String,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftRes {
    pub draft_id: String,
    pub center_id: Option<String>,
    pub rows: Vec<MedicationRowDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddRowReq {
    /// Row to validate and insert before; the first row when absent.
    pub target_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateFieldReq {
    /// Wire name of the field, e.g. `productName`.
    pub field: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectSuggestionReq {
    pub product_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteRowQuery {
    /// Whether the user confirmed removal of a non-first row.
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRowRes {
    /// One of `cleared`, `removed`, `unchanged`, `declined`.
    pub outcome: String,
    pub rows: Vec<MedicationRowDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuggestionsRes {
    pub products: Vec<ProductDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PreviewReq {
    /// The prescription form as edited by the console. Its medication rows
    /// are replaced by the draft's rows.
    #[schema(value_type = Object)]
    #[serde(default)]
    pub form: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PreviewSectionDto {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PreviewRes {
    pub sections: Vec<PreviewSectionDto>,
    /// Plain-text rendering of the same document.
    pub text: String,
}
