use crate::prescription::MedicationField;
use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Please fill in the required fields: {}", join_fields(.0))]
    MissingFields(Vec<MedicationField>),
    #[error("row {index} does not exist (rows: {len})")]
    RowOutOfRange { index: usize, len: usize },
    #[error("unknown medication field: {0}")]
    UnknownField(String),
    #[error("prescription draft not found: {0}")]
    DraftNotFound(uuid::Uuid),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("unknown form schema: {0}")]
    UnknownSchema(String),
    #[error("failed to parse {schema} form at `{path}`: {source}")]
    FormParse {
        schema: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize: {0}")]
    Deserialization(serde_json::Error),
    #[error("shared state lock poisoned")]
    LockPoisoned,
}

fn join_fields(fields: &[MedicationField]) -> String {
    fields
        .iter()
        .map(|f| f.wire_name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationErrors> for ClinicError {
    fn from(errors: ValidationErrors) -> Self {
        ClinicError::Validation(errors)
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
