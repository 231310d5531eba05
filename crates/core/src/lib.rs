//! # DocFlex Core
//!
//! Client-side domain logic of the DocFlex Pro clinic console.
//!
//! This crate holds the business rules the console applies before anything
//! reaches the backend:
//! - The prescription editor: medication rows, product suggestions, live preview
//! - Declarative form schemas for every entity the console edits
//! - BMI derivation from vital signs
//! - Debounced search, the shared loading counter and the list-response contract
//! - Failure classification, the session context and the prescription worklist
//!
//! **No API concerns**: HTTP servers, DTOs and CLIs belong in `api-shared`,
//! `api-rest` and `docflex-cli`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod failure;
pub mod listing;
pub mod loading;
pub mod prescription;
pub mod roles;
pub mod search;
pub mod validation;
pub mod vitals;
pub mod worklist;

pub use catalog::{Product, ProductCatalog};
pub use config::CoreConfig;
pub use context::{ClinicContext, Reaction, SignedInUser};
pub use error::{ClinicError, ClinicResult};
pub use failure::{Failure, Notice, NoticeLevel};
pub use listing::{ListQuery, ListResponse, Page, Pagination};
pub use loading::{LoadingCounter, LoadingGuard};
pub use prescription::{
    DeleteOutcome, DraftBook, MedicationField, MedicationRow, Prescription, PrescriptionEditor,
    PrescriptionForm, PrescriptionPreview, PrescriptionStatus, PreviewDocument,
};
pub use roles::{Permission, Role};
pub use search::{DebouncedSearch, SearchOutcome};
pub use validation::{FormKind, FormSchema, ValidationErrors};
pub use vitals::{bmi, VitalSigns};
pub use worklist::WorklistFilter;

pub use docflex_types::{ContactNumber, EmailAddress, NonEmptyText};
