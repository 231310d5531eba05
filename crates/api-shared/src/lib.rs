//! # API Shared
//!
//! Shared definitions for the DocFlex API surfaces.
//!
//! Contains:
//! - Wire DTOs with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Kept free of domain logic: conversions to and from `docflex-core` types live
//! in `api-rest`.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
