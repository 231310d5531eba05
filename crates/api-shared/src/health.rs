use crate::dto::HealthRes;

/// Simple health service shared by the API surfaces.
///
/// Provides a standardised way to check that the DocFlex service is up.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Checks health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "DocFlex is alive".into(),
        }
    }
}
