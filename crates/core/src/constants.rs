//! Constants used throughout the DocFlex core crate.
//!
//! Wire paths, defaults and user-facing literals live here so the REST
//! surface, the CLI and the core agree on them.

use std::time::Duration;

/// Base path of the clinic backend API.
pub const DEFAULT_API_BASE: &str = "/api/v1";

/// Default number of rows per page for list queries.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a list query may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Keystroke inactivity before a text search is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default cap on product suggestions shown under a product-name input.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Written into the generic-name field when a selected product is not in the
/// centre's product list.
pub const GENERIC_NAME_NOT_FOUND: &str = "Generic name not found";

/// Route the console returns to after the session is dropped.
pub const SIGN_IN_ROUTE: &str = "/";

/// Age from which a patient must supply a national identity card number.
pub const NIC_REQUIRED_FROM_AGE: u32 = 18;

/// Minimum password length for staff accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Wire format for calendar dates in forms.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for clock times in forms.
pub const TIME_FORMAT: &str = "%H:%M";

/// Inactivity after which an open prescription draft is discarded.
pub const DRAFT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Open drafts kept at most; opening one more evicts the least recently used.
pub const MAX_OPEN_DRAFTS: usize = 256;
