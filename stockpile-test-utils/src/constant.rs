//! Test configuration constants for ESI client setup.
//!
//! These values are not real credentials but placeholder values for testing purposes.

/// User agent string for test ESI client requests.
///
/// Standard user agent format following EVE ESI best practices with contact information
/// and project URL.
pub static TEST_USER_AGENT: &str =
    "MyApp/1.0 (contact@example.com; +https://github.com/autumn-order/stockpile)";

/// Bearer token expected by the authenticated mock endpoints.
///
/// Register it for the owner under test with `EsiClient::set_access_token`.
pub static TEST_ACCESS_TOKEN: &str = "test_access_token";
