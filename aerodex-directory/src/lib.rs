// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Builder pattern returns Self by design
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy

//! aerodex-directory - the airport lookup service
//!
//! An in-memory airport [`Directory`], the JSON lookup [`routes`] served over
//! it, and a [`DirectorySource`] that feeds those routes into an
//! [`aerodex::Pager`] without a network hop.
//!
//! ```
//! use aerodex_directory::{Directory, Method, Router};
//!
//! let directory = Directory::from_json(br#"[
//!     {"iata": "BER", "name": "Berlin Brandenburg Airport", "city": "Berlin", "country": "Germany"},
//!     {"iata": "MUC", "name": "Munich Airport", "city": "Munich", "country": "Germany"}
//! ]"#)?;
//!
//! let router = Router::new(directory).with_page_size(1);
//! let response = router.handle(Method::Get, "/airports/page/1/germany");
//! assert!(response.body.contains("MUC"));
//! # Ok::<(), aerodex_directory::DirectoryError>(())
//! ```

pub mod directory;
pub mod routes;
pub mod source;

pub use directory::{Airport, Directory, DirectoryError};
pub use routes::{Method, Response, Router};
pub use source::DirectorySource;

/// HTTP status code constants used by the routes.
pub mod status {
    // 2xx Success
    /// 200 OK - Request succeeded.
    pub const OK: u16 = 200;

    // 4xx Client Errors
    /// 400 Bad Request - Invalid request syntax or parameters.
    pub const BAD_REQUEST: u16 = 400;
    /// 404 Not Found - Resource not found.
    pub const NOT_FOUND: u16 = 404;
    /// 405 Method Not Allowed - HTTP method not supported.
    pub const METHOD_NOT_ALLOWED: u16 = 405;

    // 5xx Server Errors
    /// 500 Internal Server Error - Unexpected server error.
    pub const INTERNAL_SERVER_ERROR: u16 = 500;

    /// Reason phrase for the codes above.
    pub const fn reason(status: u16) -> &'static str {
        match status {
            OK => "OK",
            BAD_REQUEST => "Bad Request",
            NOT_FOUND => "Not Found",
            METHOD_NOT_ALLOWED => "Method Not Allowed",
            INTERNAL_SERVER_ERROR => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
