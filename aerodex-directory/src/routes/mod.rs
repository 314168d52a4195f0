//! JSON lookup routes over a [`Directory`].
//!
//! | Route                             | Body                                  |
//! |-----------------------------------|---------------------------------------|
//! | `GET /airports`                   | every airport                         |
//! | `GET /airports/{query}`           | airports matching `query`             |
//! | `GET /airports/page/{page}`       | one page of every airport             |
//! | `GET /airports/page/{page}/{query}` | one page of airports matching `query` |
//! | `GET /airports/iata/{code}`       | one airport, or 404                   |
//!
//! Path segments are percent-decoded. A `page` that is not a non-negative
//! integer reads as page 0. Errors are RFC 7807 problem documents.

mod parsing;

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use parsing::{DecodeError, MAX_SEGMENT_LEN, percent_decode, percent_encode};

use crate::directory::Directory;
use crate::status;

/// `Content-Type` of successful responses.
pub const MIME_JSON: &str = "application/json";
/// `Content-Type` of error responses.
pub const MIME_PROBLEM_JSON: &str = "application/problem+json";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Method {
    /// HTTP GET method - retrieve a resource.
    Get,
    /// HTTP POST method - create a resource.
    Post,
    /// HTTP PUT method - replace a resource.
    Put,
    /// HTTP PATCH method - partially update a resource.
    Patch,
    /// HTTP DELETE method - remove a resource.
    Delete,
    /// HTTP HEAD method - retrieve headers only.
    Head,
    /// HTTP OPTIONS method - retrieve allowed methods.
    Options,
}

impl Method {
    /// Returns the method as an uppercase string (e.g., "GET", "POST").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Method`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// A routed response: status, content type, and JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// [`MIME_JSON`] or [`MIME_PROBLEM_JSON`].
    pub content_type: &'static str,
    /// Serialized JSON.
    pub body: String,
}

impl Response {
    fn json(value: &impl Serialize) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: status::OK,
                content_type: MIME_JSON,
                body,
            },
            Err(err) => Self::problem(status::INTERNAL_SERVER_ERROR, &err.to_string()),
        }
    }

    fn problem(status: u16, detail: &str) -> Self {
        let body = serde_json::json!({
            "type": "about:blank",
            "title": status::reason(status),
            "status": status,
            "detail": detail,
        });
        Self {
            status,
            content_type: MIME_PROBLEM_JSON,
            body: body.to_string(),
        }
    }

    /// Status is 2xx.
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Deserialize the body.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Dispatches lookup paths to a shared [`Directory`].
#[derive(Debug, Clone)]
pub struct Router {
    directory: Arc<Directory>,
    page_size: usize,
}

impl Router {
    /// Route over `directory` with the default page size.
    ///
    /// See [`aerodex::constants::page_size`].
    pub fn new(directory: impl Into<Arc<Directory>>) -> Self {
        Self {
            directory: directory.into(),
            page_size: aerodex::constants::page_size(),
        }
    }

    /// Set the number of airports per page. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Airports per page.
    #[inline]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// The directory being served.
    #[inline]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Route one request.
    pub fn handle(&self, method: Method, path: &str) -> Response {
        let response = self.route(method, path);
        debug!(method = %method, path, status = response.status, "route handled");
        response
    }

    fn route(&self, method: Method, path: &str) -> Response {
        if method != Method::Get {
            return Response::problem(
                status::METHOD_NOT_ALLOWED,
                &format!("{method} is not supported; use GET"),
            );
        }

        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = match path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(percent_decode)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(segments) => segments,
            Err(err) => return Response::problem(status::BAD_REQUEST, &err.to_string()),
        };
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            ["airports"] => Response::json(&self.directory.all()),
            ["airports", "iata", code] => match self.directory.find_by_iata(code) {
                Some(airport) => Response::json(airport),
                None => Response::problem(
                    status::NOT_FOUND,
                    &format!("no airport with IATA code {}", code.to_uppercase()),
                ),
            },
            ["airports", "page", page] => {
                Response::json(&self.directory.page("", parse_page(page), self.page_size))
            },
            ["airports", "page", page, query] => {
                Response::json(&self.directory.page(query, parse_page(page), self.page_size))
            },
            ["airports", query] => Response::json(&self.directory.search(query)),
            _ => Response::problem(status::NOT_FOUND, &format!("no route for {path}")),
        }
    }
}

/// Page numbers that are not non-negative integers read as page 0.
fn parse_page(segment: &str) -> usize {
    segment.parse().unwrap_or(0)
}
