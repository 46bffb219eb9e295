//! Unified error type.

use crate::method::Method;
use crate::url::NoMatchFound;

/// The error type returned by air's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// configuration mistakes caught while routes are registered, reverse-URL
/// misses, and server infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// The router refused the path: a conflicting registration for the same
    /// method, or malformed parameter syntax.
    #[error("invalid route `{method} {path}`: {source}")]
    Route {
        method: Method,
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    /// A route path, with its router's prefix in front, that isn't absolute.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("invalid prefix `{prefix}`: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// `page` needs a name to derive the path from; closures have none.
    #[error("page handler has no name; set one with RouteOptions::name")]
    AnonymousPage,

    #[error(transparent)]
    NoMatch(#[from] NoMatchFound),
}
