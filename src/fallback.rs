//! Default handler for requests no route matches.

use http::StatusCode;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// Builds a `404 Not Found` handler whose page names `label`.
///
/// Routers use it with their prefix (or `"router"` when they have none), the
/// application with `"app"`, so a stray 404 tells you which table missed.
///
/// ```rust
/// use air::{Router, fallback};
///
/// # fn main() -> Result<(), air::Error> {
/// let router = Router::builder()
///     .prefix("/admin")
///     .fallback(fallback::not_found("admin area"))
///     .build()?;
/// # Ok(()) }
/// ```
pub fn not_found(label: impl Into<String>) -> impl Handler {
    let label = label.into();
    move |_req: Request| {
        let body = page(&label);
        async move {
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .html(body)
        }
    }
}

fn page(label: &str) -> String {
    format!(
        "<!doctype html><html><head><title>404 Not Found</title></head>\
         <body><h1>404 Not Found</h1><p>No route in {label} matches this path.</p></body></html>"
    )
}
