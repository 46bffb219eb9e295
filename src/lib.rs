//! # air
//!
//! Ergonomic routing for small HTML-first services.
//!
//! Three conveniences sit on top of a plain hyper + matchit stack:
//!
//! - **Pages**: [`Routes::page`] registers a `GET` route whose path is the
//!   handler's own name. `index` is `/`, and `about_us` is `/about-us`
//!   (or `/about/us` with [`PathSeparator::Slash`]).
//! - **Reverse URLs**: every registration returns a [`Route`] whose
//!   [`url`](Route::url) fills in path parameters. Named routes are also
//!   reachable through [`Routes::url_path_for`] and [`Request::url_for`].
//! - **Labelled 404s**: each [`Router`] falls back to
//!   [`fallback::not_found`] naming its prefix.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use air::{Air, Request, Router, Routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), air::Error> {
//!     let mut app = Air::new();
//!     app.page(index)?;                         // GET /
//!     let user = app.get("/users/{id}", get_user)?;
//!     assert_eq!(user.url([("id", 42)])?, "/users/42");
//!
//!     let mut docs = Router::builder().prefix("/docs").build()?;
//!     docs.page(getting_started)?;             // GET /docs/getting-started
//!     app.include_router(docs)?;
//!
//!     app.serve("0.0.0.0:8000").await
//! }
//!
//! async fn index(req: Request) -> String {
//!     let link = req.url_for("get_user", [("id", 1)]).unwrap_or_default();
//!     format!(r#"<a href="{link}">first user</a>"#)
//! }
//!
//! async fn get_user(req: Request) -> String {
//!     format!("<h1>User {}</h1>", req.param("id").unwrap_or("?"))
//! }
//!
//! async fn getting_started(_req: Request) -> &'static str {
//!     "<h1>Getting started</h1>"
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod middleware;
mod naming;
mod request;
mod response;
mod route;
mod router;
mod routes;
mod server;
mod url;

pub mod fallback;

pub use app::{Air, AirBuilder};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use naming::{PathSeparator, page_path};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use route::{Route, RouteInfo, RouteOptions};
pub use router::{Router, RouterBuilder};
pub use routes::Routes;
pub use server::Server;
pub use url::{NO_PARAMS, NoMatchFound, UrlPattern, UrlTable};
