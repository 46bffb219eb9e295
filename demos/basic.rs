//! Minimal air example — pages, a JSON API router and reverse URLs.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:8000/
//!   curl http://localhost:8000/about-us
//!   curl http://localhost:8000/api/users/42
//!   curl -X POST http://localhost:8000/api/users -d '{"name":"alice"}'
//!   curl http://localhost:8000/api/nope      # 404 page labelled "app"

use air::{Air, ContentType, Json, NO_PARAMS, Request, RouteOptions, Router, Routes};
use http::StatusCode;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct User {
    id: String,
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), air::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut app = Air::new();
    app.page(index)?;
    app.page(about_us)?;

    let mut api = Router::builder().prefix("/api").tags(["api"]).build()?;
    api.get("/users/{user_id}", get_user)?;
    api.post_with(
        "/users",
        RouteOptions::new()
            .status(StatusCode::CREATED)
            .content_type(ContentType::Json)
            .summary("Create a user"),
        create_user,
    )?;
    api.delete("/users/{user_id}", delete_user)?;
    app.include_router(api)?;

    app.serve("0.0.0.0:8000").await
}

// GET /
async fn index(req: Request) -> String {
    let about = req.url_for("about_us", NO_PARAMS).unwrap_or_default();
    let user = req.url_for("get_user", [("user_id", 42)]).unwrap_or_default();
    format!(r#"<h1>Home</h1><a href="{about}">About</a> <a href="{user}">User 42</a>"#)
}

// GET /about-us
async fn about_us(_req: Request) -> &'static str {
    "<h1>I am the about page</h1>"
}

// GET /api/users/{user_id}
async fn get_user(req: Request) -> Json<User> {
    Json(User {
        id: req.param("user_id").unwrap_or_default().to_owned(),
        name: "alice".to_owned(),
    })
}

// POST /api/users → 201 from the route's status option, 400 on an empty body
async fn create_user(req: Request) -> Result<Json<User>, StatusCode> {
    if req.body().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(User { id: "99".to_owned(), name: "new_user".to_owned() }))
}

// DELETE /api/users/{user_id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
