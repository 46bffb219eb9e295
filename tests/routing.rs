//! End-to-end routing tests, driven in-process through `Air::handle`.

use air::{
    Air, ContentType, Error, Json, Method, NO_PARAMS, PathSeparator, Request, Response,
    RouteOptions, Router, Routes,
};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use tracing_subscriber::EnvFilter;

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

async fn send(app: &Air, method: &str, uri: &str) -> Reply {
    send_body(app, method, uri, "").await
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn send_body(app: &Air, method: &str, uri: &str, body: &'static str) -> Reply {
    init_tracing();
    let req = http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap();
    let res = app.handle(req).await;
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    Reply { status, headers, body: String::from_utf8(bytes.to_vec()).unwrap() }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn read_root(_req: Request) -> &'static str {
    "<h1>Hello</h1>"
}

async fn index(_req: Request) -> &'static str {
    "<h1>I am the home page</h1>"
}

async fn about_us(_req: Request) -> &'static str {
    "<h1>I am the about page</h1>"
}

async fn create_item(_req: Request) -> Response {
    Response::json(br#"{"status":"created"}"#.to_vec())
}

async fn get_data(_req: Request) -> Json<serde_json::Value> {
    Json(serde_json::json!({"value": 42}))
}

async fn get_item(req: Request) -> String {
    format!("<p>item {}</p>", req.param("id").unwrap_or("?"))
}

async fn get_user(req: Request) -> String {
    format!("<h1>User {}</h1>", req.param("user_id").unwrap_or("?"))
}

async fn link_to_user(req: Request) -> String {
    match req.url_for("get_user", [("user_id", 123)]) {
        Ok(url) => url,
        Err(e) => e.to_string(),
    }
}

async fn echo(req: Request) -> String {
    String::from_utf8_lossy(req.body()).into_owned()
}

// ── Method registration ───────────────────────────────────────────────────────

#[tokio::test]
async fn get_route_serves_html_by_default() {
    let mut app = Air::new();
    app.get("/", read_root).unwrap();

    let res = send(&app, "GET", "/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["content-type"], "text/html; charset=utf-8");
    assert_eq!(res.body, "<h1>Hello</h1>");
}

#[tokio::test]
async fn post_route_sends_explicit_json() {
    let mut app = Air::new();
    app.post("/create", create_item).unwrap();

    let res = send(&app, "POST", "/create").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["content-type"], "application/json");
    let json: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    assert_eq!(json, serde_json::json!({"status": "created"}));
}

#[tokio::test]
async fn response_type_override_applies_to_plain_values() {
    let mut app = Air::new();
    app.get_with("/", RouteOptions::new().content_type(ContentType::Json), get_data).unwrap();
    app.get_with("/raw", RouteOptions::new().content_type(ContentType::Text), read_root).unwrap();

    let res = send(&app, "GET", "/").await;
    assert_eq!(res.headers["content-type"], "application/json");
    assert_eq!(res.body, r#"{"value":42}"#);

    let res = send(&app, "GET", "/raw").await;
    assert_eq!(res.headers["content-type"], "text/plain; charset=utf-8");
}

#[tokio::test]
async fn status_option_leaves_built_responses_alone() {
    let mut app = Air::new();
    app.post_with("/items", RouteOptions::new().status(StatusCode::CREATED), get_data).unwrap();
    app.post_with("/explicit", RouteOptions::new().status(StatusCode::CREATED), create_item).unwrap();

    assert_eq!(send(&app, "POST", "/items").await.status, StatusCode::CREATED);
    assert_eq!(send(&app, "POST", "/explicit").await.status, StatusCode::OK);
}

#[tokio::test]
async fn every_method_registers_its_own_tree() {
    let mut app = Air::new();
    app.get("/thing", read_root).unwrap();
    app.post("/thing", echo).unwrap();
    app.put("/thing", echo).unwrap();
    app.patch("/thing", echo).unwrap();
    app.delete("/thing", echo).unwrap();

    for method in ["POST", "PUT", "PATCH", "DELETE"] {
        let res = send_body(&app, method, "/thing", "payload").await;
        assert_eq!(res.status, StatusCode::OK, "{method}");
        assert_eq!(res.body, "payload");
    }
    let methods: Vec<Method> = app.routes().map(|r| r.method()).collect();
    assert_eq!(methods, [Method::Get, Method::Post, Method::Put, Method::Patch, Method::Delete]);
}

// ── Pages ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn page_paths_follow_handler_names() {
    let mut app = Air::new();
    assert_eq!(app.page(index).unwrap().path(), "/");
    assert_eq!(app.page(about_us).unwrap().path(), "/about-us");

    let res = send(&app, "GET", "/about-us").await;
    assert_eq!(res.body, "<h1>I am the about page</h1>");
    assert_eq!(send(&app, "GET", "/").await.body, "<h1>I am the home page</h1>");
}

#[test]
fn page_paths_honor_the_separator() {
    let mut dash = Router::new();
    let mut slash = Router::builder().path_separator(PathSeparator::Slash).build().unwrap();

    assert_eq!(dash.page(about_us).unwrap().path(), "/about-us");
    assert_eq!(slash.page(about_us).unwrap().path(), "/about/us");
    assert_eq!(slash.page(index).unwrap().path(), "/");
}

#[test]
fn page_route_is_named_after_the_handler() {
    let mut app = Air::new();
    let route = app.page(about_us).unwrap();
    assert_eq!(route.name(), Some("about_us"));
    assert_eq!(route.method(), Method::Get);
    assert_eq!(app.url_path_for("about_us", NO_PARAMS).unwrap(), "/about-us");
}

#[test]
fn closures_need_an_explicit_page_name() {
    let mut app = Air::new();
    let err = app.page(|_req: Request| async { "anon" }).unwrap_err();
    assert!(matches!(err, Error::AnonymousPage));

    let route = app
        .page_with(RouteOptions::new().name("contact_us"), |_req: Request| async { "hi" })
        .unwrap();
    assert_eq!(route.path(), "/contact-us");
}

#[test]
fn prefixed_router_puts_pages_under_its_prefix() {
    let mut docs = Router::builder().prefix("/docs").build().unwrap();
    assert_eq!(docs.page(about_us).unwrap().path(), "/docs/about-us");
    assert_eq!(docs.page(index).unwrap().path(), "/docs/");
}

// ── Reverse URLs ──────────────────────────────────────────────────────────────

#[test]
fn route_handle_builds_urls() {
    let mut app = Air::new();
    let item = app.get("/items/{id}", get_item).unwrap();
    assert_eq!(item.url([("id", 5)]).unwrap(), "/items/5");
    assert_eq!(app.url_path_for("get_item", [("id", "abc")]).unwrap(), "/items/abc");
}

#[test]
fn mismatched_params_do_not_match() {
    let mut app = Air::new();
    let item = app.get("/items/{id}", get_item).unwrap();

    assert!(item.url(NO_PARAMS).is_err());
    assert!(item.url([("user_id", 5)]).is_err());
    assert!(item.url([("id", 5), ("extra", 1)]).is_err());
    assert!(item.url([("id", 1), ("id", 2)]).is_err());
    assert!(app.url_path_for("get_item", [("id", 1), ("id", 2)]).is_err());
    let err = app.url_path_for("nope", NO_PARAMS).unwrap_err();
    assert_eq!(err.name, "nope");
}

#[test]
fn shared_name_picks_the_route_that_fits() {
    let mut app = Air::new();
    app.get_with("/items", RouteOptions::new().name("item"), index).unwrap();
    app.get_with("/items/{id}", RouteOptions::new().name("item"), get_item).unwrap();
    assert_eq!(app.url_path_for("item", NO_PARAMS).unwrap(), "/items");
    assert_eq!(app.url_path_for("item", [("id", 5)]).unwrap(), "/items/5");
    let err = app.url_path_for("item", [("slug", "x")]).unwrap_err();
    assert_eq!(err.params, ["slug"]);
}

#[test]
fn custom_name_replaces_function_name() {
    let mut app = Air::new();
    app.get_with("/u/{user_id}", RouteOptions::new().name("profile"), get_user).unwrap();
    assert_eq!(app.url_path_for("profile", [("user_id", 1)]).unwrap(), "/u/1");
    assert!(app.url_path_for("get_user", [("user_id", 1)]).is_err());
}

#[test]
fn closure_routes_are_unnamed_but_reversible() {
    let mut app = Air::new();
    let route = app.get("/c/{x}", |_req: Request| async { "c" }).unwrap();
    assert_eq!(route.name(), None);
    assert_eq!(route.url([("x", "y")]).unwrap(), "/c/y");
}

#[tokio::test]
async fn handlers_build_urls_from_the_request() {
    let mut app = Air::new();
    app.get("/users/{user_id}", get_user).unwrap();
    app.get("/link", link_to_user).unwrap();

    assert_eq!(send(&app, "GET", "/link").await.body, "/users/123");
}

// ── Registration errors ───────────────────────────────────────────────────────

#[test]
fn duplicate_method_and_path_is_rejected() {
    let mut app = Air::new();
    app.get("/items/{id}", get_item).unwrap();
    let err = app.get("/items/{id}", get_user).unwrap_err();
    match err {
        Error::Route { method, path, .. } => {
            assert_eq!(method, Method::Get);
            assert_eq!(path, "/items/{id}");
        }
        other => panic!("unexpected error: {other}"),
    }
    // Same path, different method is fine.
    app.post("/items/{id}", get_item).unwrap();
}

#[test]
fn malformed_path_is_rejected() {
    let mut app = Air::new();
    assert!(matches!(app.get("/files/{*rest}/more", read_root), Err(Error::Route { .. })));
}

#[test]
fn relative_and_empty_paths_are_rejected() {
    let mut app = Air::new();
    assert!(matches!(app.get("items", read_root), Err(Error::InvalidPath { .. })));
    assert!(matches!(app.get("", read_root), Err(Error::InvalidPath { .. })));
    assert_eq!(app.routes().count(), 0);

    let mut api = Router::builder().prefix("/api").build().unwrap();
    assert!(matches!(api.get("users", read_root), Err(Error::InvalidPath { .. })));
    assert_eq!(api.get("", read_root).unwrap().path(), "/api");
}

#[test]
fn prefixes_are_validated() {
    assert!(matches!(Router::builder().prefix("api").build(), Err(Error::InvalidPrefix { .. })));
    assert!(matches!(Router::builder().prefix("/api/").build(), Err(Error::InvalidPrefix { .. })));
    assert!(Router::builder().prefix("/api").build().is_ok());
}

// ── Included routers ──────────────────────────────────────────────────────────

#[tokio::test]
async fn included_router_routes_are_served_and_named() {
    let mut users = Router::builder().prefix("/users").tags(["users"]).build().unwrap();
    users.get_with("/{user_id}", RouteOptions::new().tags(["detail"]), get_user).unwrap();

    let mut app = Air::builder().tags(["app"]).build();
    app.page(index).unwrap();
    app.include_router(users).unwrap();

    let res = send(&app, "GET", "/users/7").await;
    assert_eq!(res.body, "<h1>User 7</h1>");
    assert_eq!(app.url_path_for("get_user", [("user_id", 7)]).unwrap(), "/users/7");

    let info = app.routes().find(|r| r.name() == Some("get_user")).unwrap();
    assert_eq!(info.path(), "/users/{user_id}");
    assert_eq!(info.tags(), ["app", "users", "detail"]);
}

#[test]
fn included_router_conflicts_are_reported() {
    let mut a = Router::new();
    a.page(about_us).unwrap();
    let mut app = Air::new();
    app.page(about_us).unwrap();
    assert!(matches!(app.include_router(a), Err(Error::Route { .. })));
}

#[test]
fn route_metadata_is_kept() {
    let mut app = Air::new();
    app.get_with(
        "/old",
        RouteOptions::new()
            .summary("Old page")
            .description("Kept for links")
            .deprecated(true)
            .include_in_schema(false),
        read_root,
    )
    .unwrap();

    let info = app.routes().next().unwrap();
    assert_eq!(info.summary(), Some("Old page"));
    assert_eq!(info.description(), Some("Kept for links"));
    assert!(info.deprecated());
    assert!(!info.include_in_schema());
    assert_eq!(info.name(), Some("read_root"));
}

// ── Unmatched requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn unmatched_path_gets_labelled_404() {
    let app = Air::new();
    let res = send(&app, "GET", "/missing").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("app"));

    let app = Air::from(Router::builder().prefix("/api").build().unwrap());
    let res = send(&app, "GET", "/api/missing").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("/api"));

    let app = Air::from(Router::new());
    let res = send(&app, "GET", "/missing").await;
    assert!(res.body.contains("router"));
}

#[tokio::test]
async fn custom_fallback_replaces_404_page() {
    let app = Air::builder()
        .fallback(|_req: Request| async { Response::status(StatusCode::IM_A_TEAPOT) })
        .build();
    assert_eq!(send(&app, "GET", "/x").await.status, StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn wrong_method_gets_405_with_allow() {
    let mut app = Air::new();
    app.get("/items/{id}", get_item).unwrap();
    app.delete("/items/{id}", get_item).unwrap();

    let res = send(&app, "POST", "/items/1").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers["allow"], "GET, DELETE");

    let res = send(&app, "OPTIONS", "/items/1").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn trailing_slash_redirects_keep_the_query() {
    let mut app = Air::new();
    app.get("/about", about_us).unwrap();
    app.get("/docs/", index).unwrap();

    let res = send(&app, "GET", "/about/?lang=en").await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers["location"], "/about?lang=en");

    let res = send(&app, "GET", "/docs").await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers["location"], "/docs/");
}

#[tokio::test]
async fn trailing_slash_redirects_ignore_the_method() {
    let mut app = Air::new();
    app.get("/about", about_us).unwrap();

    let res = send(&app, "POST", "/about/").await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers["location"], "/about");
}

#[tokio::test]
async fn slash_redirects_can_be_disabled() {
    let mut app = Air::builder().redirect_slashes(false).build();
    app.get("/about", about_us).unwrap();
    assert_eq!(send(&app, "GET", "/about/").await.status, StatusCode::NOT_FOUND);
}
