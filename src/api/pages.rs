//! Static page routes
//!
//! All pages are embedded at compile time; the home page fetches live data
//! from the JSON API.

use axum::response::{Html, IntoResponse, Response};
use axum::http::StatusCode;

const HOME_HTML: &str = include_str!("../ui/home.html");
const APP_JS: &str = include_str!("../ui/app.js");
const NEW_FREQUENCY_HTML: &str = include_str!("../ui/new_frequency.html");
const NEW_PHRASE_HTML: &str = include_str!("../ui/new_phrase.html");
const ABOUT_HTML: &str = include_str!("../ui/about.html");
const LOGIN_HTML: &str = include_str!("../ui/login.html");

/// GET /
pub async fn home() -> Html<&'static str> {
    Html(HOME_HTML)
}

/// GET /static/app.js
pub async fn app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /frequency/new
pub async fn new_frequency() -> Html<&'static str> {
    Html(NEW_FREQUENCY_HTML)
}

/// GET /phrase/new
pub async fn new_phrase() -> Html<&'static str> {
    Html(NEW_PHRASE_HTML)
}

/// GET /about
pub async fn about() -> Html<&'static str> {
    Html(ABOUT_HTML)
}

/// GET /login
///
/// Placeholder page; there is no authentication.
pub async fn login() -> Html<&'static str> {
    Html(LOGIN_HTML)
}
