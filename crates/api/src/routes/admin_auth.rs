//! Admin login and logout.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use domain::models::LoginRequest;
use persistence::{AdminTokenStore, CookieJarStore, Lifetime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::AppError;
use crate::extractors::{AdminToken, LOGIN_PATH};

/// Where a successful login lands.
pub const ADMIN_HOME: &str = "/admin/invitations";

const LOGIN_FAILED_MESSAGE: &str = "Sai tài khoản hoặc mật khẩu";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginPage<'a> {
    page_title: &'static str,
    username: &'a str,
    error: Option<String>,
}

/// GET /admin/login
pub async fn login_page(
    State(state): State<AppState>,
    token: Option<AdminToken>,
) -> Result<Response, AppError> {
    if token.is_some() {
        return Ok(Redirect::to(ADMIN_HOME).into_response());
    }
    render_login(&state, "", None)
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let credentials = LoginRequest {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    if credentials.validate().is_err() {
        return render_login(
            &state,
            &credentials.username,
            Some(LOGIN_FAILED_MESSAGE.to_string()),
        );
    }

    let token = match state.backend.login(&credentials).await {
        Ok(token) => token,
        Err(e) => {
            warn!(username = %credentials.username, error = %e, "Admin login failed");
            return render_login(
                &state,
                &credentials.username,
                Some(e.static_message(LOGIN_FAILED_MESSAGE)),
            );
        }
    };

    let mut tokens = AdminTokenStore::new(cookie_store(&headers));
    if let Err(e) = tokens.set(&token.access_token) {
        warn!(error = %e, "Backend returned a token that cannot be stored");
        return render_login(
            &state,
            &credentials.username,
            Some(LOGIN_FAILED_MESSAGE.to_string()),
        );
    }
    info!(username = %credentials.username, "Admin logged in");

    let mut response = Redirect::to(ADMIN_HOME).into_response();
    state
        .cookies
        .add_pending(response.headers_mut(), tokens.into_inner().pending());
    Ok(response)
}

/// POST /admin/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut tokens = AdminTokenStore::new(cookie_store(&headers));
    if let Err(e) = tokens.clear() {
        warn!(error = %e, "Failed to clear admin token");
    }

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    state
        .cookies
        .add_pending(response.headers_mut(), tokens.into_inner().pending());
    response
}

/// GET /admin
pub async fn admin_index() -> Redirect {
    Redirect::to(ADMIN_HOME)
}

fn cookie_store(headers: &HeaderMap) -> CookieJarStore {
    let header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    CookieJarStore::from_header(header, Lifetime::Durable)
}

fn render_login(
    state: &AppState,
    username: &str,
    error: Option<String>,
) -> Result<Response, AppError> {
    let page = LoginPage {
        page_title: "Đăng nhập",
        username,
        error,
    };
    Ok(state.views.render("admin/login.html", &page)?.into_response())
}
