//! Common test utilities for integration tests.
//!
//! The app is exercised in-process against [`MockBackend`], an in-memory
//! stand-in for the REST backend that records every call it receives.

// Allow dead code in this module - these are helper utilities that may not be used
// by all integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use domain::models::{
    ImportResult, Invitation, InvitationListItem, InvitationPayload, InvitationStatus,
    LoginRequest, RsvpStatus, RsvpSubmission, ScheduleEntry, Template,
    TemplatePayload, TokenResponse, ValidImport,
};
use invitation_portal_api::{
    app::create_app,
    config::{
        BackendConfig, Config, CookieConfig, DisplayConfig, LoggingConfig, MapsConfig,
        SecurityConfig, ServerConfig,
    },
    services::{BackendError, InvitationBackend, MixedContentPolicy, ResponseReceipt},
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceExt;
use uuid::Uuid;

/// Token the mock accepts for admin calls.
pub const ADMIN_TOKEN: &str = "test-token";

/// Cookie header carrying [`ADMIN_TOKEN`].
pub const ADMIN_COOKIE: &str = "admin_token=test-token";

pub const INVITATION_ID: &str = "0f8b7a62-1c8e-4b8e-9d0b-6f3f2a1e9c44";

/// Recorded state of the mock backend.
#[derive(Debug, Default)]
pub struct MockState {
    /// Applied to every call when set.
    pub failure: Option<BackendError>,
    /// Applied only to the RSVP submission endpoint when set.
    pub submit_failure: Option<BackendError>,
    pub credentials: Option<(String, String)>,
    pub templates: Vec<Template>,
    pub invitations: Vec<InvitationListItem>,
    pub public: Vec<Invitation>,
    pub import_result: ImportResult,
    /// Set-Cookie values returned with a successful RSVP.
    pub response_cookies: Vec<String>,

    pub login_attempts: Vec<LoginRequest>,
    pub bearer_tokens: Vec<String>,
    pub created_templates: Vec<TemplatePayload>,
    pub updated_templates: Vec<(Uuid, TemplatePayload)>,
    pub deleted_templates: Vec<Uuid>,
    pub created_invitations: Vec<InvitationPayload>,
    pub deleted_invitations: Vec<Uuid>,
    pub imports: Vec<(String, InvitationStatus, String)>,
    pub submissions: Vec<(String, RsvpSubmission, Option<String>)>,
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn check(&self) -> Result<(), BackendError> {
        match &self.state().failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn authorize(&self, token: &str) -> Result<(), BackendError> {
        self.check()?;
        self.state().bearer_tokens.push(token.to_string());
        if token == ADMIN_TOKEN {
            Ok(())
        } else {
            Err(status_error(401, Some("Not authenticated")))
        }
    }
}

pub fn status_error(status: u16, detail: Option<&str>) -> BackendError {
    BackendError::Status {
        status,
        detail: detail.map(str::to_string),
    }
}

#[async_trait::async_trait]
impl InvitationBackend for MockBackend {
    async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, BackendError> {
        self.check()?;
        let mut state = self.state();
        state.login_attempts.push(credentials.clone());
        match &state.credentials {
            Some((username, password))
                if *username == credentials.username && *password == credentials.password =>
            {
                Ok(TokenResponse {
                    access_token: ADMIN_TOKEN.to_string(),
                    token_type: Some("bearer".to_string()),
                })
            }
            _ => Err(status_error(401, Some("Incorrect username or password"))),
        }
    }

    async fn list_templates(&self, token: &str) -> Result<Vec<Template>, BackendError> {
        self.authorize(token)?;
        Ok(self.state().templates.clone())
    }

    async fn get_template(&self, token: &str, id: Uuid) -> Result<Template, BackendError> {
        self.authorize(token)?;
        self.state()
            .templates
            .iter()
            .find(|template| template.id == id)
            .cloned()
            .ok_or_else(|| status_error(404, Some("Template not found")))
    }

    async fn create_template(
        &self,
        token: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError> {
        self.authorize(token)?;
        let template = template_from_payload(Uuid::new_v4(), payload);
        let mut state = self.state();
        state.created_templates.push(payload.clone());
        state.templates.push(template.clone());
        Ok(template)
    }

    async fn update_template(
        &self,
        token: &str,
        id: Uuid,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError> {
        self.authorize(token)?;
        let template = template_from_payload(id, payload);
        self.state().updated_templates.push((id, payload.clone()));
        Ok(template)
    }

    async fn delete_template(&self, token: &str, id: Uuid) -> Result<(), BackendError> {
        self.authorize(token)?;
        let mut state = self.state();
        state.deleted_templates.push(id);
        state.templates.retain(|template| template.id != id);
        Ok(())
    }

    async fn list_invitations(
        &self,
        token: &str,
    ) -> Result<Vec<InvitationListItem>, BackendError> {
        self.authorize(token)?;
        Ok(self.state().invitations.clone())
    }

    async fn create_invitation(
        &self,
        token: &str,
        payload: &InvitationPayload,
    ) -> Result<Invitation, BackendError> {
        self.authorize(token)?;
        self.state().created_invitations.push(payload.clone());
        let mut invitation = sample_invitation("new-slug");
        invitation.id = Uuid::new_v4();
        invitation.title = payload.title.clone();
        invitation.status = payload.status;
        Ok(invitation)
    }

    async fn delete_invitation(&self, token: &str, id: Uuid) -> Result<(), BackendError> {
        self.authorize(token)?;
        self.state().deleted_invitations.push(id);
        Ok(())
    }

    async fn import_invitations(
        &self,
        token: &str,
        upload: &ValidImport,
    ) -> Result<ImportResult, BackendError> {
        self.authorize(token)?;
        let mut state = self.state();
        state.imports.push((
            upload.template_id.clone(),
            upload.status,
            upload.file.file_name.clone(),
        ));
        Ok(state.import_result.clone())
    }

    async fn get_public_invitation(&self, slug: &str) -> Result<Option<Invitation>, BackendError> {
        self.check()?;
        Ok(self
            .state()
            .public
            .iter()
            .find(|invitation| invitation.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn submit_response(
        &self,
        slug: &str,
        submission: &RsvpSubmission,
        cookie_header: Option<&str>,
    ) -> Result<ResponseReceipt, BackendError> {
        self.check()?;
        let mut state = self.state();
        state.submissions.push((
            slug.to_string(),
            submission.clone(),
            cookie_header.map(str::to_string),
        ));
        if let Some(error) = &state.submit_failure {
            return Err(error.clone());
        }

        Ok(ResponseReceipt {
            set_cookies: state.response_cookies.clone(),
        })
    }
}

fn template_from_payload(id: Uuid, payload: &TemplatePayload) -> Template {
    Template {
        id,
        name: payload.name.clone(),
        company_name: payload.company_name.clone(),
        title: payload.title.clone(),
        content: payload.content.clone(),
        event_time: payload.event_time.clone(),
        event_location: payload.event_location.clone(),
        google_map_url: payload.google_map_url.clone(),
        schedule: payload.schedule.clone(),
        created_at: None,
        updated_at: None,
    }
}

/// Published invitation for "Bùi Hiếu" with no recorded response.
pub fn sample_invitation(slug: &str) -> Invitation {
    Invitation {
        id: Uuid::parse_str(INVITATION_ID).unwrap(),
        slug: Some(slug.to_string()),
        status: InvitationStatus::Published,
        rsvp_status: Some(RsvpStatus::Pending),
        attendee_count: None,
        created_at: Some("2025-11-01T08:00:00".to_string()),
        title: "Year End Party".to_string(),
        company_name: "GTE".to_string(),
        recipient_salutation: None,
        recipient_name: "Bùi Hiếu".to_string(),
        recipient_title: "Giám đốc".to_string(),
        content: "Welcome".to_string(),
        event_time: "2025-12-20T12:00:00Z".to_string(),
        event_location: "Hà Nội".to_string(),
        google_map_url: None,
        schedule: Some(vec![
            ScheduleEntry::new("18:00", "Đón khách"),
            ScheduleEntry::new("19:00", "Khai mạc"),
        ]),
    }
}

pub fn sample_template(name: &str) -> Template {
    Template {
        id: Uuid::new_v4(),
        name: name.to_string(),
        company_name: "GTE".to_string(),
        title: format!("{} title", name),
        content: "Join us".to_string(),
        event_time: Some("2025-12-20T12:00:00Z".to_string()),
        event_location: Some("Hà Nội".to_string()),
        google_map_url: None,
        schedule: Some(vec![ScheduleEntry::new("18:00", "Đón khách")]),
        created_at: None,
        updated_at: Some("2025-11-02T09:30:00".to_string()),
    }
}

pub fn list_item(title: &str, rsvp: RsvpStatus, responses: Option<u32>) -> InvitationListItem {
    let mut invitation = sample_invitation(&title.to_lowercase().replace(' ', "-"));
    invitation.id = Uuid::new_v4();
    invitation.title = title.to_string();
    invitation.rsvp_status = Some(rsvp);
    InvitationListItem {
        invitation,
        responses,
        attending: 0,
        attending_people: 0,
        declined: 0,
    }
}

/// Test configuration with a fixed backend and UTC+7 display zone.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        backend: BackendConfig {
            base_url: "http://api.test".to_string(),
            mixed_content_policy: MixedContentPolicy::SameOrigin,
        },
        maps: MapsConfig::default(),
        cookies: CookieConfig::default(),
        display: DisplayConfig::default(),
    }
}

/// Create a test application router backed by `backend`.
pub fn create_test_app(backend: Arc<MockBackend>) -> Router {
    create_app(test_config(), backend).expect("Failed to build test app")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// URL-encoded form POST. `fields` are encoded in order.
pub fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// A multipart part: name, optional file name and content.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn post_multipart(uri: &str, parts: &[Part<'_>], cookie: Option<&str>) -> Request<Body> {
    const BOUNDARY: &str = "----invitation-portal-test";
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Text as it appears after HTML escaping.
pub fn escaped(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2F;")
}

fn encode(raw: &str) -> String {
    let mut out = String::new();
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
