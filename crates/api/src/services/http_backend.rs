//! reqwest implementation of [`InvitationBackend`].
//!
//! No retries, timeouts or caching are applied; a failed call is reported to
//! the page that made it.

use domain::models::{
    ImportResult, Invitation, InvitationListItem, InvitationPayload, LoginRequest,
    RsvpSubmission, Template, TemplatePayload, TokenResponse, ValidImport,
};
use reqwest::{header, multipart, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::api_base::ApiBase;
use super::backend::{BackendCallTimer, BackendError, InvitationBackend, ResponseReceipt};

/// HTTP client for the external REST backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: ApiBase,
}

impl HttpBackend {
    pub fn new(base: ApiBase) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(concat!("invitation-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Connect(e.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        self.base.url(path)
    }

    /// `/api/invitations/{slug}` followed by `tail`, with the guest slug kept
    /// as a single path segment.
    fn public_invitation_url(&self, slug: &str, tail: &[&str]) -> Result<Url, BackendError> {
        if matches!(slug, "" | "." | "..") {
            return Err(BackendError::Status {
                status: 404,
                detail: None,
            });
        }
        let mut url = Url::parse(&self.url("/api/invitations"))
            .map_err(|e| BackendError::Connect(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Connect("backend base URL has no path".to_string()))?
            .pop_if_empty()
            .push(slug)
            .extend(tail);
        Ok(url)
    }

    /// Sends a request and maps non-success statuses to [`BackendError`].
    async fn execute(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, BackendError> {
        let timer = BackendCallTimer::new(endpoint);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                timer.finish(false);
                warn!(endpoint = endpoint, error = %e, "Backend request failed");
                return Err(BackendError::Connect(e.to_string()));
            }
        };

        let status = response.status();
        timer.finish(status.is_success());
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = parse_detail(&body);
        debug!(
            endpoint = endpoint,
            status = status.as_u16(),
            detail = ?detail,
            "Backend rejected request"
        );
        Err(BackendError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = self.execute(endpoint, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Extracts a string `detail` from a JSON error body.
pub fn parse_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}

#[async_trait::async_trait]
impl InvitationBackend for HttpBackend {
    async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, BackendError> {
        let request = self
            .client
            .post(self.url("/api/auth/login"))
            .form(credentials);
        self.execute_json("login", request).await
    }

    async fn list_templates(&self, token: &str) -> Result<Vec<Template>, BackendError> {
        let request = self
            .client
            .get(self.url("/api/templates/"))
            .bearer_auth(token);
        self.execute_json("list_templates", request).await
    }

    async fn get_template(&self, token: &str, id: Uuid) -> Result<Template, BackendError> {
        let request = self
            .client
            .get(self.url(&format!("/api/templates/{}", id)))
            .bearer_auth(token);
        self.execute_json("get_template", request).await
    }

    async fn create_template(
        &self,
        token: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError> {
        let request = self
            .client
            .post(self.url("/api/templates/"))
            .bearer_auth(token)
            .json(payload);
        self.execute_json("create_template", request).await
    }

    async fn update_template(
        &self,
        token: &str,
        id: Uuid,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError> {
        let request = self
            .client
            .put(self.url(&format!("/api/templates/{}", id)))
            .bearer_auth(token)
            .json(payload);
        self.execute_json("update_template", request).await
    }

    async fn delete_template(&self, token: &str, id: Uuid) -> Result<(), BackendError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/templates/{}", id)))
            .bearer_auth(token);
        self.execute("delete_template", request).await.map(|_| ())
    }

    async fn list_invitations(
        &self,
        token: &str,
    ) -> Result<Vec<InvitationListItem>, BackendError> {
        let request = self
            .client
            .get(self.url("/api/invitations/"))
            .bearer_auth(token);
        self.execute_json("list_invitations", request).await
    }

    async fn create_invitation(
        &self,
        token: &str,
        payload: &InvitationPayload,
    ) -> Result<Invitation, BackendError> {
        let request = self
            .client
            .post(self.url("/api/invitations/"))
            .bearer_auth(token)
            .json(payload);
        self.execute_json("create_invitation", request).await
    }

    async fn delete_invitation(&self, token: &str, id: Uuid) -> Result<(), BackendError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/invitations/{}", id)))
            .bearer_auth(token);
        self.execute("delete_invitation", request).await.map(|_| ())
    }

    async fn import_invitations(
        &self,
        token: &str,
        upload: &ValidImport,
    ) -> Result<ImportResult, BackendError> {
        let mut file = multipart::Part::bytes(upload.file.bytes.clone())
            .file_name(upload.file.file_name.clone());
        if let Some(content_type) = upload.file.content_type.as_deref() {
            file = file
                .mime_str(content_type)
                .map_err(|e| BackendError::Decode(e.to_string()))?;
        }
        let form = multipart::Form::new()
            .text("template_id", upload.template_id.clone())
            .text("status_value", upload.status.as_str())
            .part("file", file);

        let request = self
            .client
            .post(self.url("/api/invitations/import"))
            .bearer_auth(token)
            .multipart(form);
        self.execute_json("import_invitations", request).await
    }

    async fn get_public_invitation(&self, slug: &str) -> Result<Option<Invitation>, BackendError> {
        let url = match self.public_invitation_url(slug, &[]) {
            Ok(url) => url,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        match self
            .execute_json::<Invitation>("get_public_invitation", self.client.get(url))
            .await
        {
            Ok(invitation) => Ok(Some(invitation)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn submit_response(
        &self,
        slug: &str,
        submission: &RsvpSubmission,
        cookie_header: Option<&str>,
    ) -> Result<ResponseReceipt, BackendError> {
        let url = self.public_invitation_url(slug, &["response"])?;
        let mut request = self.client.post(url).json(submission);
        if let Some(cookies) = cookie_header {
            request = request.header(header::COOKIE, cookies);
        }

        let response = self.execute("submit_response", request).await?;
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        Ok(ResponseReceipt { set_cookies })
    }
}
