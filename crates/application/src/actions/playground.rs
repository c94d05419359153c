//! Diagnostic endpoints of the playground API.

use std::sync::Arc;

use apiprobe_domain::{
    Credentials, HarnessConfig, Headers, HttpMethod, JsonHomework, RequestBody, RequestSpec,
    ResponseSpec, UserAgentVerdict,
};

use super::ApiContext;
use crate::error::{HarnessError, HarnessResult};
use crate::ports::HttpClient;

/// Cookie set by the auth-cookie endpoint.
pub const AUTH_COOKIE: &str = "auth_cookie";

/// Endpoints that exercise individual HTTP features rather than the user
/// resource.
pub struct PlaygroundApi<C> {
    ctx: ApiContext<C>,
}

impl<C> Clone for PlaygroundApi<C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
        }
    }
}

impl<C: HttpClient> PlaygroundApi<C> {
    /// Creates the action set over `client`.
    #[must_use]
    pub const fn new(client: Arc<C>, config: Arc<HarnessConfig>) -> Self {
        Self {
            ctx: ApiContext::new(client, config),
        }
    }

    /// `GET /api/hello`; answers `Hello, <name>` or `Hello, someone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn hello(&self, name: Option<&str>) -> HarnessResult<ResponseSpec> {
        let mut request = RequestSpec::get(self.ctx.url("/api/hello")?);
        if let Some(name) = name {
            request = request.with_query("name", name);
        }
        self.ctx.send(request).await
    }

    /// `GET /api/get_text`; plain-text body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get_text(&self) -> HarnessResult<ResponseSpec> {
        self.get("/api/get_text").await
    }

    /// `/api/check_type` with `method`; the server echoes how it received
    /// the params.
    ///
    /// GET sends the params in the query string, other methods in a form body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn check_type(
        &self,
        method: HttpMethod,
        params: &[(&str, &str)],
    ) -> HarnessResult<ResponseSpec> {
        let url = self.ctx.url("/api/check_type")?;
        let mut request = RequestSpec::new(method, url);
        if method.has_body() {
            request = request.with_body(RequestBody::form(params.iter().copied()));
        } else {
            for (key, value) in params {
                request = request.with_query(*key, *value);
            }
        }
        self.ctx.send(request).await
    }

    /// `GET` an arbitrary endpoint path, following redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get(&self, path: &str) -> HarnessResult<ResponseSpec> {
        self.ctx.send(RequestSpec::get(self.ctx.url(path)?)).await
    }

    /// `GET` an arbitrary endpoint path, returning the first 3xx as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get_no_redirect(&self, path: &str) -> HarnessResult<ResponseSpec> {
        self.ctx
            .send(RequestSpec::get(self.ctx.url(path)?).without_redirects())
            .await
    }

    /// `GET /api/show_all_headers` with extra headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn show_all_headers(&self, headers: &Headers) -> HarnessResult<ResponseSpec> {
        let mut request = RequestSpec::get(self.ctx.url("/api/show_all_headers")?);
        for header in headers.iter() {
            request = request.with_header(&header.name, &header.value);
        }
        self.ctx.send(request).await
    }

    /// `POST /api/get_auth_cookie`; sets [`AUTH_COOKIE`] on valid credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get_auth_cookie(&self, credentials: &Credentials) -> HarnessResult<ResponseSpec> {
        let request = RequestSpec::post(self.ctx.url("/api/get_auth_cookie")?).with_body(
            RequestBody::form([
                ("login", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ]),
        );
        self.ctx.send(request).await
    }

    /// `POST /api/check_auth_cookie`, optionally presenting [`AUTH_COOKIE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn check_auth_cookie(&self, cookie: Option<&str>) -> HarnessResult<ResponseSpec> {
        let mut request = RequestSpec::post(self.ctx.url("/api/check_auth_cookie")?);
        if let Some(value) = cookie {
            request = request.with_cookie(AUTH_COOKIE, value);
        }
        self.ctx.send(request).await
    }

    /// `GET /api/homework_cookie`; sets the `HomeWork` cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn homework_cookie(&self) -> HarnessResult<ResponseSpec> {
        self.get("/api/homework_cookie").await
    }

    /// `GET /api/homework_header`; sets `x-secret-homework-header`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn homework_header(&self) -> HarnessResult<ResponseSpec> {
        self.get("/api/homework_header").await
    }

    /// `GET /api/get_json_homework`, decoded.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-200 status or a body without `messages`.
    pub async fn json_homework(&self) -> HarnessResult<JsonHomework> {
        let response = self.get("/api/get_json_homework").await?;
        if response.status != 200 {
            return Err(HarnessError::unexpected_status(&response, [200]));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| HarnessError::protocol(&response.url, format!("bad homework body: {e}")))
    }

    /// `POST /ajax/api/user_agent_check` with `agent` as the `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-200 status or when a verdict field is
    /// missing.
    pub async fn user_agent_check(&self, agent: &str) -> HarnessResult<UserAgentVerdict> {
        let request = RequestSpec::post(self.ctx.url("/ajax/api/user_agent_check")?)
            .with_header("User-Agent", agent);
        let response = self.ctx.send(request).await?;
        if response.status != 200 {
            return Err(HarnessError::unexpected_status(&response, [200]));
        }

        let field = |name: &str| {
            response.field_str(name).map(str::to_string).ok_or_else(|| {
                HarnessError::protocol(&response.url, format!("verdict lacks '{name}'"))
            })
        };
        Ok(UserAgentVerdict {
            platform: field("platform")?,
            browser: field("browser")?,
            device: field("device")?,
        })
    }
}
