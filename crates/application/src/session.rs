//! Session lifecycle.
//!
//! Login, extraction of the auth materials from the login response, and
//! checking whether the server still honors a session.

use std::sync::Arc;

use apiprobe_domain::{Credentials, ResponseSpec, Session, SessionStatus};
use tracing::{debug, info};

use crate::actions::UserApi;
use crate::error::{HarnessError, HarnessResult};
use crate::ports::{Clock, HttpClient};

/// Logs users in and keeps track of what a session is worth.
pub struct SessionManager<C> {
    api: UserApi<C>,
    clock: Arc<dyn Clock>,
}

impl<C: HttpClient> SessionManager<C> {
    /// Creates a manager that logs in through `api`.
    #[must_use]
    pub fn new(api: UserApi<C>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Logs in and extracts a complete session.
    ///
    /// # Errors
    ///
    /// - `UnexpectedStatus` if login does not answer 200
    /// - `Authentication` if the token, cookie or user id is missing
    /// - transport errors from the client
    pub async fn login(&self, credentials: &Credentials) -> HarnessResult<Session> {
        let response = self.api.login(credentials).await?;
        if response.status != 200 {
            return Err(HarnessError::unexpected_status(&response, [200]));
        }
        let session = self.extract(&response)?;
        info!(
            email = %credentials.email,
            user_id = session.user_id(),
            "logged in"
        );
        Ok(session)
    }

    /// Pulls the auth materials out of a login response.
    ///
    /// Every missing item is named; a partial session is never returned.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if anything is missing.
    pub fn extract(&self, response: &ResponseSpec) -> HarnessResult<Session> {
        let keys = &self.api.context().config().session_keys;

        let token = response.header(&keys.csrf_header);
        let cookie = response.cookies.get(&keys.session_cookie);
        let user_id = response.field_i64(&keys.user_id_field);

        let fail = |reason: String| HarnessError::Authentication {
            url: response.url.clone(),
            reason,
        };

        match (token, cookie, user_id) {
            (Some(token), Some(cookie), Some(user_id)) => {
                Ok(Session::new(token, &cookie.value, user_id).with_expiry(cookie.expires))
            }
            (_, None, None) => Err(fail(
                "response carries neither an auth cookie nor a user id".to_string(),
            )),
            (token, cookie, user_id) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(format!("header '{}'", keys.csrf_header));
                }
                if cookie.is_none() {
                    missing.push(format!("cookie '{}'", keys.session_cookie));
                }
                if user_id.is_none() {
                    missing.push(format!("field '{}'", keys.user_id_field));
                }
                Err(fail(format!(
                    "login response is missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Checks whether `session` is still honored.
    ///
    /// A session whose cookie has expired locally is reported without a
    /// request. Otherwise the auth-check endpoint decides: it echoes the
    /// session's user id while the session is valid and 0 once it is not.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedStatus` if the check does not answer 200.
    pub async fn verify(&self, session: &Session) -> HarnessResult<SessionStatus> {
        if session.is_expired_at(self.clock.now()) {
            debug!(user_id = session.user_id(), "session cookie expired");
            return Ok(SessionStatus::Expired);
        }

        let response = self.api.check_auth(Some(session)).await?;
        if response.status != 200 {
            return Err(HarnessError::unexpected_status(&response, [200]));
        }

        let field = &self.api.context().config().session_keys.user_id_field;
        let status = if response.field_i64(field) == Some(session.user_id()) {
            SessionStatus::Active
        } else {
            SessionStatus::Denied
        };
        debug!(user_id = session.user_id(), ?status, "session verified");
        Ok(status)
    }
}
