//! User resource actions.

use std::sync::Arc;

use apiprobe_domain::{
    AuthMaterials, Credentials, HarnessConfig, RegistrationPayload, RequestSpec, ResponseSpec,
    Session, UserUpdate,
};

use super::ApiContext;
use crate::error::HarnessResult;
use crate::ports::HttpClient;

const USER_PATH: &str = "/api/user/";
const LOGIN_PATH: &str = "/api/user/login";
const AUTH_PATH: &str = "/api/user/auth";

fn materials(session: Option<&Session>) -> AuthMaterials {
    session.map_or_else(AuthMaterials::none, Session::materials)
}

/// Actions on the `/api/user` resource.
pub struct UserApi<C> {
    ctx: ApiContext<C>,
}

impl<C> Clone for UserApi<C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
        }
    }
}

impl<C: HttpClient> UserApi<C> {
    /// Creates the action set over `client`.
    #[must_use]
    pub const fn new(client: Arc<C>, config: Arc<HarnessConfig>) -> Self {
        Self {
            ctx: ApiContext::new(client, config),
        }
    }

    /// Creates the action set from an existing context.
    #[must_use]
    pub const fn from_context(ctx: ApiContext<C>) -> Self {
        Self { ctx }
    }

    /// The shared context.
    #[must_use]
    pub const fn context(&self) -> &ApiContext<C> {
        &self.ctx
    }

    fn user_url(&self, id: i64) -> HarnessResult<String> {
        self.ctx.url(&format!("{USER_PATH}{id}"))
    }

    /// `POST /api/user/` without auth.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn register(&self, payload: &RegistrationPayload) -> HarnessResult<ResponseSpec> {
        let request = RequestSpec::post(self.ctx.url(USER_PATH)?)
            .with_body(self.ctx.payload(payload.form_fields()));
        self.ctx.send(request).await
    }

    /// `POST /api/user/login` without auth.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn login(&self, credentials: &Credentials) -> HarnessResult<ResponseSpec> {
        let fields = vec![
            ("email".to_string(), credentials.email.clone()),
            ("password".to_string(), credentials.password.clone()),
        ];
        let request =
            RequestSpec::post(self.ctx.url(LOGIN_PATH)?).with_body(self.ctx.payload(fields));
        self.ctx.send(request).await
    }

    /// `GET /api/user/{id}`, authenticated when a session is given.
    ///
    /// Without a session the server only returns `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get_user(&self, id: i64, session: Option<&Session>) -> HarnessResult<ResponseSpec> {
        self.get_user_with(id, &materials(session)).await
    }

    /// `GET /api/user/{id}` without auth.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get_user_unauthenticated(&self, id: i64) -> HarnessResult<ResponseSpec> {
        self.get_user_with(id, &AuthMaterials::none()).await
    }

    /// `GET /api/user/{id}` with raw auth materials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn get_user_with(
        &self,
        id: i64,
        materials: &AuthMaterials,
    ) -> HarnessResult<ResponseSpec> {
        let request = self
            .ctx
            .authorize(RequestSpec::get(self.user_url(id)?), materials);
        self.ctx.send(request).await
    }

    /// `PUT /api/user/{id}` with the changed fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn edit_user(
        &self,
        id: i64,
        update: &UserUpdate,
        session: Option<&Session>,
    ) -> HarnessResult<ResponseSpec> {
        self.edit_user_with(id, update, &materials(session)).await
    }

    /// `PUT /api/user/{id}` with raw auth materials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn edit_user_with(
        &self,
        id: i64,
        update: &UserUpdate,
        materials: &AuthMaterials,
    ) -> HarnessResult<ResponseSpec> {
        let request = RequestSpec::put(self.user_url(id)?)
            .with_body(self.ctx.payload(update.form_fields()));
        let request = self.ctx.authorize(request, materials);
        self.ctx.send(request).await
    }

    /// `DELETE /api/user/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn delete_user(
        &self,
        id: i64,
        session: Option<&Session>,
    ) -> HarnessResult<ResponseSpec> {
        self.delete_user_with(id, &materials(session)).await
    }

    /// `DELETE /api/user/{id}` with raw auth materials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn delete_user_with(
        &self,
        id: i64,
        materials: &AuthMaterials,
    ) -> HarnessResult<ResponseSpec> {
        let request = self
            .ctx
            .authorize(RequestSpec::delete(self.user_url(id)?), materials);
        self.ctx.send(request).await
    }

    /// `GET /api/user/auth`; echoes the user id the session belongs to, or 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn check_auth(&self, session: Option<&Session>) -> HarnessResult<ResponseSpec> {
        self.check_auth_with(&materials(session)).await
    }

    /// `GET /api/user/auth` with raw auth materials.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent.
    pub async fn check_auth_with(&self, materials: &AuthMaterials) -> HarnessResult<ResponseSpec> {
        let request = self
            .ctx
            .authorize(RequestSpec::get(self.ctx.url(AUTH_PATH)?), materials);
        self.ctx.send(request).await
    }
}
