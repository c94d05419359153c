//! Per-scenario fixture.
//!
//! A [`Harness`] owns one client, one configuration and one data generator.
//! Scenarios create their own and never share it, so there is no state
//! between them.

use std::sync::Arc;

use apiprobe_application::generator::DEFAULT_PASSWORD;
use apiprobe_application::{
    DataGenerator, HarnessError, HarnessResult, HttpClient, JobPoller, PlaygroundApi,
    RedirectFollower, SessionManager, UserApi,
};
use apiprobe_domain::{
    Credentials, HarnessConfig, Overrides, RegistrationField, RegistrationPayload, Session,
    generate_scenario_id,
};
use apiprobe_infrastructure::{
    ReqwestHttpClient, SystemClock, assert_status, init_tracing, load_config,
};
use tracing::info;

/// Fields the server reveals to a user's own session.
pub const PROFILE_FIELDS: [&str; 4] = ["username", "firstName", "lastName", "email"];

/// A user's profile as `(field, value)` pairs in [`PROFILE_FIELDS`] order.
pub type Profile = Vec<(&'static str, Option<String>)>;

/// A user created by [`Harness::register_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Id the server assigned.
    pub id: i64,
    /// Payload the user was registered with.
    pub payload: RegistrationPayload,
}

impl RegisteredUser {
    /// Login credentials, when the payload carried both email and password.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        DataGenerator::credentials(&self.payload)
    }
}

/// Everything one scenario needs to talk to the API.
pub struct Harness<C = ReqwestHttpClient> {
    id: String,
    config: Arc<HarnessConfig>,
    /// User resource actions.
    pub users: UserApi<C>,
    /// Diagnostic endpoints.
    pub playground: PlaygroundApi<C>,
    /// Login and session checks.
    pub sessions: SessionManager<C>,
    /// Long-running job controller.
    pub jobs: JobPoller<C>,
    /// Redirect-chain traversal.
    pub redirects: RedirectFollower<C>,
    /// Registration data.
    pub data: DataGenerator,
}

impl Harness<ReqwestHttpClient> {
    /// Builds a harness against the configured server.
    ///
    /// Initializes tracing, loads `apiprobe.toml` and `APIPROBE_*` variables
    /// and creates the reqwest client.
    ///
    /// # Errors
    ///
    /// Returns `Config` for invalid configuration and `Transport` if the
    /// client cannot be built.
    pub fn from_env() -> HarnessResult<Self> {
        init_tracing();
        let config = load_config()?;
        Self::with_reqwest(config)
    }

    /// Builds a harness with a reqwest client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the client cannot be built.
    pub fn with_reqwest(config: HarnessConfig) -> HarnessResult<Self> {
        let client = ReqwestHttpClient::new(&config)?;
        Ok(Self::with_client(Arc::new(client), config))
    }
}

impl<C: HttpClient> Harness<C> {
    /// Builds a harness over an arbitrary client.
    #[must_use]
    pub fn with_client(client: Arc<C>, config: HarnessConfig) -> Self {
        let id = generate_scenario_id();
        let config = Arc::new(config);
        let clock = Arc::new(SystemClock);
        let users = UserApi::new(Arc::clone(&client), Arc::clone(&config));
        let harness = Self {
            sessions: SessionManager::new(users.clone(), clock.clone()),
            playground: PlaygroundApi::new(Arc::clone(&client), Arc::clone(&config)),
            jobs: JobPoller::new(Arc::clone(&client), Arc::clone(&config)),
            redirects: RedirectFollower::new(client, Arc::clone(&config)),
            data: DataGenerator::new(clock),
            users,
            id,
            config,
        };
        info!(scenario = %harness.id, base_url = %harness.config.base_url, "harness ready");
        harness
    }

    /// Id of this scenario, as it appears in logs.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Configuration shared by every component.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Registers a fresh user from generated data with `overrides` applied.
    ///
    /// # Errors
    ///
    /// - `Assertion` if registration does not answer 200
    /// - `ProtocolViolation` if the response carries no `id`
    pub async fn register_user(&mut self, overrides: &Overrides) -> HarnessResult<RegisteredUser> {
        let payload = self.data.generate(overrides);
        let response = self.users.register(&payload).await?;
        assert_status(&response, 200)?;

        let id = response
            .field_i64("id")
            .ok_or_else(|| HarnessError::protocol(&response.url, "registration lacks 'id'"))?;
        info!(scenario = %self.id, user_id = id, "user registered");
        Ok(RegisteredUser { id, payload })
    }

    /// Registers a fresh user and logs in as it.
    ///
    /// # Errors
    ///
    /// Propagates registration and login failures.
    pub async fn register_and_login(&mut self) -> HarnessResult<(RegisteredUser, Session)> {
        let credentials = Credentials::new(self.data.email(), DEFAULT_PASSWORD);
        let overrides = Overrides::new()
            .set(RegistrationField::Email, &credentials.email)
            .set(RegistrationField::Password, &credentials.password);
        let user = self.register_user(&overrides).await?;
        let session = self.sessions.login(&credentials).await?;
        Ok((user, session))
    }

    /// Reads the profile of the session's own user.
    ///
    /// # Errors
    ///
    /// Returns `Assertion` if the lookup does not answer 200.
    pub async fn profile(&self, session: &Session) -> HarnessResult<Profile> {
        let response = self
            .users
            .get_user(session.user_id(), Some(session))
            .await?;
        assert_status(&response, 200)?;
        Ok(PROFILE_FIELDS
            .iter()
            .map(|name| (*name, response.field_str(name).map(str::to_string)))
            .collect())
    }
}
