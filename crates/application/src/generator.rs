//! Randomized test data.
//!
//! Every generated account is unique: the email embeds a timestamp and a
//! random suffix, the username reuses the suffix. Fixed values match the
//! ones the remote API's fixture users carry.

use std::sync::Arc;

use apiprobe_domain::{Credentials, Overrides, RegistrationPayload};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::Clock;

/// Prefix shared by generated emails and usernames.
pub const ACCOUNT_PREFIX: &str = "learnqa";

/// Domain of generated emails.
pub const EMAIL_DOMAIN: &str = "example.com";

/// Password of generated accounts.
pub const DEFAULT_PASSWORD: &str = "123";

/// First and last name of generated accounts.
pub const DEFAULT_NAME: &str = "learnqa";

/// Shortest username the remote API accepts.
pub const MIN_USERNAME_LEN: usize = 2;

/// Longest username the remote API accepts.
pub const MAX_USERNAME_LEN: usize = 250;

const SUFFIX_LEN: usize = 8;

/// Produces registration payloads and random strings.
pub struct DataGenerator {
    rng: StdRng,
    clock: Arc<dyn Clock>,
}

impl DataGenerator {
    /// Creates a generator seeded from the OS.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            clock,
        }
    }

    /// Creates a generator with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock,
        }
    }

    /// Generates a full payload, then applies `overrides`.
    pub fn generate(&mut self, overrides: &Overrides) -> RegistrationPayload {
        let suffix = self.random_string(SUFFIX_LEN);
        let stamp = self.clock.now().format("%Y%m%d%H%M%S");

        let mut payload = RegistrationPayload {
            email: Some(format!("{ACCOUNT_PREFIX}{stamp}{suffix}@{EMAIL_DOMAIN}")),
            password: Some(DEFAULT_PASSWORD.to_string()),
            username: Some(format!("{ACCOUNT_PREFIX}{suffix}")),
            first_name: Some(DEFAULT_NAME.to_string()),
            last_name: Some(DEFAULT_NAME.to_string()),
        };
        overrides.apply(&mut payload);
        payload
    }

    /// Generates a unique, well-formed email address.
    pub fn email(&mut self) -> String {
        let suffix = self.random_string(SUFFIX_LEN);
        let stamp = self.clock.now().format("%Y%m%d%H%M%S");
        format!("{ACCOUNT_PREFIX}{stamp}{suffix}@{EMAIL_DOMAIN}")
    }

    /// Generates an address with the `@` left out.
    pub fn email_without_at(&mut self) -> String {
        self.email().replace('@', "")
    }

    /// Random lowercase alphanumerics of exactly `len` characters.
    pub fn random_string(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }

    /// Extracts login credentials from a generated payload.
    #[must_use]
    pub fn credentials(payload: &RegistrationPayload) -> Option<Credentials> {
        payload.credentials()
    }
}
