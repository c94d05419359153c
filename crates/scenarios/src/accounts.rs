//! Accounts that exist on the playground server.

use std::ops::RangeInclusive;

use apiprobe_domain::Credentials;

/// A long-lived account the server keeps between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAccount {
    /// Server-assigned id.
    pub id: i64,
    /// Login email.
    pub email: &'static str,
    /// Login password.
    pub password: &'static str,
}

impl FixedAccount {
    /// Login credentials of the account.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email, self.password)
    }
}

/// The server's built-in test user.
pub const VINKOTOV: FixedAccount = FixedAccount {
    id: 2,
    email: "vinkotov@example.com",
    password: "1234",
};

/// Registered fixture user, used as the target of foreign edits.
pub const FIXTURE_A: FixedAccount = FixedAccount {
    id: 46754,
    email: "learnqa20221020170727@example.com",
    password: "123",
};

/// Registered fixture user, used as the actor of foreign edits.
pub const FIXTURE_B: FixedAccount = FixedAccount {
    id: 46793,
    email: "learnqa20221020183521@example.com",
    password: "123",
};

/// Registered fixture user for validation failures on edit.
pub const FIXTURE_C: FixedAccount = FixedAccount {
    id: 46755,
    email: "learnqa20221020173228@example.com",
    password: "123",
};

/// Ids the server refuses to delete.
pub const PROTECTED_IDS: RangeInclusive<i64> = 1..=5;

/// Returns true if the server refuses to delete `id`.
#[must_use]
pub fn is_protected(id: i64) -> bool {
    PROTECTED_IDS.contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_ids() {
        assert!(is_protected(VINKOTOV.id));
        assert!(is_protected(1));
        assert!(!is_protected(0));
        assert!(!is_protected(6));
        assert!(!is_protected(FIXTURE_A.id));
    }

    #[test]
    fn test_credentials() {
        let credentials = VINKOTOV.credentials();
        assert_eq!(credentials.email, "vinkotov@example.com");
        assert_eq!(credentials.password, "1234");
    }
}
