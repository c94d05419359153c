//! Response texts the remote API answers with, asserted verbatim.

/// Registration or edit with an email lacking `@`.
pub const INVALID_EMAIL: &str = "Invalid email format";

/// Registration with a one-character username.
pub const USERNAME_TOO_SHORT: &str = "The value of 'username' field is too short";

/// Registration with a username over 250 characters.
pub const USERNAME_TOO_LONG: &str = "The value of 'username' field is too long";

/// Edit or delete without auth materials.
pub const AUTH_TOKEN_NOT_SUPPLIED: &str = "Auth token not supplied";

/// Lookup of a deleted or unknown user.
pub const USER_NOT_FOUND: &str = "User not found";

/// Delete of a protected user.
pub const PROTECTED_USER: &str = "Please, do not delete test users with ID 1, 2, 3, 4 or 5.";

/// `error` field of an edit with a one-character first name.
pub const FIRST_NAME_TOO_SHORT: &str = "Too short value for field firstName";

/// Registration without `field`.
#[must_use]
pub fn missing_param(field: &str) -> String {
    format!("The following required params are missed: {field}")
}

/// Registration with an email that is already taken.
#[must_use]
pub fn email_exists(email: &str) -> String {
    format!("Users with email '{email}' already exists")
}
