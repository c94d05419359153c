//! Registration and profile-update payloads.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::session::Credentials;

/// A field of the user resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationField {
    /// `email`
    Email,
    /// `password`
    Password,
    /// `username`
    Username,
    /// `firstName`
    FirstName,
    /// `lastName`
    LastName,
}

impl RegistrationField {
    /// Every field, in the order the remote API reports missing ones.
    pub const ALL: [Self; 5] = [
        Self::Email,
        Self::Password,
        Self::Username,
        Self::FirstName,
        Self::LastName,
    ];

    /// The field name on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Username => "username",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for RegistrationField {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}

/// A registration request body.
///
/// Every field is optional so that a scenario can omit one on purpose;
/// generated payloads fill all five.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Public user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RegistrationPayload {
    /// Returns the value of `field`.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<&str> {
        match field {
            RegistrationField::Email => self.email.as_deref(),
            RegistrationField::Password => self.password.as_deref(),
            RegistrationField::Username => self.username.as_deref(),
            RegistrationField::FirstName => self.first_name.as_deref(),
            RegistrationField::LastName => self.last_name.as_deref(),
        }
    }

    /// Sets or clears `field`.
    pub fn set(&mut self, field: RegistrationField, value: Option<String>) {
        let slot = match field {
            RegistrationField::Email => &mut self.email,
            RegistrationField::Password => &mut self.password,
            RegistrationField::Username => &mut self.username,
            RegistrationField::FirstName => &mut self.first_name,
            RegistrationField::LastName => &mut self.last_name,
        };
        *slot = value;
    }

    /// The present fields as wire-name pairs, in canonical order.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        RegistrationField::ALL
            .into_iter()
            .filter_map(|field| {
                self.get(field)
                    .map(|value| (field.wire_name().to_string(), value.to_string()))
            })
            .collect()
    }

    /// Login credentials, when both email and password are present.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials::new(self.email.clone()?, self.password.clone()?))
    }
}

/// How an override changes one generated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOverride {
    /// Force the field to this value.
    Value(String),
    /// Leave the field out of the payload entirely.
    Absent,
}

/// Per-field overrides applied on top of generated values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    fields: BTreeMap<RegistrationField, FieldOverride>,
}

impl Overrides {
    /// No overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Force `field` to `value`.
    #[must_use]
    pub fn set(mut self, field: RegistrationField, value: impl Into<String>) -> Self {
        self.fields
            .insert(field, FieldOverride::Value(value.into()));
        self
    }

    /// Omit `field` from the payload.
    #[must_use]
    pub fn omit(mut self, field: RegistrationField) -> Self {
        self.fields.insert(field, FieldOverride::Absent);
        self
    }

    /// The override for `field`, if any.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<&FieldOverride> {
        self.fields.get(&field)
    }

    /// Applies the overrides to `payload`.
    pub fn apply(&self, payload: &mut RegistrationPayload) {
        for (field, change) in &self.fields {
            match change {
                FieldOverride::Value(value) => payload.set(*field, Some(value.clone())),
                FieldOverride::Absent => payload.set(*field, None),
            }
        }
    }
}

/// Fields to change on an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    fields: BTreeMap<RegistrationField, String>,
}

impl UserUpdate {
    /// An empty update.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Change `field` to `value`.
    #[must_use]
    pub fn with(mut self, field: RegistrationField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// The new value for `field`, if it is part of the update.
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// The changed fields as wire-name pairs.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.wire_name().to_string(), value.clone()))
            .collect()
    }

    /// Returns true if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_payload() -> RegistrationPayload {
        RegistrationPayload {
            email: Some("t+abc@example.com".to_string()),
            password: Some("Abc12345".to_string()),
            username: Some("userabc".to_string()),
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
        }
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in RegistrationField::ALL {
            assert_eq!(field.wire_name().parse::<RegistrationField>().unwrap(), field);
        }
        assert!("first_name".parse::<RegistrationField>().is_err());
    }

    #[test]
    fn test_form_fields_use_wire_names() {
        let fields = full_payload().form_fields();
        let names: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["email", "password", "username", "firstName", "lastName"]
        );
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let mut payload = full_payload();
        payload.set(RegistrationField::Email, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "password": "Abc12345",
                "username": "userabc",
                "firstName": "A",
                "lastName": "B"
            })
        );
    }

    #[test]
    fn test_overrides_set_and_omit() {
        let mut payload = full_payload();
        Overrides::new()
            .set(RegistrationField::Username, "l")
            .omit(RegistrationField::LastName)
            .apply(&mut payload);

        assert_eq!(payload.username.as_deref(), Some("l"));
        assert_eq!(payload.last_name, None);
        assert_eq!(payload.email.as_deref(), Some("t+abc@example.com"));
    }

    #[test]
    fn test_credentials_need_email_and_password() {
        let creds = full_payload().credentials().unwrap();
        assert_eq!(creds, Credentials::new("t+abc@example.com", "Abc12345"));

        let mut payload = full_payload();
        payload.password = None;
        assert!(payload.credentials().is_none());
    }

    #[test]
    fn test_user_update_fields() {
        let update = UserUpdate::new().with(RegistrationField::FirstName, "Changed Name");
        assert_eq!(
            update.form_fields(),
            vec![("firstName".to_string(), "Changed Name".to_string())]
        );
        assert_eq!(update.get(RegistrationField::FirstName), Some("Changed Name"));
        assert!(UserUpdate::new().is_empty());
    }
}
