//! Wire types for the user-management dashboard API

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value the backend uses for successful responses
pub const STATUS_OK: &str = "OK";

/// Authentication method a user signed up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeKind {
    EmailPassword,
    Passwordless,
    ThirdParty,
}

impl RecipeKind {
    /// Human readable label used in tables
    pub fn label(&self) -> &'static str {
        match self {
            RecipeKind::EmailPassword => "Email password",
            RecipeKind::Passwordless => "Passwordless",
            RecipeKind::ThirdParty => "Third party",
        }
    }

    /// Identifier used on the wire
    pub fn recipe_id(&self) -> &'static str {
        match self {
            RecipeKind::EmailPassword => "emailpassword",
            RecipeKind::Passwordless => "passwordless",
            RecipeKind::ThirdParty => "thirdparty",
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPasswordUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub time_joined: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordlessUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub time_joined: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyInfo {
    /// Provider identifier, e.g. `google`
    pub id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyUser {
    pub id: String,
    pub email: String,
    pub third_party: ThirdPartyInfo,
    #[serde(default)]
    pub time_joined: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A user as listed by the dashboard, tagged by recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "recipeId", content = "user", rename_all = "lowercase")]
pub enum UserRecord {
    EmailPassword(EmailPasswordUser),
    Passwordless(PasswordlessUser),
    ThirdParty(ThirdPartyUser),
}

impl UserRecord {
    pub fn id(&self) -> &str {
        match self {
            UserRecord::EmailPassword(user) => &user.id,
            UserRecord::Passwordless(user) => &user.id,
            UserRecord::ThirdParty(user) => &user.id,
        }
    }

    pub fn kind(&self) -> RecipeKind {
        match self {
            UserRecord::EmailPassword(_) => RecipeKind::EmailPassword,
            UserRecord::Passwordless(_) => RecipeKind::Passwordless,
            UserRecord::ThirdParty(_) => RecipeKind::ThirdParty,
        }
    }

    pub fn email(&self) -> Option<&str> {
        let email = match self {
            UserRecord::EmailPassword(user) => Some(user.email.as_str()),
            UserRecord::Passwordless(user) => user.email.as_deref(),
            UserRecord::ThirdParty(user) => Some(user.email.as_str()),
        };
        email.filter(|email| !email.is_empty())
    }

    /// Only passwordless users carry a phone number
    pub fn phone_number(&self) -> Option<&str> {
        match self {
            UserRecord::Passwordless(user) => user.phone_number.as_deref(),
            _ => None,
        }
    }

    pub fn third_party_id(&self) -> Option<&str> {
        match self {
            UserRecord::ThirdParty(user) => Some(&user.third_party.id),
            _ => None,
        }
    }

    /// The user's id at the third party provider
    pub fn third_party_user_id(&self) -> Option<&str> {
        match self {
            UserRecord::ThirdParty(user) => Some(&user.third_party.user_id),
            _ => None,
        }
    }

    /// "first last", trimmed; `None` when both are missing or blank
    pub fn display_name(&self) -> Option<String> {
        let (first, last) = match self {
            UserRecord::EmailPassword(user) => (&user.first_name, &user.last_name),
            UserRecord::Passwordless(user) => (&user.first_name, &user.last_name),
            UserRecord::ThirdParty(user) => (&user.first_name, &user.last_name),
        };
        let name = format!(
            "{} {}",
            first.as_deref().unwrap_or(""),
            last.as_deref().unwrap_or("")
        );
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Name, else email, else phone number; the id as a last resort
    pub fn primary_label(&self) -> String {
        self.display_name()
            .or_else(|| self.email().map(str::to_string))
            .or_else(|| self.phone_number().map(str::to_string))
            .unwrap_or_else(|| self.id().to_string())
    }

    /// Recipe label, followed by the provider for third party users
    pub fn login_method_label(&self) -> String {
        match self.third_party_id() {
            Some(provider) => format!("{} - {}", self.kind(), provider),
            None => self.kind().to_string(),
        }
    }

    pub fn time_joined(&self) -> Option<DateTime<Utc>> {
        let millis = match self {
            UserRecord::EmailPassword(user) => user.time_joined,
            UserRecord::Passwordless(user) => user.time_joined,
            UserRecord::ThirdParty(user) => user.time_joined,
        }?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// `GET /api/users`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersListResponse {
    pub status: String,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub next_pagination_token: Option<String>,
}

/// `GET /api/users/count`
#[derive(Debug, Clone, Deserialize)]
pub struct UsersCountResponse {
    pub status: String,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactMethod {
    Phone,
    Email,
    EmailOrPhone,
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactMethod::Phone => "phone",
            ContactMethod::Email => "email",
            ContactMethod::EmailOrPhone => "email or phone",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoginMethodToggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordlessLoginMethod {
    pub enabled: bool,
    #[serde(default)]
    pub contact_method: Option<ContactMethod>,
}

/// A tenant and the login methods enabled for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub tenant_id: String,
    #[serde(default)]
    pub email_password: LoginMethodToggle,
    #[serde(default)]
    pub passwordless: PasswordlessLoginMethod,
    #[serde(default)]
    pub third_party: LoginMethodToggle,
}

impl Tenant {
    /// Labels of every enabled login method, in display order
    pub fn enabled_methods(&self) -> Vec<String> {
        let mut methods = Vec::new();
        if self.email_password.enabled {
            methods.push(RecipeKind::EmailPassword.label().to_string());
        }
        if self.passwordless.enabled {
            match self.passwordless.contact_method {
                Some(contact) => methods.push(format!(
                    "{} ({})",
                    RecipeKind::Passwordless.label(),
                    contact
                )),
                None => methods.push(RecipeKind::Passwordless.label().to_string()),
            }
        }
        if self.third_party.enabled {
            methods.push(RecipeKind::ThirdParty.label().to_string());
        }
        methods
    }
}

/// `GET /api/tenants/login-methods`
#[derive(Debug, Clone, Deserialize)]
pub struct TenantsLoginMethodsResponse {
    pub status: String,
    #[serde(default)]
    pub tenants: Vec<Tenant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateEmailPasswordUserRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /api/user/emailpassword`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateUserOutcome {
    Ok { user: EmailPasswordUser },
    EmailAlreadyExistsError,
    EmailValidationError { message: String },
    PasswordValidationError { message: String },
}
