use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_NAME: &str = "Anonymous";
pub const MISSING_EMAIL: &str = "N/A";

/// Profile fields the identity provider exposes for the signed-in user.
/// Blank values count as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UserProfile {
    /// Full name, then first name, then "Anonymous".
    pub fn display_name(&self) -> String {
        non_blank(&self.full_name)
            .or_else(|| non_blank(&self.first_name))
            .unwrap_or(ANONYMOUS_NAME)
            .to_string()
    }

    pub fn email_or_placeholder(&self) -> String {
        non_blank(&self.email).unwrap_or(MISSING_EMAIL).to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The stored user record, keyed by the identity provider's user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
