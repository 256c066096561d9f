use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored credential as the backend returns it. Identifier uniqueness is
/// the backend's contract; (domain, username) uniqueness is NOT: duplicate
/// usernames per domain are legal and disambiguated by the chooser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub website: String,
    pub category: String,
    pub favorite: bool,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
    #[serde(rename = "dateModified", default)]
    pub date_modified: Option<DateTime<Utc>>,
}

/// A captured credential before the backend has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCredential {
    pub name: String,
    pub username: String,
    pub password: String,
    pub website: String,
    pub category: String,
    pub favorite: bool,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
}
