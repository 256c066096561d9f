use serde::{Deserialize, Serialize};

use crate::store::model::{CredentialRecord, NewCredential};

/// Request sent to the storage collaborator, which may live in a separate
/// execution context. One JSON message per call, tagged by action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum StoreRequest {
    GetPasswordsForDomain { domain: String },
    SavePassword { data: NewCredential },
    UpdatePassword { data: CredentialRecord },
}

impl StoreRequest {
    pub fn action_name(&self) -> &'static str {
        match self {
            StoreRequest::GetPasswordsForDomain { .. } => "getPasswordsForDomain",
            StoreRequest::SavePassword { .. } => "savePassword",
            StoreRequest::UpdatePassword { .. } => "updatePassword",
        }
    }
}

/// Response received from the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    pub success: bool,
    #[serde(default)]
    pub passwords: Option<Vec<CredentialRecord>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StoreResponse {
    pub fn ok() -> StoreResponse {
        StoreResponse {
            success: true,
            passwords: None,
            error: None,
        }
    }

    pub fn with_passwords(passwords: Vec<CredentialRecord>) -> StoreResponse {
        StoreResponse {
            success: true,
            passwords: Some(passwords),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> StoreResponse {
        StoreResponse {
            success: false,
            passwords: None,
            error: Some(error.to_string()),
        }
    }
}
