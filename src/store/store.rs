use std::fmt;

use chrono::Utc;
use log::warn;

use crate::page::domain::host_of;
use crate::store::messages::{StoreRequest, StoreResponse};
use crate::store::model::{CredentialRecord, NewCredential};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum StoreError {
    /// The transport itself failed (context gone, channel closed).
    Transport(String),

    /// The backend answered but reported failure.
    Rejected { action: String, error: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => {
                write!(f, "Store transport failed: {}", msg)
            }
            StoreError::Rejected { action, error } => {
                write!(f, "Store rejected '{}': {}", action, error)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// ============================================================================
// Transport trait and client
// ============================================================================

/// The storage collaborator boundary: one request, one response. Real
/// hosts bridge this to their message-passing transport; tests use
/// `MemoryStore`.
pub trait StoreTransport {
    fn request(&mut self, request: &StoreRequest) -> Result<StoreResponse, StoreError>;
}

/// Store access as the engine consumes it. Every failure, transport
/// error or backend rejection alike, degrades to "no data" / "not
/// saved"; nothing here ever surfaces an error to the page.
pub struct StoreClient {
    transport: Box<dyn StoreTransport>,
}

impl StoreClient {
    pub fn new(transport: Box<dyn StoreTransport>) -> StoreClient {
        StoreClient { transport }
    }

    fn send(&mut self, request: &StoreRequest) -> Result<StoreResponse, StoreError> {
        let response = self.transport.request(request)?;
        if !response.success {
            return Err(StoreError::Rejected {
                action: request.action_name().into(),
                error: response
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    pub fn passwords_for_domain(&mut self, domain: &str) -> Vec<CredentialRecord> {
        let request = StoreRequest::GetPasswordsForDomain {
            domain: domain.to_string(),
        };
        match self.send(&request) {
            Ok(response) => response.passwords.unwrap_or_default(),
            Err(e) => {
                warn!("credential lookup for '{}' failed: {}", domain, e);
                Vec::new()
            }
        }
    }

    pub fn save_password(&mut self, data: NewCredential) -> bool {
        let request = StoreRequest::SavePassword { data };
        match self.send(&request) {
            Ok(_) => true,
            Err(e) => {
                warn!("saving credential failed: {}", e);
                false
            }
        }
    }

    pub fn update_password(&mut self, data: CredentialRecord) -> bool {
        let request = StoreRequest::UpdatePassword { data };
        match self.send(&request) {
            Ok(_) => true,
            Err(e) => {
                warn!("updating credential failed: {}", e);
                false
            }
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-crate storage backend used by tests and the CLI harness. Domain
/// matching is host-exact plus subdomain-inclusive, so a broad query for
/// `facebook.com` also returns records saved under `m.facebook.com`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<CredentialRecord>,
    next_id: u64,
    lookups: u64,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_records(records: Vec<CredentialRecord>) -> MemoryStore {
        MemoryStore {
            next_id: records.len() as u64,
            records,
            lookups: 0,
        }
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    /// How many domain lookups this store has served.
    pub fn lookup_count(&self) -> u64 {
        self.lookups
    }

    fn matches_domain(website: &str, domain: &str) -> bool {
        let host = host_of(website);
        host == domain || host.ends_with(&format!(".{}", domain))
    }
}

impl StoreTransport for MemoryStore {
    fn request(&mut self, request: &StoreRequest) -> Result<StoreResponse, StoreError> {
        match request {
            StoreRequest::GetPasswordsForDomain { domain } => {
                self.lookups += 1;
                let matching = self
                    .records
                    .iter()
                    .filter(|r| Self::matches_domain(&r.website, domain))
                    .cloned()
                    .collect();
                Ok(StoreResponse::with_passwords(matching))
            }

            StoreRequest::SavePassword { data } => {
                self.next_id += 1;
                self.records.push(CredentialRecord {
                    id: self.next_id.to_string(),
                    name: data.name.clone(),
                    username: data.username.clone(),
                    password: data.password.clone(),
                    website: data.website.clone(),
                    category: data.category.clone(),
                    favorite: data.favorite,
                    folder: data.folder.clone(),
                    note: data.note.clone(),
                    date_added: data.date_added,
                    date_modified: None,
                });
                Ok(StoreResponse::ok())
            }

            StoreRequest::UpdatePassword { data } => {
                match self.records.iter_mut().find(|r| r.id == data.id) {
                    Some(existing) => {
                        *existing = data.clone();
                        if existing.date_modified.is_none() {
                            existing.date_modified = Some(Utc::now());
                        }
                        Ok(StoreResponse::ok())
                    }
                    None => Ok(StoreResponse::failed(format!(
                        "no record with id '{}'",
                        data.id
                    ))),
                }
            }
        }
    }
}

/// Handle to a `MemoryStore` that can be held on both sides of a driver:
/// the driver sends requests through its clone, the owner inspects the
/// records. Single-threaded by design, like the rest of the engine.
#[derive(Clone, Default)]
pub struct SharedMemoryStore {
    inner: std::rc::Rc<std::cell::RefCell<MemoryStore>>,
}

impl SharedMemoryStore {
    pub fn new() -> SharedMemoryStore {
        SharedMemoryStore::default()
    }

    pub fn with_records(records: Vec<CredentialRecord>) -> SharedMemoryStore {
        SharedMemoryStore {
            inner: std::rc::Rc::new(std::cell::RefCell::new(MemoryStore::with_records(records))),
        }
    }

    pub fn records(&self) -> Vec<CredentialRecord> {
        self.inner.borrow().records().to_vec()
    }

    pub fn lookup_count(&self) -> u64 {
        self.inner.borrow().lookup_count()
    }
}

impl StoreTransport for SharedMemoryStore {
    fn request(&mut self, request: &StoreRequest) -> Result<StoreResponse, StoreError> {
        self.inner.borrow_mut().request(request)
    }
}

/// Transport that fails every request; exercises the "storage failure is
/// zero results" contract in tests.
#[derive(Debug, Default)]
pub struct FailingStore;

impl StoreTransport for FailingStore {
    fn request(&mut self, _request: &StoreRequest) -> Result<StoreResponse, StoreError> {
        Err(StoreError::Transport("backend unavailable".into()))
    }
}
