use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::DetectionConfig;
use crate::detect::form_model::DetectedForm;
use crate::dom::dom_model::PageSnapshot;
use crate::page::classify::{PageClass, PageKind};
use crate::page::domain::{host_of, infer_category, origin_of};
use crate::store::model::NewCredential;
use crate::store::store::StoreClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    SavedNew,
    Updated,
    Unchanged,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedValues {
    pub username: String,
    pub password: String,
}

/// Read the submitted values off the current snapshot. A stale field
/// reference or an empty value abandons the capture silently.
pub fn read_values(form: &DetectedForm, snap: &PageSnapshot) -> Option<CapturedValues> {
    let password_node = form.primary_password()?;
    let password = snap.get(password_node)?.value.clone().unwrap_or_default();

    let username = form
        .username_field
        .and_then(|n| snap.get(n))
        .and_then(|el| el.value.clone())
        .unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return None;
    }

    Some(CapturedValues { username, password })
}

/// Persist a submitted credential pair. Registration always stores a
/// brand-new record (no dedup against existing ones). Login looks for an
/// exact username match on the current domain: a differing password
/// updates the record in place, no match stores a new one.
pub fn capture_submission(
    form: &DetectedForm,
    snap: &PageSnapshot,
    page: PageClass,
    store: &mut StoreClient,
    config: &DetectionConfig,
    now: DateTime<Utc>,
) -> CaptureOutcome {
    let Some(values) = read_values(form, snap) else {
        return CaptureOutcome::Skipped;
    };

    let host = host_of(&snap.url);

    match page.kind() {
        PageKind::Registration => {
            info!("capturing new registration credential for {}", host);
            save_new(snap, &host, &values, store, config, now)
        }

        PageKind::Login => {
            let existing = store.passwords_for_domain(&host);
            match existing.into_iter().find(|c| c.username == values.username) {
                Some(mut record) => {
                    if record.password == values.password {
                        debug!("submitted credential unchanged for {}", host);
                        CaptureOutcome::Unchanged
                    } else {
                        info!("updating stored credential for {}", host);
                        record.password = values.password.clone();
                        record.date_modified = Some(now);
                        if store.update_password(record) {
                            CaptureOutcome::Updated
                        } else {
                            CaptureOutcome::Skipped
                        }
                    }
                }
                None => save_new(snap, &host, &values, store, config, now),
            }
        }

        PageKind::Unknown => CaptureOutcome::Skipped,
    }
}

fn save_new(
    snap: &PageSnapshot,
    host: &str,
    values: &CapturedValues,
    store: &mut StoreClient,
    config: &DetectionConfig,
    now: DateTime<Utc>,
) -> CaptureOutcome {
    let name = if snap.title.is_empty() {
        host.to_string()
    } else {
        snap.title.clone()
    };

    let data = NewCredential {
        name,
        username: values.username.clone(),
        password: values.password.clone(),
        website: origin_of(&snap.url),
        category: infer_category(host, &config.categories),
        favorite: false,
        folder: None,
        note: None,
        date_added: now,
    };

    if store.save_password(data) {
        CaptureOutcome::SavedNew
    } else {
        CaptureOutcome::Skipped
    }
}
