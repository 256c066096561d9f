use log::debug;
use serde::Serialize;

use crate::config::DetectionConfig;
use crate::detect::form_model::DetectedForm;
use crate::dom::dom_model::{Element, PageSnapshot};
use crate::fields::selector::first_match;
use crate::page::domain::{host_of, is_provider_host};

/// Login/registration signals for the current page. The flags are
/// independent: a generic page can carry both, or neither. Call sites
/// branch through `kind()`, which applies the documented precedence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageClass {
    pub is_login: bool,
    pub is_registration: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    Login,
    Registration,
    Unknown,
}

impl PageClass {
    /// Registration wins when both signals fired; a page with neither
    /// stays `Unknown` (provider pages never reach `Unknown`; they
    /// default to login upstream).
    pub fn kind(&self) -> PageKind {
        if self.is_registration {
            PageKind::Registration
        } else if self.is_login {
            PageKind::Login
        } else {
            PageKind::Unknown
        }
    }

    fn login() -> PageClass {
        PageClass {
            is_login: true,
            is_registration: false,
        }
    }

    fn registration() -> PageClass {
        PageClass {
            is_login: false,
            is_registration: true,
        }
    }
}

/// Classify the current page. Runs after form detection so the structural
/// password-field-count signal is available.
pub fn classify_page(
    snap: &PageSnapshot,
    forms: &[DetectedForm],
    config: &DetectionConfig,
) -> PageClass {
    let host = host_of(&snap.url);

    let class = if is_provider_host(&host, &config.provider) {
        classify_provider_page(snap, config)
    } else {
        classify_generic_page(snap, forms, config)
    };

    debug!(
        "page classified: login={} registration={} ({})",
        class.is_login, class.is_registration, snap.url
    );
    class
}

fn classify_generic_page(
    snap: &PageSnapshot,
    forms: &[DetectedForm],
    config: &DetectionConfig,
) -> PageClass {
    let keywords = &config.keywords;
    let url = snap.url.to_lowercase();
    let mut class = PageClass::default();

    if keywords.registration_urls.iter().any(|k| url.contains(k)) {
        class.is_registration = true;
    }
    if keywords.login_urls.iter().any(|k| url.contains(k)) {
        class.is_login = true;
    }

    // URL analysis inconclusive: fall back to page content and structure.
    if !class.is_registration && !class.is_login {
        let text = snap.body_text.to_lowercase();

        if keywords.registration_texts.iter().any(|k| text.contains(k)) {
            class.is_registration = true;
        }

        let password_count: usize = forms.iter().map(|f| f.password_fields.len()).sum();
        if password_count >= 2 {
            class.is_registration = true;
        }

        if keywords.login_texts.iter().any(|k| text.contains(k)) {
            class.is_login = true;
        }
    }

    class
}

/// Provider decision chain: URL paths, title, registration-only field,
/// login field + button, body text, then default to login. An
/// undetermined provider page is assumed to be a login page.
fn classify_provider_page(snap: &PageSnapshot, config: &DetectionConfig) -> PageClass {
    let provider = &config.provider;
    let url = snap.url.to_lowercase();

    if provider.registration_paths.iter().any(|p| url.contains(p)) {
        return PageClass::registration();
    }
    if provider.login_paths.iter().any(|p| url.contains(p)) {
        return PageClass::login();
    }

    let title = snap.title.to_lowercase();
    if provider.registration_titles.iter().any(|t| title.contains(t)) {
        return PageClass::registration();
    }
    if provider.login_titles.iter().any(|t| title.contains(t)) {
        return PageClass::login();
    }

    let inputs: Vec<&Element> = snap.inputs().collect();
    if first_match(&inputs, &provider.registration_password).is_some() {
        return PageClass::registration();
    }
    if first_match(&inputs, &provider.login_password).is_some()
        && find_provider_submit(snap, config).is_some()
    {
        return PageClass::login();
    }

    let text = snap.body_text.to_lowercase();
    if provider.registration_texts.iter().any(|t| text.contains(t)) {
        return PageClass::registration();
    }
    let combo_hit = !provider.login_text_combo.is_empty()
        && provider.login_text_combo.iter().all(|t| text.contains(t));
    if provider.login_texts.iter().any(|t| text.contains(t)) || combo_hit {
        return PageClass::login();
    }

    PageClass::login()
}

/// A provider submit control, matched by its known name/id values.
pub fn find_provider_submit<'a>(
    snap: &'a PageSnapshot,
    config: &DetectionConfig,
) -> Option<&'a Element> {
    snap.elements.iter().find(|el| {
        matches!(el.tag.as_str(), "button" | "input")
            && [&el.name, &el.id]
                .into_iter()
                .filter_map(|attr| attr.as_deref())
                .any(|attr| {
                    config
                        .provider
                        .submit_names
                        .iter()
                        .any(|n| attr.eq_ignore_ascii_case(n))
                })
    })
}
