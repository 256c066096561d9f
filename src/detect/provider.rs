use log::debug;

use crate::config::DetectionConfig;
use crate::detect::form_model::{DetectedForm, FormContainer, FormKind};
use crate::dom::dom_model::{Element, PageSnapshot};
use crate::dom::query;
use crate::fields::classifier::{is_password_candidate, is_username_candidate};
use crate::fields::selector::first_match;

/// Detection against the special-cased identity provider. The provider's
/// selector lists run in priority order; if none hit, a brute-force
/// attribute scan over all inputs takes over. A login record and a
/// registration record can coexist on one page.
pub fn detect_provider_forms(snap: &PageSnapshot, config: &DetectionConfig) -> Vec<DetectedForm> {
    let provider = &config.provider;
    let inputs: Vec<&Element> = snap.inputs().collect();
    let mut records = Vec::new();

    let reg_password = first_match(&inputs, &provider.registration_password);

    let login_username = first_match(&inputs, &provider.login_username).or_else(|| {
        inputs
            .iter()
            .copied()
            .find(|el| !el.is_password_type() && is_username_candidate(el, &config.keywords))
    });
    let login_password = first_match(&inputs, &provider.login_password).or_else(|| {
        inputs
            .iter()
            .copied()
            .find(|el| {
                is_password_candidate(el, &config.keywords)
                    && Some(el.node) != reg_password.map(|r| r.node)
            })
    });

    if let (Some(email), Some(pass)) = (login_username, login_password) {
        debug!("provider login form detected");
        records.push(DetectedForm::new(
            container_for(snap, pass, Some(email)),
            FormKind::Login,
            vec![pass.node],
            Some(email.node),
        ));
    }

    // The registration sub-form is detected independently; its username
    // prefers the registration email field, falling back to the name field.
    if let Some(reg_pass) = reg_password {
        debug!("provider registration form detected");
        let reg_username = first_match(&inputs, &provider.registration_username);
        let confirm = first_match(&inputs, &provider.registration_confirm)
            .filter(|el| el.node != reg_pass.node);

        let mut passwords = vec![reg_pass.node];
        if let Some(confirm) = confirm {
            passwords.push(confirm.node);
        }

        records.push(DetectedForm::new(
            container_for(snap, reg_pass, reg_username),
            FormKind::Registration,
            passwords,
            reg_username.map(|el| el.node),
        ));
    }

    records
}

/// The owning container for a provider field pair: the password field's
/// form, the username field's form, any form on the page, then a
/// synthetic wrapper.
fn container_for(
    snap: &PageSnapshot,
    password: &Element,
    username: Option<&Element>,
) -> FormContainer {
    query::nearest_form_ancestor(snap, password.node)
        .or_else(|| username.and_then(|el| query::nearest_form_ancestor(snap, el.node)))
        .or_else(|| snap.forms().next().map(|el| el.node))
        .map(|form| FormContainer::Native { form })
        .unwrap_or(FormContainer::Synthetic {
            anchor: password.node,
        })
}
