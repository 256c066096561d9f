use crate::config::KeywordConfig;
use crate::dom::dom_model::Element;

/// Whether an input could hold the account identity (email, username,
/// phone). Matching runs over the observable attributes only; the
/// positional preferences live in the form detector.
pub fn is_username_candidate(el: &Element, keywords: &KeywordConfig) -> bool {
    if !el.is_input() {
        return false;
    }

    if el.r#type.as_deref() == Some("email") {
        return true;
    }

    if autocomplete_matches(el, &keywords.username_autocomplete) {
        return true;
    }

    if !is_texty(el) {
        return false;
    }

    attrs_contain_any(el, &keywords.username_fields)
}

/// Whether an input could hold a credential secret. `type="password"` is
/// always a password candidate; `autocomplete` values like `new-password`
/// qualify regardless of the rendered input type.
pub fn is_password_candidate(el: &Element, keywords: &KeywordConfig) -> bool {
    if !el.is_input() {
        return false;
    }

    if el.is_password_type() {
        return true;
    }

    if autocomplete_matches(el, &keywords.password_autocomplete) {
        return true;
    }

    if !is_texty(el) {
        return false;
    }

    attrs_contain_any(el, &keywords.password_fields)
}

/// Inputs that can carry typed text. Keyword matching is restricted to
/// these so a button named "login" is not mistaken for a field.
fn is_texty(el: &Element) -> bool {
    matches!(
        el.r#type.as_deref(),
        None | Some("text") | Some("email") | Some("tel") | Some("password")
    )
}

fn autocomplete_matches(el: &Element, values: &[String]) -> bool {
    el.autocomplete
        .as_deref()
        .is_some_and(|ac| values.iter().any(|v| ac.eq_ignore_ascii_case(v)))
}

fn attrs_contain_any(el: &Element, keys: &[String]) -> bool {
    [&el.name, &el.id, &el.placeholder, &el.aria_label]
        .into_iter()
        .filter_map(|attr| attr.as_deref())
        .any(|attr| {
            let lower = attr.to_lowercase();
            keys.iter().any(|k| lower.contains(&k.to_lowercase()))
        })
}
