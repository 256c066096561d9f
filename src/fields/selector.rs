use serde::{Deserialize, Serialize};

use crate::dom::dom_model::Element;

/// An attribute-match descriptor standing in for a CSS attribute selector.
/// Every populated constraint must hold for the selector to match; an
/// all-empty selector matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSelector {
    pub name: Option<String>,
    pub id: Option<String>,
    pub input_type: Option<String>,
    pub class_contains: Option<String>,
    pub aria_label: Option<String>,
    pub placeholder: Option<String>,
    pub autocomplete: Option<String>,
    pub test_id: Option<String>,
}

impl FieldSelector {
    pub fn matches(&self, el: &Element) -> bool {
        if !el.is_input() {
            return false;
        }

        let mut constrained = false;
        let mut check = |wanted: &Option<String>, actual: &Option<String>| -> bool {
            match wanted {
                Some(w) => {
                    constrained = true;
                    actual
                        .as_deref()
                        .is_some_and(|a| a.eq_ignore_ascii_case(w))
                }
                None => true,
            }
        };

        let attrs_match = check(&self.name, &el.name)
            && check(&self.id, &el.id)
            && check(&self.input_type, &el.r#type)
            && check(&self.aria_label, &el.aria_label)
            && check(&self.placeholder, &el.placeholder)
            && check(&self.autocomplete, &el.autocomplete)
            && check(&self.test_id, &el.test_id);

        let class_matches = match &self.class_contains {
            Some(fragment) => {
                constrained = true;
                el.class
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&fragment.to_lowercase()))
            }
            None => true,
        };

        attrs_match && class_matches && constrained
    }
}

/// First element matching any selector, honoring selector priority order.
pub fn first_match<'a>(
    elements: &[&'a Element],
    selectors: &[FieldSelector],
) -> Option<&'a Element> {
    for selector in selectors {
        if let Some(found) = elements.iter().copied().find(|el| selector.matches(el)) {
            return Some(found);
        }
    }
    None
}
