use serde::{Deserialize, Serialize};

use crate::fields::selector::FieldSelector;

// ============================================================================
// Detection configuration (optional YAML: `credfill.yaml`)
// ============================================================================

/// Every keyword list, selector list, and delay the engine consults.
/// New markup conventions are supported by editing the config file, not
/// the code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub categories: CategoryConfig,

    /// Maximum screen distance for the nearest-field username fallback.
    #[serde(default = "default_proximity_px")]
    pub proximity_threshold_px: f32,

    /// How many ancestor levels to search for a submit-looking control
    /// around a standalone password field.
    #[serde(default = "default_submit_levels")]
    pub submit_search_levels: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordConfig::default(),
            provider: ProviderConfig::default(),
            timing: TimingConfig::default(),
            categories: CategoryConfig::default(),
            proximity_threshold_px: default_proximity_px(),
            submit_search_levels: default_submit_levels(),
        }
    }
}

/// Keyword vocabularies for field and page classification. All matching is
/// case-insensitive substring matching unless noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Substrings of name/id/placeholder/aria-label marking a username field.
    pub username_fields: Vec<String>,
    /// Substrings marking a password field.
    pub password_fields: Vec<String>,
    /// Exact `autocomplete` values marking a username field.
    pub username_autocomplete: Vec<String>,
    /// Exact `autocomplete` values marking a password field.
    pub password_autocomplete: Vec<String>,

    pub registration_urls: Vec<String>,
    pub login_urls: Vec<String>,
    pub registration_texts: Vec<String>,
    pub login_texts: Vec<String>,

    /// Label texts of submit-looking controls.
    pub submit_labels: Vec<String>,
    /// Class-name fragments of submit-looking controls.
    pub submit_classes: Vec<String>,
    /// Test-id fragments of submit-looking controls.
    pub submit_test_ids: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            username_fields: strings(&["email", "e-mail", "username", "user", "login"]),
            password_fields: strings(&["password", "pass", "heslo", "pwd"]),
            username_autocomplete: strings(&["username", "email"]),
            password_autocomplete: strings(&["current-password", "new-password"]),
            registration_urls: strings(&[
                "register",
                "signup",
                "sign-up",
                "join",
                "create-account",
                "registration",
                "r.php",
            ]),
            login_urls: strings(&[
                "login",
                "log-in",
                "signin",
                "sign-in",
                "authenticate",
                "login.php",
            ]),
            registration_texts: strings(&[
                "register",
                "sign up",
                "create account",
                "join now",
                "vytvoriť účet",
            ]),
            login_texts: strings(&["log in", "sign in", "login", "prihlásiť", "prihlásenie"]),
            submit_labels: strings(&[
                "log in",
                "sign in",
                "login",
                "sign up",
                "submit",
                "continue",
                "prihlásiť",
            ]),
            submit_classes: strings(&["submit", "login", "signin", "sign-in"]),
            submit_test_ids: strings(&["login", "submit"]),
        }
    }
}

/// Special-cased identity-provider markup. Generic attribute heuristics
/// have unacceptable recall against this provider's churning, obfuscated
/// markup, so bespoke selector lists are tried first, in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Host marker strings identifying the provider family.
    pub hosts: Vec<String>,
    /// Canonical collapsed host all provider hosts normalize to.
    pub canonical_host: String,

    pub login_username: Vec<FieldSelector>,
    pub login_password: Vec<FieldSelector>,
    pub registration_password: Vec<FieldSelector>,
    pub registration_confirm: Vec<FieldSelector>,
    pub registration_username: Vec<FieldSelector>,

    pub login_paths: Vec<String>,
    pub registration_paths: Vec<String>,
    pub login_titles: Vec<String>,
    pub registration_titles: Vec<String>,
    pub login_texts: Vec<String>,
    /// Body-text fragments that signal login only when ALL are present.
    pub login_text_combo: Vec<String>,
    pub registration_texts: Vec<String>,

    /// `name`/`id` values of the provider's submit controls.
    pub submit_names: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hosts: strings(&["facebook.com", "fb.com"]),
            canonical_host: "facebook.com".to_string(),
            login_username: vec![
                FieldSelector {
                    name: Some("email".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    id: Some("email".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    class_contains: Some("inputtext".into()),
                    aria_label: Some("Email address or phone number".into()),
                    ..FieldSelector::default()
                },
            ],
            login_password: vec![
                FieldSelector {
                    name: Some("pass".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    id: Some("pass".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    class_contains: Some("inputtext".into()),
                    aria_label: Some("Password".into()),
                    ..FieldSelector::default()
                },
            ],
            registration_password: vec![
                FieldSelector {
                    name: Some("reg_passwd__".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    id: Some("password_step_input".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    autocomplete: Some("new-password".into()),
                    ..FieldSelector::default()
                },
            ],
            registration_confirm: vec![FieldSelector {
                name: Some("reg_passwd_confirmation".into()),
                ..FieldSelector::default()
            }],
            registration_username: vec![
                FieldSelector {
                    name: Some("reg_email__".into()),
                    ..FieldSelector::default()
                },
                FieldSelector {
                    name: Some("firstname".into()),
                    ..FieldSelector::default()
                },
            ],
            login_paths: strings(&["/login", "login.php"]),
            registration_paths: strings(&["r.php", "/reg/"]),
            login_titles: strings(&["log in", "login"]),
            registration_titles: strings(&["sign up", "create account", "register"]),
            login_texts: strings(&["log in to facebook"]),
            login_text_combo: strings(&["email or phone", "password"]),
            registration_texts: strings(&["create a new account", "sign up for facebook"]),
            submit_names: strings(&["login", "loginbutton", "websubmit"]),
        }
    }
}

/// Delays and intervals for the re-detection driver. All host-clock
/// milliseconds; none are hardcoded in the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Extra rescan offsets after the page `load` event, for deferred
    /// client-side rendering.
    pub load_rescan_delays_ms: Vec<u64>,
    /// Debounce for mutation-triggered rescans.
    pub mutation_debounce_ms: u64,
    /// Polling interval catching changes the mutation path misses.
    pub poll_interval_ms: u64,
    /// Delay between a submit trigger and reading the field values.
    pub capture_delay_ms: u64,
    /// Delay before the provider's form is auto-submitted after autofill.
    pub auto_submit_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            load_rescan_delays_ms: vec![500, 1500],
            mutation_debounce_ms: 500,
            poll_interval_ms: 2000,
            capture_delay_ms: 500,
            auto_submit_delay_ms: 300,
        }
    }
}

/// Domain keyword buckets used to tag captured credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub bank: Vec<String>,
    pub social: Vec<String>,
    pub work: Vec<String>,
    pub health: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            bank: strings(&[
                "bank",
                "banka",
                "banking",
                "pay",
                "payment",
                "finance",
                "financial",
            ]),
            social: strings(&[
                "facebook",
                "twitter",
                "instagram",
                "linkedin",
                "tiktok",
                "social",
            ]),
            work: strings(&["office", "work", "job", "career", "business", "corporate"]),
            health: strings(&[
                "health",
                "hospital",
                "doctor",
                "medical",
                "clinic",
                "healthcare",
            ]),
        }
    }
}

// ============================================================================
// Config file loading
// ============================================================================

impl DetectionConfig {
    /// Load config from a YAML file. Returns defaults if the file is
    /// missing or malformed.
    pub fn load(path: Option<&str>) -> DetectionConfig {
        let config_path = path.unwrap_or("credfill.yaml");
        match std::fs::read_to_string(config_path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
            Err(_) => DetectionConfig::default(),
        }
    }
}

// Serde/default helpers
fn default_proximity_px() -> f32 {
    300.0
}
fn default_submit_levels() -> usize {
    3
}
fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
