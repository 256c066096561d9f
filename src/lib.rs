use serde::Serialize;

use crate::{
    config::DetectionConfig,
    detect::{detector::detect_forms, form_model::DetectedForm},
    dom::dom_model::PageSnapshot,
    page::{
        classify::{PageClass, classify_page},
        domain::{host_of, normalize_domain},
    },
};

pub mod cli;
pub mod config;
pub mod detect;
pub mod dom;
pub mod fields;
pub mod generate;
pub mod matcher;
pub mod page;
pub mod session;
pub mod store;
pub mod trace;
pub mod ui;

/// One stateless detection pass over a snapshot: detected forms plus the
/// page classification and the credential lookup key. The CLI harness
/// prints this; hosts embedding the full suggestion flow drive
/// `session::driver::DetectionDriver` instead.
#[derive(Debug, Serialize)]
pub struct PageAnalysis {
    pub host: String,
    pub lookup_domain: String,
    pub page: PageClass,
    pub forms: Vec<DetectedForm>,
}

pub fn analyze_snapshot(snap: &PageSnapshot, config: &DetectionConfig) -> PageAnalysis {
    let forms = detect_forms(snap, config);
    let page = classify_page(snap, &forms, config);

    PageAnalysis {
        host: host_of(&snap.url),
        lookup_domain: normalize_domain(&snap.url, &config.provider),
        page,
        forms,
    }
}
