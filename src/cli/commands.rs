use crate::analyze_snapshot;
use crate::config::DetectionConfig;
use crate::detect::form_model::FormContainer;
use crate::dom::dom_model::PageSnapshot;
use crate::generate::password::generate_password;

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    snapshot_path: &str,
    format: &str,
    config: &DetectionConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose > 0 {
        eprintln!("Analyzing snapshot: {}", snapshot_path);
    }

    let content = std::fs::read_to_string(snapshot_path)?;
    let snap: PageSnapshot = serde_json::from_str(&content)?;

    let analysis = analyze_snapshot(&snap, config);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Page: {}", snap.url);
    println!(
        "  host={} lookup_domain={}",
        analysis.host, analysis.lookup_domain
    );
    println!(
        "  login={} registration={}",
        analysis.page.is_login, analysis.page.is_registration
    );
    println!("Detected {} credential form(s)", analysis.forms.len());

    for form in &analysis.forms {
        let container = match form.container {
            FormContainer::Native { form } => format!("form #{}", form),
            FormContainer::Synthetic { anchor } => format!("virtual (around #{})", anchor),
        };
        println!(
            "  [{:?}] {} — {} password field(s), username={}",
            form.kind,
            container,
            form.password_fields.len(),
            form.username_field
                .map(|n| format!("#{}", n))
                .unwrap_or_else(|| "none".into()),
        );
    }

    Ok(())
}

// ============================================================================
// generate subcommand
// ============================================================================

pub fn cmd_generate(count: usize) -> Result<(), Box<dyn std::error::Error>> {
    for _ in 0..count.max(1) {
        println!("{}", generate_password());
    }
    Ok(())
}
