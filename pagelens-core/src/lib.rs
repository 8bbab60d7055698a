pub mod audit;
pub mod config;
pub mod export;
pub mod report;

pub use audit::{AuditOutcome, AuditProgressCallback, execute_audit};
pub use config::{AuditConfig, ConfigError, Credentials};
pub use export::{ExportError, PublishedSheet, SheetPublisher};
pub use report::ReportFormat;

pub fn print_banner() {
    println!(
        r#"
                        _
  _ __   __ _  __ _  ___| | ___ _ __  ___
 | '_ \ / _` |/ _` |/ _ \ |/ _ \ '_ \/ __|
 | |_) | (_| | (_| |  __/ |  __/ | | \__ \
 | .__/ \__,_|\__, |\___|_|\___|_| |_|___/
 |_|          |___/
"#
    );
    println!("  pagelens v{} - SEO site auditor", env!("CARGO_PKG_VERSION"));
    println!();
}
