// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{broken_csv_sibling, normalize_seed};

// Re-export audit functionality from pagelens-core
pub use pagelens_core::audit::{AuditOutcome, AuditProgressCallback, execute_audit};
pub use pagelens_core::report::extract_url_path;
