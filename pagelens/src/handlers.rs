use clap::ArgMatches;
use colored::Colorize;
use pagelens_core::audit::{AuditProgressCallback, execute_audit};
use pagelens_core::config::{self, AuditConfig};
use pagelens_core::export::{SheetPublisher, write_broken_csv, write_pages_csv};
use pagelens_core::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Qualify a seed URL: bare domains and www-prefixed hosts get an https
/// scheme before parsing.
pub fn normalize_seed(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("no URL provided".to_string());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| format!("invalid URL '{}': {}", input, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err(format!("URL '{}' has no host", input));
    }

    Ok(url.to_string())
}

/// Derive the broken-links CSV path next to the pages CSV.
pub fn broken_csv_sibling(pages_path: &Path) -> PathBuf {
    pages_path
        .parent()
        .map(|dir| dir.join("broken_links.csv"))
        .unwrap_or_else(|| PathBuf::from("broken_links.csv"))
}

fn fail(message: String) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    std::process::exit(1);
}

pub async fn handle_audit(sub_matches: &ArgMatches, quiet: bool) {
    tracing_subscriber::fmt::init();

    let raw_url = sub_matches.get_one::<String>("url").unwrap();
    let seed = match normalize_seed(raw_url) {
        Ok(seed) => seed,
        Err(e) => fail(e),
    };

    let mut audit_config = AuditConfig::new(seed.clone());
    audit_config.workers = *sub_matches.get_one::<usize>("workers").unwrap_or(&8);
    audit_config.max_pages = *sub_matches.get_one::<usize>("max-pages").unwrap_or(&500);
    audit_config.timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    audit_config.show_progress = !quiet;

    let output = sub_matches.get_one::<PathBuf>("output");
    let format_arg = sub_matches
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("text");
    let publish = sub_matches.get_flag("publish");
    let share_flag = sub_matches.get_one::<String>("share").map(|s| s.as_str());
    let credentials_flag = sub_matches
        .get_one::<String>("credentials")
        .map(|s| s.as_str());

    // Resolve publishing inputs before crawling so a missing token fails
    // fast instead of after a long audit.
    let publisher = if publish {
        let path = match config::credentials_path(credentials_flag) {
            Ok(path) => path,
            Err(e) => fail(e.to_string()),
        };
        let credentials = match config::load_credentials(&path) {
            Ok(credentials) => credentials,
            Err(e) => fail(e.to_string()),
        };
        let recipient = match config::share_recipient(share_flag) {
            Ok(recipient) => recipient,
            Err(e) => fail(e.to_string()),
        };
        Some((SheetPublisher::new(&credentials), recipient))
    } else {
        None
    };

    if !quiet {
        println!("\n🔍 Auditing {}", seed.bright_white());
        println!("Workers: {}", audit_config.workers);
        println!("Page cap: {}\n", audit_config.max_pages);
    }

    let progress_callback: Option<AuditProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            println!("{} {}", "→".blue(), msg);
        }))
    };

    let outcome = match execute_audit(&audit_config, progress_callback).await {
        Ok(outcome) => outcome,
        Err(e) => fail(format!("Audit failed: {}", e)),
    };

    if !quiet {
        println!(
            "\n{} Audit complete: {} pages, {} broken links\n",
            "✓".green().bold(),
            outcome.pages.len(),
            outcome.broken.len()
        );
    }

    let format = ReportFormat::from_str(format_arg).unwrap_or(ReportFormat::Text);
    match format {
        ReportFormat::Text => {
            let report = generate_text_report(&outcome);
            emit_report(&report, output);
        }
        ReportFormat::Json => match generate_json_report(&outcome) {
            Ok(report) => emit_report(&report, output),
            Err(e) => fail(format!("Failed to serialize report: {}", e)),
        },
        ReportFormat::Csv => {
            let pages_path = output.cloned().unwrap_or_else(|| PathBuf::from("pages.csv"));
            let broken_path = broken_csv_sibling(&pages_path);

            if let Err(e) = write_pages_csv(&pages_path, &outcome.pages) {
                fail(format!("Failed to write {}: {}", pages_path.display(), e));
            }
            if let Err(e) = write_broken_csv(&broken_path, &outcome.broken) {
                fail(format!("Failed to write {}: {}", broken_path.display(), e));
            }
            println!(
                "{} Results written to {} and {}",
                "✓".green().bold(),
                pages_path.display(),
                broken_path.display()
            );
        }
    }

    if let Some((publisher, recipient)) = publisher {
        let host = Url::parse(&outcome.seed)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| outcome.seed.clone());
        let title = format!("SEO Audit - {}", host);

        match publisher
            .publish(&title, &outcome.pages, &outcome.broken, &recipient)
            .await
        {
            Ok(sheet) => {
                println!(
                    "{} Published: {} (shared with {})",
                    "✓".green().bold(),
                    sheet.url.bright_white(),
                    recipient
                );
            }
            Err(e) => {
                eprintln!("{} Export failed: {}", "✗".red().bold(), e);

                // Keep the results on disk so the audit is not lost.
                let pages_path = PathBuf::from("pages.csv");
                let broken_path = PathBuf::from("broken_links.csv");
                if write_pages_csv(&pages_path, &outcome.pages).is_ok()
                    && write_broken_csv(&broken_path, &outcome.broken).is_ok()
                {
                    eprintln!(
                        "Results saved to {} and {}",
                        pages_path.display(),
                        broken_path.display()
                    );
                }
                std::process::exit(2);
            }
        }
    }
}

fn emit_report(report: &str, output: Option<&PathBuf>) {
    match output {
        Some(path) => match save_report(report, path) {
            Ok(()) => println!("{} Report saved to {}", "✓".green().bold(), path.display()),
            Err(e) => fail(format!("Failed to save report to {}: {}", path.display(), e)),
        },
        None => print!("{}", report),
    }
}
