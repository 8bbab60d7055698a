use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagelens")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagelens")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("audit")
                .about(
                    "Audit a site: crawl its internal links, extract SEO metadata and collect \
                broken links.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The site to audit; bare domains are assumed to be https"),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the crawl pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("8"),
                )
                .arg(
                    arg!(--"max-pages" <NUM>)
                        .required(false)
                        .help("Stop the crawl after this many pages have been fetched")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv")
                        .value_parser(["text", "json", "csv"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"publish")
                        .required(false)
                        .help("Publish both result tables to the sheet service")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"share" <EMAIL>)
                        .required(false)
                        .help("Share the published sheet with this address (default: PAGELENS_DEFAULT_EMAIL)"),
                )
                .arg(
                    arg!(--"credentials" <PATH>)
                        .required(false)
                        .help("Credentials JSON file for the sheet service (default: PAGELENS_CREDENTIALS_FILE)"),
                ),
        )
}
