use std::path::PathBuf;

use clap::Args;

use mcm_export::config::Settings;
use mcm_export::defaults;
use mcm_export::export::{self, ExportConfig, ExportOutcome, ExportSummary};
use mcm_export::Error;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ExportArgs {
    /// AdminService base URL, e.g. https://mcm.example.com
    #[arg(long)]
    server: Option<String>,

    /// Account identifier used for authentication
    #[arg(long)]
    account: Option<String>,

    /// Secret store service name the credential is filed under
    #[arg(long)]
    keychain_service: Option<String>,

    /// Secret supplied directly, bypassing the secret store
    #[arg(long)]
    password: Option<String>,

    /// Destination directory for the export bundle
    #[arg(long)]
    output: Option<String>,

    /// Local directory holding the script files commands refer to
    #[arg(long)]
    content_root: Option<String>,

    /// Fetch at most this many records
    #[arg(long)]
    limit: Option<u32>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Remove bundle entries whose record is gone from the API
    #[arg(long)]
    prune: bool,
}

pub fn run(args: ExportArgs, global: &GlobalArgs) -> CmdResult<ExportSummary> {
    let settings = Settings::load(global.config.as_deref())?;
    let config = build_config(args, &settings)?;

    let summary = export::run(&config)?;

    for warning in &summary.warnings {
        eprintln!("warning: {}", warning);
    }
    for error in &summary.errors {
        eprintln!("error: {}", error);
    }

    let exit_code = match summary.outcome {
        ExportOutcome::Failure => 20,
        ExportOutcome::Success | ExportOutcome::PartialSuccess => 0,
    };

    Ok((summary, exit_code))
}

fn build_config(args: ExportArgs, settings: &Settings) -> mcm_export::Result<ExportConfig> {
    let server = args.server.or_else(|| settings.server.clone());
    let account = args.account.or_else(|| settings.account.clone());
    let output = args.output.or_else(|| settings.output.clone());

    let (server, account, output) = match (server, account, output) {
        (Some(server), Some(account), Some(output)) => (server, account, output),
        (server, account, output) => {
            let mut missing = Vec::new();
            if server.is_none() {
                missing.push("--server".to_string());
            }
            if account.is_none() {
                missing.push("--account".to_string());
            }
            if output.is_none() {
                missing.push("--output".to_string());
            }
            return Err(Error::validation_missing_argument(missing));
        }
    };

    if !server.starts_with("http://") && !server.starts_with("https://") {
        return Err(Error::validation_invalid_argument(
            "server",
            "server must start with http:// or https://",
            None,
            None,
        ));
    }

    let limit = args.limit.or(settings.limit);
    if limit == Some(0) {
        return Err(Error::validation_invalid_argument(
            "limit",
            "limit must be at least 1",
            None,
            None,
        ));
    }

    let service = args
        .keychain_service
        .or_else(|| settings.keychain_service.clone())
        .unwrap_or_else(|| defaults::KEYCHAIN_SERVICE.to_string());

    let output = PathBuf::from(shellexpand::tilde(&output).into_owned());
    let content_root = args
        .content_root
        .or_else(|| settings.content_root.clone())
        .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()));

    Ok(ExportConfig {
        server,
        account,
        service,
        password: args.password,
        output,
        content_root,
        limit,
        insecure: args.insecure || settings.insecure.unwrap_or(false),
        prune: args.prune,
    })
}
