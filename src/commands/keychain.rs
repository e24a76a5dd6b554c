use clap::{Args, Subcommand};
use serde::Serialize;

use mcm_export::defaults;
use mcm_export::keychain;
use mcm_export::tty::prompt_password;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct KeychainArgs {
    #[command(subcommand)]
    command: KeychainCommand,
}

#[derive(Subcommand)]
enum KeychainCommand {
    /// Store a credential for an account
    Set {
        /// Account identifier
        #[arg(long)]
        account: String,

        /// Secret store service name
        #[arg(long)]
        service: Option<String>,

        /// Secret value (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove a stored credential
    Remove {
        /// Account identifier
        #[arg(long)]
        account: String,

        /// Secret store service name
        #[arg(long)]
        service: Option<String>,
    },

    /// Check whether a credential is stored
    Status {
        /// Account identifier
        #[arg(long)]
        account: String,

        /// Secret store service name
        #[arg(long)]
        service: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum KeychainOutput {
    Set {
        account: String,
        service: String,
    },
    Remove {
        account: String,
        service: String,
    },
    Status {
        account: String,
        service: String,
        present: bool,
    },
}

pub fn run(args: KeychainArgs, _global: &GlobalArgs) -> CmdResult<KeychainOutput> {
    match args.command {
        KeychainCommand::Set {
            account,
            service,
            password,
        } => run_set(account, service, password),
        KeychainCommand::Remove { account, service } => run_remove(account, service),
        KeychainCommand::Status { account, service } => run_status(account, service),
    }
}

fn service_or_default(service: Option<String>) -> String {
    service.unwrap_or_else(|| defaults::KEYCHAIN_SERVICE.to_string())
}

fn run_set(
    account: String,
    service: Option<String>,
    password: Option<String>,
) -> CmdResult<KeychainOutput> {
    let service = service_or_default(service);

    let secret = match password {
        Some(pw) => pw,
        None => prompt_password("Password: ")?,
    };

    if secret.is_empty() {
        return Err(mcm_export::Error::validation_invalid_argument(
            "password",
            "Secret must not be empty",
            None,
            None,
        ));
    }

    keychain::store(&service, &account, &secret)?;

    Ok((KeychainOutput::Set { account, service }, 0))
}

fn run_remove(account: String, service: Option<String>) -> CmdResult<KeychainOutput> {
    let service = service_or_default(service);

    keychain::delete(&service, &account)?;

    Ok((KeychainOutput::Remove { account, service }, 0))
}

fn run_status(account: String, service: Option<String>) -> CmdResult<KeychainOutput> {
    let service = service_or_default(service);

    let present = keychain::exists(&service, &account);

    Ok((
        KeychainOutput::Status {
            account,
            service,
            present,
        },
        0,
    ))
}
