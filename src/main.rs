use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;

use commands::{export, keychain};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "mcm-export")]
#[command(version = VERSION)]
#[command(about = "Export MCM AdminService application records and their scripts")]
struct Cli {
    /// Settings file path (default: ~/.config/mcm-export/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a one-shot export of the application inventory
    Export(export::ExportArgs),
    /// Manage stored AdminService credentials
    Keychain(keychain::KeychainArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config.clone(),
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    mcm_export::output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
