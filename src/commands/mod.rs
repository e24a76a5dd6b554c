pub type CmdResult<T> = mcm_export::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub(crate) config: Option<String>,
}

pub mod export;
pub mod keychain;

macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        mcm_export::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (mcm_export::Result<serde_json::Value>, i32) {
    mcm_export::tty::status("mcm-export is working...");

    match command {
        crate::Commands::Export(args) => dispatch!(args, global, export),
        crate::Commands::Keychain(args) => dispatch!(args, global, keychain),
    }
}
