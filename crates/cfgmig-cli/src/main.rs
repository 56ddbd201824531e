use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = cfgmig_cli::command().get_matches();
    cfgmig_cli::logging::init(matches.get_flag("log-json"));

    match cfgmig_cli::run(&matches) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "cfgmig failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
