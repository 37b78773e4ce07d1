use std::process::ExitCode;

fn main() -> ExitCode {
    match chirpgraph::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            chirpgraph::ui::output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
