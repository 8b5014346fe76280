use std::env;

use quantum_calc::{cli, config::AppConfig, logging};

fn main() {
    logging::init(AppConfig::from_env().log_level);
    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}
