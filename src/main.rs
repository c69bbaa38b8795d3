use clap::Parser;

use dayplan::cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = dayplan::run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
