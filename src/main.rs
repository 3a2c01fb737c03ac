use clap::Parser;
use kumosim::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
