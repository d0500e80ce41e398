use clap::Parser;
use foliotrack::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
