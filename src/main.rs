//! Command-line tool for rendering outfits from outfit codes

use std::process::ExitCode;

use outfitstore::cli;

fn main() -> ExitCode {
    cli::run()
}
