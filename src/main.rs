use std::process;

use clap::Parser;
use jsondude::cli::jsondude_cli::Cli;

fn main() {
    jsondude::init_tracing();
    let cli = Cli::parse();
    match jsondude::run(cli) {
        Ok(out) => print!("{out}"),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
