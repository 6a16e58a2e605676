mod cli;
mod commands;
mod util;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Gen(args) => commands::r#gen::run(args),
        Command::Dot(args) => commands::dot::run(args),
        Command::Exec(args) => commands::exec::run(args),
    }
}
