use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scangen", bin_name = "scangen")]
#[command(about = "Scanner generator: rule files of (pattern, action) pairs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a Rust scanner module from a rule file
    #[command(after_help = r#"EXAMPLES:
  scangen gen tokens.sg -o scanner.rs
  scangen gen tokens.sg --dot graph.dot
  cat tokens.sg | scangen gen -"#)]
    Gen(GenArgs),

    /// Render the decision graph in Graphviz dot form
    #[command(after_help = r#"EXAMPLES:
  scangen dot tokens.sg | dot -Tsvg > graph.svg"#)]
    Dot(DotArgs),

    /// Tokenize an input with the compiled rules, without generating code
    #[command(after_help = r#"EXAMPLES:
  scangen exec tokens.sg input.txt
  scangen exec tokens.sg --text 'hello 42'"#)]
    Exec(ExecArgs),
}

#[derive(Args)]
pub struct GenArgs {
    /// Rule file (use "-" for stdin)
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Write the generated module here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the sibling-merge simplification pass
    #[arg(long = "no-simplify")]
    pub no_simplify: bool,

    /// Also write the decision graph in dot form
    #[arg(long, value_name = "FILE")]
    pub dot: Option<PathBuf>,
}

#[derive(Args)]
pub struct DotArgs {
    /// Rule file (use "-" for stdin)
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Write the dot output here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the sibling-merge simplification pass
    #[arg(long = "no-simplify")]
    pub no_simplify: bool,
}

#[derive(Args)]
#[group(id = "exec_input", required = true, multiple = false)]
pub struct ExecInput {
    /// Input file to tokenize (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    pub file: Option<PathBuf>,

    /// Inline input text
    #[arg(short = 't', long = "text", value_name = "TEXT")]
    pub text: Option<String>,
}

#[derive(Args)]
pub struct ExecArgs {
    /// Rule file
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    #[command(flatten)]
    pub input: ExecInput,

    /// Skip the sibling-merge simplification pass
    #[arg(long = "no-simplify")]
    pub no_simplify: bool,
}
