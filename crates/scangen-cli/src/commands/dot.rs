use crate::cli::DotArgs;
use crate::util::{compile_rules, write_output};

pub fn run(args: DotArgs) {
    let session = compile_rules(&args.rules, args.no_simplify);
    write_output(args.output.as_deref(), &session.to_dot());
}
