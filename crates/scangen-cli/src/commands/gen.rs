use crate::cli::GenArgs;
use crate::util::{compile_rules, write_output};

pub fn run(args: GenArgs) {
    let session = compile_rules(&args.rules, args.no_simplify);

    if let Some(dot_path) = &args.dot {
        write_output(Some(dot_path), &session.to_dot());
    }

    let code = match session.emit_scanner() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };
    write_output(args.output.as_deref(), &code);
}
