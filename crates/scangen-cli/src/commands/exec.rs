use crate::cli::ExecArgs;
use crate::util::{compile_rules, read_input};

pub fn run(args: ExecArgs) {
    let session = compile_rules(&args.rules, args.no_simplify);

    let input = match (&args.input.text, &args.input.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_input(path),
        (None, None) => unreachable!("clap enforces one input source"),
    };

    let machine = session.machine();
    match machine.tokenize(input.as_bytes()) {
        Ok(tokens) => {
            for token in &tokens {
                let text = &input.as_bytes()[token.start..token.start + token.len];
                println!(
                    "{:>6}..{:<6} {:<24} {:?}",
                    token.start,
                    token.start + token.len,
                    token.action,
                    String::from_utf8_lossy(text),
                );
            }
            eprintln!("{} token(s)", tokens.len());
        }
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
