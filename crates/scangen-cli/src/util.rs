use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use scangen_compiler::{CompileOptions, Session};

/// Read a file argument, with "-" meaning stdin.
pub fn read_input(path: &Path) -> String {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: failed to read stdin: {}", err);
            std::process::exit(1);
        }
        return buf;
    }
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: failed to read {}: {}", path.display(), err);
            std::process::exit(1);
        }
    }
}

/// Compile a rule file, rendering compile errors with the file name.
pub fn compile_rules(path: &Path, no_simplify: bool) -> Session {
    let rules = read_input(path);
    let opts = CompileOptions {
        simplify: !no_simplify,
    };
    match Session::compile(&rules, &opts) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {}: {}", path.display(), err);
            std::process::exit(1);
        }
    }
}

/// Write to a file, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) {
    match path {
        Some(path) => {
            if let Err(err) = fs::write(path, content) {
                eprintln!("error: failed to write {}: {}", path.display(), err);
                std::process::exit(1);
            }
        }
        None => {
            // A closed pipe is not an error worth reporting.
            let _ = io::stdout().write_all(content.as_bytes());
        }
    }
}
