//! Command-line tool for converting print_r() dumps to PHP code.
//!
//! Usage: printr [OPTIONS] [FILE]
//!
//! Reads a print_r() dump from FILE (or stdin), reconstructs the data
//! it describes, and prints equivalent PHP literal source wrapped in a
//! `$data = ...;` assignment.
//!
//! Options:
//!   -b, --bare             Print the bare literal without the assignment
//!   -o, --output <FILE>    Write output to FILE instead of stdout
//!   --max-len <BYTES>      Maximum accepted input size [default: 1048576]
//!   -h, --help             Print help
//!   -V, --version          Print version

use libprintr::{export, parse, Value};
use std::fs;
use std::io::{self, Read, Write};
use std::process;

const DEFAULT_MAX_LEN: usize = 1024 * 1024;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut bare = false;
    let mut output_file: Option<&str> = None;
    let mut max_len = DEFAULT_MAX_LEN;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("printr {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-b" | "--bare" => {
                bare = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -o requires a file argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--max-len" => {
                i += 1;
                let value = args.get(i).and_then(|s| s.parse::<usize>().ok());
                match value {
                    Some(n) => max_len = n,
                    None => {
                        eprintln!("Error: --max-len requires a byte count");
                        process::exit(1);
                    }
                }
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                eprintln!("Error: unknown option {}", arg);
                process::exit(1);
            }
            arg => {
                if input_path.is_some() {
                    eprintln!("Error: more than one input file");
                    process::exit(1);
                }
                input_path = Some(arg);
            }
        }
        i += 1;
    }

    let input = match read_input(input_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };
    if input.len() > max_len {
        eprintln!(
            "Error: maximum input length of {} exceeded: {}",
            max_len,
            input.len()
        );
        process::exit(1);
    }

    // The core expects a single newline convention.
    let input = input.replace("\r\n", "\n");

    let output = match run(&input, bare) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    match output_file {
        Some(path) => {
            if let Err(err) = fs::write(path, format!("{}\n", output)) {
                eprintln!("Error: cannot write {}: {}", path, err);
                process::exit(1);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if writeln!(handle, "{}", output).is_err() {
                process::exit(1);
            }
        }
    }
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some("-") | None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("cannot read stdin: {}", err))?;
            Ok(text)
        }
        Some(path) => {
            fs::read_to_string(path).map_err(|err| format!("cannot read {}: {}", path, err))
        }
    }
}

fn run(input: &str, bare: bool) -> Result<String, libprintr::ParseError> {
    let value = parse(input)?;
    let literal = match &value {
        Some(value) => export(value),
        None => "NULL".to_string(),
    };
    if bare {
        return Ok(literal);
    }
    // Arrays get $data, everything else $object, like the original
    // converter's output naming.
    let name = match value {
        Some(Value::Sequence(_)) | Some(Value::Mapping(_)) => "data",
        _ => "object",
    };
    Ok(format!("${} = {};", name, literal))
}

fn print_help() {
    println!("printr - convert print_r() dump text to PHP literal source");
    println!();
    println!("Usage: printr [OPTIONS] [FILE]");
    println!();
    println!("Reads the dump from FILE, or stdin when FILE is absent or '-'.");
    println!();
    println!("Options:");
    println!("  -b, --bare             Print the bare literal without the assignment");
    println!("  -o, --output <FILE>    Write output to FILE instead of stdout");
    println!("  --max-len <BYTES>      Maximum accepted input size [default: 1048576]");
    println!("  -h, --help             Print help");
    println!("  -V, --version          Print version");
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn test_run_wraps_assignment() {
        let out = run("Array\n(\n    [0] => 1\n)\n", false).unwrap();
        assert_eq!(out, "$data = array(1);");
    }

    #[test]
    fn test_run_bare() {
        let out = run("Array\n(\n    [0] => 1\n)\n", true).unwrap();
        assert_eq!(out, "array(1)");
    }

    #[test]
    fn test_run_object_naming() {
        let out = run("stdClass Object\n(\n)\n", false).unwrap();
        assert_eq!(out, "$object = (object) array();");
    }

    #[test]
    fn test_run_empty_input_is_null() {
        let out = run("", false).unwrap();
        assert_eq!(out, "$object = NULL;");
    }
}
