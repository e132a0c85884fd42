//! Cellweave - run edit scripts against a spreadsheet

mod config;
mod error;
mod script;

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use cellweave_core::Sheet;
use config::PrintMode;

fn print_usage() {
    eprintln!("Usage: cellweave [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [SCRIPT]                  Edit script to run (default: stdin)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --print <MODE>        Print the sheet afterwards: values | texts");
    eprintln!("  -k, --keep-going          Report failing lines and continue");
    eprintln!("  --config <FILE>           Load settings from a TOML file");
    eprintln!("  -h, --help                Print help");
}

struct Args {
    script: Option<PathBuf>,
    config: Option<PathBuf>,
    print: Option<PrintMode>,
    keep_going: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut parsed = Args {
        script: None,
        config: None,
        print: None,
        keep_going: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-p" | "--print" => {
                i += 1;
                let Some(mode) = args.get(i) else {
                    eprintln!("Error: --print requires a mode");
                    return None;
                };
                match mode.parse::<PrintMode>() {
                    Ok(mode) => parsed.print = Some(mode),
                    Err(e) => {
                        eprintln!("Error: --print: {}", e);
                        return None;
                    }
                }
            }
            "-k" | "--keep-going" => parsed.keep_going = true,
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("Error: --config requires a file path");
                    return None;
                };
                parsed.config = Some(PathBuf::from(path));
            }
            arg if arg.starts_with('-') && arg != "-" => {
                eprintln!("Error: Unknown option: {}", arg);
                return None;
            }
            _ => {
                if parsed.script.is_none() {
                    parsed.script = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    return None;
                }
            }
        }
        i += 1;
    }
    Some(parsed)
}

fn run(args: Args) -> anyhow::Result<usize> {
    let config = config::load_config(args.config.as_deref())?;
    let keep_going = args.keep_going || config.keep_going;
    let print = args.print.or(config.print);

    let mut sheet = Sheet::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut errors = io::stderr();

    let failures = match args.script.as_ref().filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))?;
            script::run_script(&mut sheet, BufReader::new(file), &mut out, &mut errors, keep_going)?
        }
        None => {
            let stdin = io::stdin();
            script::run_script(&mut sheet, stdin.lock(), &mut out, &mut errors, keep_going)?
        }
    };
    log::debug!("script finished with {} failed line(s)", failures);

    match print {
        Some(PrintMode::Values) => sheet.print_values(&mut out)?,
        Some(PrintMode::Texts) => sheet.print_texts(&mut out)?,
        None => {}
    }
    out.flush()?;
    Ok(failures)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(args) = parse_args(&args) else {
        print_usage();
        std::process::exit(2);
    };

    match run(args) {
        Ok(0) => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
