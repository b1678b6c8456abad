//! Weft CLI
//!
//! Python source formatter.

use weftc::commands::run_format;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "fmt" | "format" => {
            std::process::exit(run_format(&args[2..]));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("weft {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Weft: a penalty-driven Python formatter");
    println!();
    println!("Usage: weft <command> [options]");
    println!();
    println!("Commands:");
    println!("  fmt <paths...|->     Format Python source files");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run 'weft fmt --help' for formatting options.");
}
