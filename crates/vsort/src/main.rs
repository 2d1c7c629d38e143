#![forbid(unsafe_code)]

use clap::Parser;

fn main() {
    let cli = vsort::Cli::parse();
    let json = cli.json;
    if let Err(error) = vsort::run(cli) {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("vsort: {error}");
        }
        std::process::exit(error.exit_code());
    }
}
