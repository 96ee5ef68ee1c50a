use std::path::PathBuf;

use clap::Parser;
use protoperson::{
    api::descriptor::PERSON,
    inspect::{self, InspectOptions, render},
};

/// Print the protobuf wire layout of a serialized Person record
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Serialized record to inspect
    #[arg(default_value = "person.bin")]
    path: PathBuf,

    /// Stop at the first malformed field instead of flagging it
    #[arg(long)]
    break_on_error: bool,

    /// Show raw field numbers without resolving Person field names
    #[arg(long)]
    raw: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let bytes = match std::fs::read(&cli.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::error!("file read error: {}: {err}", cli.path.display());
            std::process::exit(1);
        }
    };

    let options = InspectOptions {
        break_on_error: cli.break_on_error,
    };
    match inspect::inspect(&bytes, &options) {
        Ok(inspection) => {
            let schema = (!cli.raw).then_some(&PERSON);
            print!("{}", render::render(&inspection, schema));
            if inspection.has_error {
                log::warn!("Input does not look like a well-formed message");
            }
        }
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}
