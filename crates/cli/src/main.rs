use clap::{Parser, Subcommand};
use handbook_core::{extract, HandbookConfig, HandbookStore, DEFAULT_HANDBOOK_DATA_DIR};
use handbook_keys::{Jwk, JwkSet, DEFAULT_KEY_ID};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "handbook")]
#[command(about = "Course handbook LTI tool CLI")]
struct Cli {
    /// Directory holding one <COURSE_CODE>.json handbook per course
    #[arg(long, global = true, env = "HANDBOOK_DATA_DIR", default_value = DEFAULT_HANDBOOK_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List course codes that have a handbook
    List,
    /// Print the extracted handbook record for a course as JSON
    Show {
        /// Course code, for example EDET100
        code: String,
    },
    /// Print the JWKS for the tool's RSA public key
    Jwk {
        /// PEM file holding a PUBLIC KEY or CERTIFICATE block
        pem: PathBuf,
        /// Key id to publish
        #[arg(long, default_value = DEFAULT_KEY_ID)]
        kid: String,
    },
}

fn store(data_dir: PathBuf) -> Result<HandbookStore, Box<dyn std::error::Error>> {
    let cfg = HandbookConfig::new(data_dir)?;
    Ok(HandbookStore::new(Arc::new(cfg)))
}

/// Pretty JSON of the extracted record, or `None` when the course has no usable handbook.
fn show(store: &HandbookStore, code: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let document = store.load_optional(code)?;
    match document.as_ref().and_then(extract) {
        Some(record) => Ok(Some(serde_json::to_string_pretty(&record)?)),
        None => Ok(None),
    }
}

fn jwks_json(pem: &Path, kid: &str) -> Result<String, Box<dyn std::error::Error>> {
    let pem_text = std::fs::read_to_string(pem)?;
    let jwk = Jwk::from_public_key_pem(&pem_text, kid)?;
    Ok(serde_json::to_string_pretty(&JwkSet::single(jwk))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => {
            let codes = store(cli.data_dir)?.course_codes()?;
            if codes.is_empty() {
                println!("No handbooks found.");
            } else {
                for code in codes {
                    println!("{}", code);
                }
            }
        }
        Some(Commands::Show { code }) => match show(&store(cli.data_dir)?, &code)? {
            Some(json) => println!("{}", json),
            None => println!("No handbook found for {}", code),
        },
        Some(Commands::Jwk { pem, kid }) => match jwks_json(&pem, &kid) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error reading public key {}: {}", pem.display(), e),
        },
        None => {
            println!("Use 'handbook --help' for commands");
        }
    }

    Ok(())
}
