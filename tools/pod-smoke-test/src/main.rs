use anyhow::{Context, Result};
use structopt::StructOpt;

use ticket_pod::convert::now_millis;
use ticket_pod::pod::{PodEntries, PodValue};
use ticket_pod::signer::{Ed25519Signer, PodSigner};

/// Sign one in-memory POD and print diagnostics
///
/// Not part of the production pipeline; exists to sanity-check the
/// signing path without any CSV files.
#[derive(StructOpt)]
struct Cli {
    /// Signing private key (hex or base64); a throwaway test key by default
    #[structopt(
        long,
        default_value = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
    )]
    key: String,
}

fn main() -> Result<()> {
    let args = Cli::from_args();
    let signer = Ed25519Signer::from_key_str(&args.key).context("invalid private key")?;

    let mut entries = PodEntries::new();
    entries.insert(
        "name".to_owned(),
        PodValue::String("Test User".to_owned()),
    );
    entries.insert(
        "email".to_owned(),
        PodValue::String("test@example.com".to_owned()),
    );
    entries.insert("timestamp".to_owned(), PodValue::Int(now_millis()));

    println!("Creating test POD...");
    let pod = signer.sign(entries)?;
    println!("POD created successfully!");
    println!("Content ID: {}", pod.content_id()?);
    println!("Signature valid: {}", pod.verify_signature());
    println!("JSON: {}", serde_json::to_string_pretty(&pod)?);

    Ok(())
}
