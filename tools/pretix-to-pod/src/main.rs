use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use structopt::StructOpt;
use uuid::Uuid;

use ticket_pod::convert::{now_millis, resolve_and_convert, SkipReason};
use ticket_pod::products::ProductMap;
use ticket_pod::signer::Ed25519Signer;
use ticket_pod::ticket::{AttendeeRecord, DEVCON7};

/// Missing-product diagnostic log, truncated at the start of each run.
const MISSING_PRODUCT_LOG: &str = "missing-products.log";

/// Convert a Pretix attendee export into signed ticket PODs
#[derive(StructOpt)]
struct Cli {
    /// Input CSV with "Attendee name"/"Attendee email"/Product/"Ticket secret" columns
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Signing private key (32 bytes, hex or base64)
    key: String,

    /// Output CSV path
    #[structopt(parse(from_os_str))]
    output: PathBuf,

    /// Product name -> product id mapping file
    #[structopt(long, parse(from_os_str), default_value = "product-mapping.json")]
    products: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PretixRow {
    #[serde(rename = "Attendee name", default)]
    attendee_name: String,
    #[serde(rename = "Attendee email", default)]
    attendee_email: String,
    #[serde(rename = "Product", default)]
    product: String,
    #[serde(rename = "Ticket secret", default)]
    ticket_secret: String,
    // Optional; a v4 UUID is generated when absent or empty.
    #[serde(rename = "Ticket id", default)]
    ticket_id: String,
}

const REQUIRED_COLUMNS: [&str; 4] = [
    "Attendee name",
    "Attendee email",
    "Product",
    "Ticket secret",
];

fn main() -> Result<()> {
    let args = Cli::from_args();

    let signer = Ed25519Signer::from_key_str(&args.key).context("invalid signer private key")?;
    let products = ProductMap::load(&args.products)
        .with_context(|| format!("could not load product mapping {}", args.products.display()))?;
    println!("Loaded {} product mappings", products.len());

    let file = File::open(&args.input)
        .with_context(|| format!("could not read input csv {}", args.input.display()))?;
    let mut reader = csv::ReaderBuilder::new().from_reader(file);

    let headers = reader.headers().context("could not read csv header")?.clone();
    for column in &REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            bail!("input csv is missing required column \"{}\"", column);
        }
    }

    let mut log = LineWriter::new(
        File::create(MISSING_PRODUCT_LOG).context("could not open missing-product log")?,
    );

    println!("Creating and signing PODs...");
    let signed_at = now_millis();
    let mut rows = Vec::new();
    let mut dropped = 0usize;
    let mut row_num = 0usize;
    for line in reader.deserialize() {
        row_num += 1;
        let row: PretixRow = line.context("could not parse csv row")?;
        let record = AttendeeRecord {
            attendee_name: row.attendee_name,
            attendee_email: row.attendee_email,
            ticket_name: row.product.clone(),
            ticket_secret: row.ticket_secret,
            ticket_id: if row.ticket_id.trim().is_empty() {
                Uuid::new_v4().to_string()
            } else {
                row.ticket_id
            },
        };

        match resolve_and_convert(&signer, &DEVCON7, &products, &record, &row.product, signed_at) {
            Ok(out) => {
                println!("Created POD for {}", out.email);
                rows.push(out);
            }
            Err(SkipReason::MissingProduct { label }) => {
                dropped += 1;
                writeln!(
                    log,
                    "[{}] row {}: no product mapping for \"{}\" (email: {})",
                    chrono::Utc::now().to_rfc3339(),
                    row_num,
                    label,
                    record.attendee_email
                )?;
            }
            Err(SkipReason::Signing(err)) => {
                dropped += 1;
                eprintln!("Failed to create POD for {}: {}", record.attendee_email, err);
            }
        }
    }
    log.flush()?;

    if row_num == 0 {
        bail!("no attendees found in input csv");
    }

    let mut writer = csv::WriterBuilder::new()
        .from_path(&args.output)
        .with_context(|| format!("could not create output csv {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Signed {} PODs, dropped {} rows", rows.len(), dropped);
    println!("Output written to {}", args.output.display());

    Ok(())
}
