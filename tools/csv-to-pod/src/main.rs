use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use structopt::StructOpt;

use ticket_pod::convert::{convert_attendee, now_millis};
use ticket_pod::signer::Ed25519Signer;
use ticket_pod::ticket::{AttendeeRecord, DEVCON7};

/// Convert an attendee CSV into signed ticket PODs
#[derive(StructOpt)]
struct Cli {
    /// Input CSV with attendeeName/attendeeEmail/ticketName/ticketSecret/ticketId columns
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Signing private key (32 bytes, hex or base64)
    key: String,

    /// Output CSV path
    #[structopt(parse(from_os_str))]
    output: PathBuf,
}

// Each required column may appear in either spelling.
const REQUIRED_COLUMNS: [(&str, &str); 5] = [
    ("attendeeName", "attendee_name"),
    ("attendeeEmail", "attendee_email"),
    ("ticketName", "ticket_name"),
    ("ticketSecret", "ticket_secret"),
    ("ticketId", "ticket_id"),
];

fn main() -> Result<()> {
    let args = Cli::from_args();

    let signer = Ed25519Signer::from_key_str(&args.key).context("invalid signer private key")?;

    let file = File::open(&args.input)
        .with_context(|| format!("could not read input csv {}", args.input.display()))?;
    let mut reader = csv::ReaderBuilder::new().from_reader(file);

    let headers = reader.headers().context("could not read csv header")?.clone();
    for (camel, snake) in &REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *camel || h == *snake) {
            bail!("input csv is missing required column {}", camel);
        }
    }

    println!("Parsing input CSV...");
    let mut attendees: Vec<AttendeeRecord> = Vec::new();
    for line in reader.deserialize() {
        let record: AttendeeRecord = line.context("could not parse csv row")?;
        attendees.push(record);
    }
    println!("Found {} attendees", attendees.len());
    if attendees.is_empty() {
        bail!("no attendees found in input csv");
    }

    println!("Creating and signing PODs...");
    let signed_at = now_millis();
    let mut rows = Vec::new();
    for attendee in &attendees {
        match convert_attendee(&signer, &DEVCON7, &DEVCON7.product_id, attendee, signed_at) {
            Ok(row) => {
                println!("Created POD for {}", row.email);
                rows.push(row);
            }
            Err(err) => {
                eprintln!("Failed to create POD for {}: {}", attendee.attendee_email, err)
            }
        }
    }
    println!("Successfully created {} PODs", rows.len());

    println!("Writing output CSV...");
    let mut writer = csv::WriterBuilder::new()
        .from_path(&args.output)
        .with_context(|| format!("could not create output csv {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    Ok(())
}
