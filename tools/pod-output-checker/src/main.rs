use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use structopt::StructOpt;

use ticket_pod::pod::Pod;

const REQUIRED_COLUMNS: [&str; 3] = ["EMAIL", "POD", "POD_URLENCODED"];

const REQUIRED_POD_FIELDS: [&str; 10] = [
    "productId",
    "eventId",
    "attendeeName",
    "attendeeEmail",
    "ticketName",
    "ticketSecret",
    "ticketId",
    "eventName",
    "timestampSigned",
    "timestampConsumed",
];

/// Validate a CSV produced by the POD converters
///
/// Checks required columns, parses each POD, checks required fields,
/// and verifies signatures. Duplicate emails are warnings. No data
/// leaves the machine; all checks are local.
#[derive(StructOpt)]
struct Cli {
    /// The output CSV to check
    #[structopt(parse(from_os_str))]
    csv: PathBuf,
}

/// An entry is missing when absent, null, or carrying a null or empty
/// value.
fn entry_missing(entries: &serde_json::Value, field: &str) -> bool {
    match entries.get(field) {
        None | Some(serde_json::Value::Null) => true,
        Some(entry) => match entry.get("value") {
            Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(s)) => s.is_empty(),
            // Untyped entries are left for the structural parse to flag.
            _ => false,
        },
    }
}

fn main() -> Result<()> {
    let args = Cli::from_args();

    let file = File::open(&args.csv)
        .with_context(|| format!("File not found: {}", args.csv.display()))?;
    let mut reader = csv::ReaderBuilder::new().from_reader(file);

    let headers = reader.headers().context("could not read csv header")?.clone();
    let index_of = |name: &str| headers.iter().position(|h| h == name);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| index_of(c).is_none())
        .copied()
        .collect();
    let (email_idx, pod_idx, url_idx) =
        match (index_of("EMAIL"), index_of("POD"), index_of("POD_URLENCODED")) {
            (Some(e), Some(p), Some(u)) => (e, p, u),
            _ => bail!("Missing required columns: {}", missing.join(", ")),
        };

    let mut row_count = 0usize;
    let mut valid_count = 0usize;
    let mut invalid_count = 0usize;
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for result in reader.records() {
        let record = result.context("Error reading CSV")?;
        row_count += 1;

        let email = record.get(email_idx).unwrap_or("").trim().to_owned();
        if email.is_empty() {
            errors.push(format!("[Row {}] Missing EMAIL.", row_count));
            invalid_count += 1;
            continue;
        }
        let pod_json = record.get(pod_idx).unwrap_or("").trim();
        if pod_json.is_empty() {
            errors.push(format!("[Row {}] Missing POD for email: {}", row_count, email));
            invalid_count += 1;
            continue;
        }
        let pod_url = record.get(url_idx).unwrap_or("").trim();
        if pod_url.is_empty() {
            errors.push(format!(
                "[Row {}] Missing POD_URLENCODED for email: {}",
                row_count, email
            ));
            invalid_count += 1;
            continue;
        }

        if !seen.insert(email.clone()) {
            duplicates.push(email.clone());
        }

        let parsed: serde_json::Value = match serde_json::from_str(pod_json) {
            Ok(value) => value,
            Err(_) => {
                errors.push(format!(
                    "[Row {}] Invalid POD JSON for email: {}",
                    row_count, email
                ));
                invalid_count += 1;
                continue;
            }
        };

        let entries = parsed
            .get("entries")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let mut fields_missing = false;
        for field in &REQUIRED_POD_FIELDS {
            if entry_missing(&entries, field) {
                errors.push(format!(
                    "[Row {}] Missing required POD field '{}' for email: {}",
                    row_count, field, email
                ));
                fields_missing = true;
            }
        }
        if fields_missing {
            invalid_count += 1;
            continue;
        }

        match Pod::from_json_str(pod_json) {
            Ok(pod) => {
                if pod.verify_signature() {
                    valid_count += 1;
                } else {
                    errors.push(format!(
                        "[Row {}] Invalid POD signature for email: {}",
                        row_count, email
                    ));
                    invalid_count += 1;
                }
            }
            Err(err) => {
                errors.push(format!(
                    "[Row {}] POD structure/signature error for email: {}: {}",
                    row_count, email, err
                ));
                invalid_count += 1;
            }
        }
    }

    println!("Checked {} rows.", row_count);
    if !errors.is_empty() {
        eprintln!("Errors:");
        for error in &errors {
            eprintln!("  {}", error);
        }
    }

    let mut warned = HashSet::new();
    let warnings: Vec<String> = duplicates
        .iter()
        .filter(|email| warned.insert(email.clone()))
        .map(|email| format!("Duplicate email found (warning): {}", email))
        .collect();
    if !warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &warnings {
            eprintln!("  {}", warning);
        }
    }

    println!("Valid Rows: {}", valid_count);
    println!("Invalid Rows: {}", invalid_count);
    if errors.is_empty() {
        println!("All PODs are valid and all required fields are present.");
    }

    Ok(())
}
