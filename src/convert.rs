//! The per-row conversion pipeline from attendee records to output
//! rows. Callers iterate rows, log `Err` cases, and keep going; a row
//! either becomes exactly one output row or is dropped with a reason.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::PodError;
use crate::products::ProductMap;
use crate::signer::PodSigner;
use crate::ticket::{build_entries, AttendeeRecord, EventConfig};

/// Characters left raw by JavaScript's `encodeURIComponent`, which is
/// what consumers of the URL-encoded column expect.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One persisted output row: email plus the signed POD JSON.
#[derive(Debug, Serialize)]
pub struct OutputRow {
    #[serde(rename = "EMAIL")]
    pub email: String,
    #[serde(rename = "POD")]
    pub pod: String,
}

/// Output row with the additional URL-encoded POD column.
#[derive(Debug, Serialize)]
pub struct OutputRowUrl {
    #[serde(rename = "EMAIL")]
    pub email: String,
    #[serde(rename = "POD")]
    pub pod: String,
    #[serde(rename = "POD_URLENCODED")]
    pub pod_urlencoded: String,
}

/// Why a row produced no output.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    /// The product label was empty or absent from the mapping.
    #[error("no product mapping for \"{label}\"")]
    MissingProduct { label: String },

    /// The signer rejected the assembled entries.
    #[error("signing failed: {0}")]
    Signing(#[from] PodError),
}

/// Current wall-clock time in milliseconds, the unit of
/// `timestampSigned`.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Percent-encode a POD JSON string for the `POD_URLENCODED` column.
pub fn url_encode(json: &str) -> String {
    utf8_percent_encode(json, FORM_ENCODE).to_string()
}

/// Sign one attendee with a fixed product id (single-product runs).
pub fn convert_attendee(
    signer: &dyn PodSigner,
    event: &EventConfig,
    product_id: &str,
    record: &AttendeeRecord,
    timestamp_signed: i64,
) -> Result<OutputRow, PodError> {
    let entries = build_entries(record, event, product_id, timestamp_signed);
    let pod = signer.sign(entries)?;
    Ok(OutputRow {
        email: record.attendee_email.clone(),
        pod: pod.to_json_string()?,
    })
}

/// Resolve the product label through the mapping, then sign. The
/// caller logs the skip reason and moves on to the next row.
pub fn resolve_and_convert(
    signer: &dyn PodSigner,
    event: &EventConfig,
    products: &ProductMap,
    record: &AttendeeRecord,
    product_label: &str,
    timestamp_signed: i64,
) -> Result<OutputRowUrl, SkipReason> {
    let product_id = products
        .resolve(product_label)
        .ok_or_else(|| SkipReason::MissingProduct {
            label: product_label.to_owned(),
        })?;
    let entries = build_entries(record, event, product_id, timestamp_signed);
    let pod = signer.sign(entries)?;
    let pod_json = pod.to_json_string()?;
    let pod_urlencoded = url_encode(&pod_json);
    Ok(OutputRowUrl {
        email: record.attendee_email.clone(),
        pod: pod_json,
        pod_urlencoded,
    })
}
