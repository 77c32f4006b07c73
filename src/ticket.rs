//! Attendee records and the fixed event configuration that together
//! make up a ticket POD's entries.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::pod::{PodEntries, PodValue};

/// One attendee row from an input CSV.
///
/// Headers are camelCase with snake_case tolerated as an alias;
/// missing cells default to empty strings and are passed through
/// unvalidated.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendeeRecord {
    #[serde(rename = "attendeeName", alias = "attendee_name", default)]
    pub attendee_name: String,
    #[serde(rename = "attendeeEmail", alias = "attendee_email", default)]
    pub attendee_email: String,
    #[serde(rename = "ticketName", alias = "ticket_name", default)]
    pub ticket_name: String,
    #[serde(rename = "ticketSecret", alias = "ticket_secret", default)]
    pub ticket_secret: String,
    #[serde(rename = "ticketId", alias = "ticket_id", default)]
    pub ticket_id: String,
}

/// Fixed per-event attributes stamped into every POD of a run.
///
/// Held as a named value rather than inline literals so a different
/// event is a one-struct substitution.
#[derive(Debug, Clone)]
pub struct EventConfig {
    pub event_name: String,
    pub event_id: String,
    /// Product id used when the whole run has a single product.
    pub product_id: String,
    pub timestamp_consumed: i64,
    pub image_url: String,
    pub event_start_date: String,
    pub event_location: String,
    pub is_add_on: bool,
    pub is_consumed: bool,
    pub is_revoked: bool,
    pub ticket_category: i64,
}

/// The Devcon 7 constants used by the original batch runs.
pub static DEVCON7: Lazy<EventConfig> = Lazy::new(|| EventConfig {
    event_name: "Devcon 7".to_owned(),
    event_id: "5074edf5-f079-4099-b036-22223c0c69953".to_owned(),
    product_id: "f15237ec-abd9-40ae-8e61-9cf8a7a60c3f3".to_owned(),
    timestamp_consumed: 1_731_226_670_791,
    image_url: "/images/devcon/devcon-landscape.webp".to_owned(),
    event_start_date: "2024-11-09T08:00:00.000".to_owned(),
    event_location: "Bangkok, Thailand".to_owned(),
    is_add_on: false,
    is_consumed: true,
    is_revoked: false,
    ticket_category: 4,
});

/// Merge an attendee, the event constants, the resolved product id, and
/// the per-run signing timestamp into the full 17-entry typed map.
pub fn build_entries(
    record: &AttendeeRecord,
    event: &EventConfig,
    product_id: &str,
    timestamp_signed: i64,
) -> PodEntries {
    fn put_str(entries: &mut PodEntries, key: &str, value: &str) {
        entries.insert(key.to_owned(), PodValue::String(value.to_owned()));
    }

    let mut entries = PodEntries::new();

    put_str(&mut entries, "attendeeName", &record.attendee_name);
    put_str(&mut entries, "attendeeEmail", &record.attendee_email);
    put_str(&mut entries, "eventName", &event.event_name);
    put_str(&mut entries, "ticketName", &record.ticket_name);
    put_str(&mut entries, "ticketSecret", &record.ticket_secret);
    put_str(&mut entries, "ticketId", &record.ticket_id);
    put_str(&mut entries, "eventId", &event.event_id);
    put_str(&mut entries, "productId", product_id);
    put_str(&mut entries, "imageUrl", &event.image_url);
    put_str(&mut entries, "eventStartDate", &event.event_start_date);
    put_str(&mut entries, "eventLocation", &event.event_location);

    entries.insert(
        "timestampConsumed".to_owned(),
        PodValue::Int(event.timestamp_consumed),
    );
    entries.insert(
        "timestampSigned".to_owned(),
        PodValue::Int(timestamp_signed),
    );
    entries.insert("isAddOn".to_owned(), PodValue::Boolean(event.is_add_on));
    entries.insert(
        "isConsumed".to_owned(),
        PodValue::Boolean(event.is_consumed),
    );
    entries.insert("isRevoked".to_owned(), PodValue::Boolean(event.is_revoked));
    entries.insert(
        "ticketCategory".to_owned(),
        PodValue::Int(event.ticket_category),
    );

    entries
}
