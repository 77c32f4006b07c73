//! Glue library for the ticket-POD pipeline.
//!
//! Converts attendee records into signed POD attestation objects. The
//! cryptography lives behind the [`signer::PodSigner`] seam; everything
//! else here is field remapping, a product side-table, and the per-row
//! conversion combinators the command-line tools are built from.

pub mod convert;
pub mod error;
pub mod pod;
pub mod products;
pub mod signer;
pub mod ticket;

pub use crate::error::PodError;
pub use crate::pod::{Pod, PodEntries, PodValue};
pub use crate::signer::{Ed25519Signer, PodSigner};
