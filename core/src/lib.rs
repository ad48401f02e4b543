//! billdesk-core: the aging & dunning engine behind the billing desk.
//!
//! Pure, synchronous, stateless. Every function takes its inputs
//! explicitly, including `now`: nothing in this crate reads the system
//! clock, touches a store, or keeps a cache. Callers hold the record
//! snapshots and re-derive aging, status, and schedule fields on demand.

pub mod aggregate;
pub mod aging;
pub mod enrich;
pub mod error;
pub mod policy;
pub mod record;
pub mod schedule;
pub mod status;
pub mod types;
