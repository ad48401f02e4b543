//! Shared primitive types used across the entire engine.

/// A stable, unique identifier for a subscription or invoice.
pub type RecordId = String;

/// The owning client's identifier.
pub type ClientId = String;

/// A monetary amount in the ledger currency.
pub type Money = f64;
