//! In-memory session cache.
//!
//! Values fetched from the store are wrapped in `CachedData` so callers can
//! show how old they are. Nothing is written to disk.

pub mod cached;

pub use cached::CachedData;
