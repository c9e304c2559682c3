#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// Converting expenses to and from their stored line form
pub mod codec;
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Functions for loading, saving and exporting ledgers
pub mod io;
/// Ledger mutations and aggregations
pub mod ops;
/// The interactive menu session
pub mod session;
/// File-backed and in-memory storage
pub mod storage;
/// Data types used throughout the tracker
pub mod types;
