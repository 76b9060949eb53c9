//! # Application Layer
//!
//! `DefaultLedgerService` wires the pure algorithms to the outbound ports.

pub mod service;

pub use service::DefaultLedgerService;
