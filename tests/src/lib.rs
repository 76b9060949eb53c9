//! # Ledgerbook Test Suite
//!
//! Cross-crate tests that drive the resolution service, the view handler and
//! the validation coordinator together.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── properties.rs   # Resolution guarantees through the public API
//!     └── flows.rs        # View handler, coordinator and file stores end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lb-tests
//! cargo test -p lb-tests integration::properties::
//! ```

pub mod integration;
