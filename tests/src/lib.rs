//! # Peer-Help Test Suite
//!
//! Unified test crate covering the pieces a single crate's unit tests
//! cannot: cross-component choreography, concurrent-caller races, and
//! randomized operation-sequence properties.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── choreography.rs   # full request -> offer -> match -> reward flows
//! ├── concurrency.rs    # racing callers on one entity
//! └── properties.rs     # random valid operation sequences vs. invariants
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p peer-help-tests
//!
//! # By category
//! cargo test -p peer-help-tests integration::choreography::
//! cargo test -p peer-help-tests integration::concurrency::
//! cargo test -p peer-help-tests integration::properties::
//! ```

#![allow(dead_code)]

pub mod integration;
