//! # hdrgamma-tests
//!
//! Cross-checks for hdrgamma's profile encoder.
//!
//! This crate provides:
//! - Display fixtures covering SDR, HDR and partially reported snapshots
//! - Seeded random displays for property sweeps
//! - A moxcms-backed decoder used as an independent reader of our output
//!
//! ## Test Categories
//!
//! 1. **Profile Layout**: header fields, tag directory, MHC2 offsets
//! 2. **Decoder Parity**: a third-party parser reads what we wrote
//! 3. **Curve Properties**: monotonicity and fixed points across white levels
//! 4. **Install Roundtrip**: apply, diagnose and revert against a directory store

pub mod patterns;
pub mod reference;

pub use patterns::{DisplayPattern, display_for, random_displays};
pub use reference::{DecodedProfile, decode_moxcms};

/// Route `tracing` output from the code under test to the test harness
///
/// Only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
