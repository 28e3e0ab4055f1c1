//! Core valuation and classification pipeline for a resale companion app.
//!
//! Maps free-text item descriptions into a fixed category taxonomy with
//! stable inventory codes, and folds multi-source market signals into
//! condition scores, price estimates, and buy/sell recommendations.
//! Capture, storage, and listing surfaces live outside this crate and talk
//! to it through the types in [`domain`] and the traits in [`infra`].

pub mod domain;
pub mod infra;
pub mod util;
