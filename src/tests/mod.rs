//! Unit and mock tests for the API test SDK
//!
//! This module contains tests for the various components of the SDK.

pub mod filter_tests;
pub mod report_tests;
