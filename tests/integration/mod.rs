//! Integration tests for Tiergate
//!
//! These tests drive the real router against a mocked provider and verify
//! the complete request/response flow.

mod chat;
mod tiers;
