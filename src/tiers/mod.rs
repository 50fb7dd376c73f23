//! Tier classification module
//!
//! Buckets models into coarse performance tiers for display.

pub mod classifier;
pub mod info;

pub use classifier::{
    CategorizedModel, KeywordTables, ModelDescriptor, Tier, TierBucketing, TierClassifier,
};
pub use info::{describe_tier, TierInfo};
