//! Display metadata for tiers

use serde::Serialize;

use super::classifier::Tier;

/// Label and description shown for a tier badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierInfo {
    pub label: &'static str,
    pub description: &'static str,
}

/// Look up the display metadata for a tier
pub fn describe_tier(tier: Tier) -> TierInfo {
    match tier {
        Tier::Ultra => TierInfo {
            label: "Ultra",
            description: "Latest flagship models with cutting-edge capabilities",
        },
        Tier::Pro => TierInfo {
            label: "Pro",
            description: "High-performance models for complex tasks",
        },
        Tier::Fast => TierInfo {
            label: "Fast",
            description: "Optimized for speed and efficiency",
        },
        Tier::Normal => TierInfo {
            label: "Normal",
            description: "Balanced performance and capabilities",
        },
        Tier::Slow => TierInfo {
            label: "Standard",
            description: "Reliable models for general use",
        },
    }
}
