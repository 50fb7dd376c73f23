//! Tier metadata endpoint

use axum::Json;
use serde::Serialize;

use crate::tiers::{describe_tier, Tier, TierInfo};

/// One tier with its display metadata
#[derive(Debug, Serialize)]
pub struct TierEntry {
    pub tier: Tier,
    #[serde(flatten)]
    pub info: TierInfo,
}

/// List all tiers in display order
pub async fn list_tiers() -> Json<Vec<TierEntry>> {
    Json(
        Tier::ALL
            .into_iter()
            .map(|tier| TierEntry {
                tier,
                info: describe_tier(tier),
            })
            .collect(),
    )
}
