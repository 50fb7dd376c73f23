//! Performance tier classifier
//!
//! Maps model metadata onto one of five display tiers using keyword tables
//! and a context-length fallback, then groups collections by tier.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Context length above which an unmatched model is considered `normal`
pub const NORMAL_CONTEXT_THRESHOLD: u32 = 32_000;

/// Performance tier, ordered from most to least capable
///
/// Implements Ord so that `Tier::Ultra < Tier::Slow` reads as
/// "ultra comes first".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Latest flagship generation
    Ultra,
    /// Previous-generation high-capability models
    Pro,
    /// Small or speed-optimized variants
    Fast,
    /// Unrecognized models with a large context window
    Normal,
    /// Everything else
    Slow,
}

impl Tier {
    /// All tiers in display order
    pub const ALL: [Tier; 5] = [Tier::Ultra, Tier::Pro, Tier::Fast, Tier::Normal, Tier::Slow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Ultra => "ultra",
            Tier::Pro => "pro",
            Tier::Fast => "fast",
            Tier::Normal => "normal",
            Tier::Slow => "slow",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal metadata needed to classify a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    /// Capability tag, "text" or "vision"
    pub provider: String,
    pub context_length: u32,
}

/// A descriptor with its assigned tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedModel {
    #[serde(flatten)]
    pub model: ModelDescriptor,
    #[serde(rename = "category")]
    pub tier: Tier,
}

/// Keyword lists for the three keyword-matched tiers
///
/// Keywords are normalized to lowercase on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTables {
    #[serde(default)]
    pub ultra: Vec<String>,
    #[serde(default)]
    pub pro: Vec<String>,
    #[serde(default)]
    pub fast: Vec<String>,
}

const DEFAULT_ULTRA: &[&str] = &[
    "gpt-5",
    "gpt-4.1",
    "o3",
    "o4",
    "claude-opus-4",
    "claude-sonnet-4",
    "gemini-3",
    "gemini-2.5-pro",
    "deepseek-v3.2",
    "grok-4",
];

const DEFAULT_PRO: &[&str] = &[
    "gpt-4o",
    "o1",
    "claude-3.7",
    "claude-opus",
    "claude-sonnet-3.5",
    "gemini-2.5-flash",
    "gemini-2.0",
    "deepseek-r1",
    "deepseek-v3",
    "qwen3",
    "grok-3",
    "mistral-large",
    "nova-premier",
    "llama-4",
];

const DEFAULT_FAST: &[&str] = &[
    "flash", "mini", "nano", "lite", "small", "turbo", "fast", "8b", "7b", "3b", "haiku",
];

static DEFAULT_TABLES: Lazy<KeywordTables> = Lazy::new(|| {
    KeywordTables::new(
        owned_words(DEFAULT_ULTRA),
        owned_words(DEFAULT_PRO),
        owned_words(DEFAULT_FAST),
    )
});

fn owned_words(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn normalize(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

impl KeywordTables {
    pub fn new(ultra: Vec<String>, pro: Vec<String>, fast: Vec<String>) -> Self {
        Self {
            ultra: normalize(ultra),
            pro: normalize(pro),
            fast: normalize(fast),
        }
    }

    /// Load a replacement table from a JSON file shaped like
    /// `{"ultra": [...], "pro": [...], "fast": [...]}`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword table {}", path.display()))?;
        let tables: KeywordTables = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid keyword table {}", path.display()))?;
        Ok(Self::new(tables.ultra, tables.pro, tables.fast))
    }

    /// First keyword-matched tier for an already lowercased search string
    fn match_tier(&self, haystack: &str) -> Option<Tier> {
        [
            (Tier::Ultra, &self.ultra),
            (Tier::Pro, &self.pro),
            (Tier::Fast, &self.fast),
        ]
        .into_iter()
        .find(|(_, words)| words.iter().any(|w| haystack.contains(w.as_str())))
        .map(|(tier, _)| tier)
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        DEFAULT_TABLES.clone()
    }
}

/// Models grouped by tier, input order preserved inside each bucket
///
/// Serializes with all five keys present, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBucketing {
    pub ultra: Vec<CategorizedModel>,
    pub pro: Vec<CategorizedModel>,
    pub fast: Vec<CategorizedModel>,
    pub normal: Vec<CategorizedModel>,
    pub slow: Vec<CategorizedModel>,
}

impl TierBucketing {
    pub fn get(&self, tier: Tier) -> &[CategorizedModel] {
        match tier {
            Tier::Ultra => &self.ultra,
            Tier::Pro => &self.pro,
            Tier::Fast => &self.fast,
            Tier::Normal => &self.normal,
            Tier::Slow => &self.slow,
        }
    }

    fn bucket_mut(&mut self, tier: Tier) -> &mut Vec<CategorizedModel> {
        match tier {
            Tier::Ultra => &mut self.ultra,
            Tier::Pro => &mut self.pro,
            Tier::Fast => &mut self.fast,
            Tier::Normal => &mut self.normal,
            Tier::Slow => &mut self.slow,
        }
    }

    fn push(&mut self, model: CategorizedModel) {
        self.bucket_mut(model.tier).push(model);
    }

    /// Total number of models across all buckets
    pub fn len(&self) -> usize {
        Tier::ALL.iter().map(|t| self.get(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[CategorizedModel])> {
        Tier::ALL.into_iter().map(move |t| (t, self.get(t)))
    }

    /// Keep only models whose id or name contains `query`, ignoring case
    pub fn filter(&self, query: &str) -> TierBucketing {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }

        let mut filtered = TierBucketing::default();
        for (_, bucket) in self.iter() {
            for model in bucket.iter().filter(|m| matches_query(&m.model, &needle)) {
                filtered.push(model.clone());
            }
        }
        filtered
    }
}

/// Case-insensitive substring match on id or name; `needle` must be lowercase
pub fn matches_query(model: &ModelDescriptor, needle: &str) -> bool {
    model.id.to_lowercase().contains(needle) || model.name.to_lowercase().contains(needle)
}

/// Stateless tier classifier over an injected keyword table
#[derive(Debug, Clone, Default)]
pub struct TierClassifier {
    tables: KeywordTables,
}

impl TierClassifier {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    /// Assign a tier to a single model
    ///
    /// Keyword tiers are checked ultra, pro, fast; the first substring hit
    /// wins. Without a hit, context length decides between normal and slow.
    pub fn classify(&self, model: &ModelDescriptor) -> Tier {
        let haystack = format!("{} {}", model.id, model.name).to_lowercase();

        if let Some(tier) = self.tables.match_tier(&haystack) {
            return tier;
        }

        if model.context_length > NORMAL_CONTEXT_THRESHOLD {
            Tier::Normal
        } else {
            Tier::Slow
        }
    }

    /// Classify every model and group the results by tier
    pub fn classify_all<I>(&self, models: I) -> TierBucketing
    where
        I: IntoIterator<Item = ModelDescriptor>,
    {
        let mut buckets = TierBucketing::default();
        for model in models {
            let tier = self.classify(&model);
            buckets.push(CategorizedModel { model, tier });
        }
        buckets
    }
}
