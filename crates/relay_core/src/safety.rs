//! Content-safety thresholds sent with every generation call.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// The four standard harm categories the generation API filters on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum HarmCategory {
    /// Harassment
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    #[strum(serialize = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    /// Hate speech
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    #[strum(serialize = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    /// Sexually explicit content
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    #[strum(serialize = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    /// Dangerous content
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    #[strum(serialize = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Blocking sensitivity, from least to most restrictive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Never block
    BlockNone,
    /// Block only high-probability harm
    BlockOnlyHigh,
    /// Block medium and high
    BlockMediumAndAbove,
    /// Block low, medium and high
    BlockLowAndAbove,
}

/// One category/threshold pair, in wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SafetySetting {
    /// Category being configured
    pub category: HarmCategory,
    /// Threshold applied to it
    pub threshold: HarmBlockThreshold,
}

/// The full set of safety settings for a call.
///
/// # Examples
///
/// ```
/// use relay_core::{HarmBlockThreshold, SafetyThresholds};
///
/// let safety = SafetyThresholds::permissive();
/// assert_eq!(safety.settings().len(), 4);
/// assert!(safety
///     .settings()
///     .iter()
///     .all(|s| s.threshold == HarmBlockThreshold::BlockNone));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafetyThresholds(Vec<SafetySetting>);

impl SafetyThresholds {
    /// Every category set to the same threshold.
    pub fn uniform(threshold: HarmBlockThreshold) -> Self {
        Self(
            HarmCategory::iter()
                .map(|category| SafetySetting {
                    category,
                    threshold,
                })
                .collect(),
        )
    }

    /// Every category set to `BLOCK_NONE`, so harsh but benign input is not
    /// rejected by the filter.
    pub fn permissive() -> Self {
        Self::uniform(HarmBlockThreshold::BlockNone)
    }

    /// The configured settings.
    pub fn settings(&self) -> &[SafetySetting] {
        &self.0
    }
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self::permissive()
    }
}
