//! Question intent classification.
//!
//! An intent is the coarse groundwater metric a question asks about. Exactly
//! one intent is derived per question by keyword matching over the uppercased
//! text. Direct keywords are checked in a fixed priority order; ambiguous
//! phrasing about "water level" or "how much water" falls back to
//! availability; anything else is treated as a recharge question.

use std::fmt;

use serde::Serialize;

/// Groundwater metric category of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Availability,
    Recharge,
    Extraction,
    Levels
}

/// Direct intent keywords, in priority order
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Availability,
        &["NET ANNUAL", "AVAILABILITY", "AVAILABLE", "EXTRACTABLE", "FUTURE USE"]
    ),
    (Intent::Recharge, &["RECHARGE", "REPLENISHMENT", "INFLOW"]),
    (
        Intent::Extraction,
        &["EXTRACTION", "USAGE", "CONSUMPTION", "UTILISATION", "UTILIZATION"]
    ),
    (Intent::Levels, &["LEVEL", "DEPTH", "HEIGHT"])
];

const AMBIGUOUS_TERMS: &[&str] = &["WATER LEVEL", "LEVEL OF WATER", "AMOUNT OF WATER", "HOW MUCH WATER"];

const AVAILABILITY_CONTEXT: &[&str] = &["AVAILABLE", "REMAINING", "LEFT", "USABLE", "FUTURE", "UNUSED"];

impl Intent {
    /// Classify a question. Matching is case-insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// use groundwater_sql::intent::Intent;
    ///
    /// assert_eq!(Intent::classify("Show recharge in Chennai"), Intent::Recharge);
    /// assert_eq!(
    ///     Intent::classify("How much usable groundwater is there in Karnataka?"),
    ///     Intent::Availability
    /// );
    /// assert_eq!(Intent::classify("Tell me about Kerala"), Intent::Recharge);
    /// ```
    pub fn classify(question: &str) -> Self {
        let upper = question.to_uppercase();
        for (intent, keywords) in INTENT_KEYWORDS {
            if contains_any(&upper, keywords) {
                return *intent;
            }
        }
        if contains_any(&upper, AMBIGUOUS_TERMS) && contains_any(&upper, AVAILABILITY_CONTEXT) {
            return Self::Availability;
        }
        if upper.contains("HOW MUCH") && upper.contains("WATER") {
            return Self::Availability;
        }
        Self::Recharge
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Availability => "availability",
            Self::Recharge => "recharge",
            Self::Extraction => "extraction",
            Self::Levels => "levels"
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
