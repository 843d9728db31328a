//! Core types for the marketing agents
//! this crate contains the shared data structures used across all agents.

use serde::{Deserialize, Serialize};
use std::fmt;

// DAILY METRICS //

/// One observation of a channel's performance on a given day.
///
/// Rates are derived on read and never stored. Impressions are not tracked,
/// so the click-through rate assumes ten impressions per click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub day: u32,         // day index within the flight (1-based)
    pub channel: String,  // channel identifier like "paid_search"
    pub spend: f64,       // spend for the day
    pub clicks: u64,      // clicks for the day
    pub conversions: u64, // conversions attributed to the day
}

impl DailyMetrics {
    pub fn new(day: u32, channel: impl Into<String>, spend: f64, clicks: u64, conversions: u64) -> Self {
        Self {
            day,
            channel: channel.into(),
            spend,
            clicks,
            conversions,
        }
    }

    /// Cost per click (0 when there are no clicks)
    pub fn cpc(&self) -> f64 {
        if self.clicks > 0 {
            self.spend / self.clicks as f64
        } else {
            0.0
        }
    }

    /// Click-through rate against the synthetic impressions count
    pub fn ctr(&self) -> f64 {
        // synthetic impressions, in f64 so large click counts cannot overflow
        let impressions = self.clicks as f64 * 10.0;
        if impressions > 0.0 {
            self.clicks as f64 / impressions
        } else {
            0.0
        }
    }

    /// Conversion rate (0 when there are no clicks)
    pub fn cvr(&self) -> f64 {
        if self.clicks > 0 {
            self.conversions as f64 / self.clicks as f64
        } else {
            0.0
        }
    }

    /// Cost per acquisition (0 when there are no conversions)
    pub fn cpa(&self) -> f64 {
        if self.conversions > 0 {
            self.spend / self.conversions as f64
        } else {
            0.0
        }
    }
}

// ANOMALY //

// metrics the pacing detector watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Spend,
    Cpa,
    Ctr,
    Cvr,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Spend => "spend",
            Metric::Cpa => "cpa",
            Metric::Ctr => "ctr",
            Metric::Cvr => "cvr",
        }
    }

    /// Upper-case label used in reports ("CPA", "SPEND", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Spend => "SPEND",
            Metric::Cpa => "CPA",
            Metric::Ctr => "CTR",
            Metric::Cvr => "CVR",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    // "above" / "below" wording for narrative bullets
    pub fn relation(&self) -> &'static str {
        match self {
            Direction::Up => "above",
            Direction::Down => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly severity levels (ordered from lowest to highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single deviation found by the pacing detector.
///
/// `deviation_pct` is measured against `baseline`, which is the daily budget
/// for spend, the CPA guardrail for cpa, the corpus mean for ctr and the
/// conversion-rate floor for cvr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub day: u32,
    pub channel: String,
    pub metric: Metric,
    pub value: f64,         // observed value
    pub baseline: f64,      // reference value the observation was compared to
    pub deviation_pct: f64, // can exceed 100
    pub direction: Direction,
    pub severity: Severity,
    pub reason: String, // human readable explanation
}
