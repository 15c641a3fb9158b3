//! Run options and engine configuration.
//!
//! [`RunOptions`] is what the caller passes per run (which soft rules are on
//! and how strong they are). [`EngineConfig`] holds the structural knobs
//! that rarely change: container capacity, the gated subject tier and the
//! fixed score constants.
//!
//! # Options Map
//!
//! | Key | Type | Effect |
//! |-----|------|--------|
//! | `subject_interval_days` | integer or `null` | Presence enables the interval rule (`null` → 3) |
//! | `interval_strength` | `weak` / `normal` / `strong` | Interval penalty base (default `normal`) |
//! | `preferred_strength` | `weak` / `normal` / `strong` or `null` | Presence enables the preferred-teacher rule |
//! | `seed` | unsigned integer | Fixes the demand shuffle |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PlannerError, PlannerResult};
use crate::models::SubjectTier;

/// Default minimum gap (days) between two lessons of the same subject.
pub const DEFAULT_INTERVAL_DAYS: i64 = 3;

/// Largest accepted `subject_interval_days` (about a century).
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Default number of lessons one container can hold.
pub const DEFAULT_CAPACITY: usize = 2;

/// Weight tier of a soft rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// Barely shifts the ranking.
    Weak,
    /// Default weight.
    #[default]
    Normal,
    /// Dominates every other term.
    Strong,
}

impl Strength {
    /// Penalty per missing day under the subject-interval rule.
    pub fn interval_penalty(self) -> i64 {
        match self {
            Strength::Weak => 10,
            Strength::Normal => 60,
            Strength::Strong => 1000,
        }
    }

    /// Bonus for a preferred teacher.
    pub fn preferred_bonus(self) -> i64 {
        match self {
            Strength::Weak => 20,
            Strength::Normal => 100,
            Strength::Strong => 1000,
        }
    }
}

/// Settings of the subject-interval rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRule {
    /// Minimum gap in days between lessons of the same subject.
    pub min_days: i64,
    /// Penalty tier for gaps below the minimum.
    pub strength: Strength,
}

/// Per-run options.
///
/// A rule is active iff its field is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Subject-interval rule settings.
    pub subject_interval: Option<IntervalRule>,
    /// Preferred-teacher rule strength.
    pub preferred_teacher: Option<Strength>,
    /// Seed for the demand shuffle. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl RunOptions {
    /// Options with both soft rules off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the subject-interval rule.
    pub fn with_subject_interval(mut self, min_days: i64, strength: Strength) -> Self {
        self.subject_interval = Some(IntervalRule { min_days, strength });
        self
    }

    /// Enables the preferred-teacher rule.
    pub fn with_preferred_teacher(mut self, strength: Strength) -> Self {
        self.preferred_teacher = Some(strength);
        self
    }

    /// Fixes the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses a JSON object of options.
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| PlannerError::InvalidOption {
            key: "<root>".into(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => Self::from_map(&map),
            other => Err(PlannerError::InvalidOption {
                key: "<root>".into(),
                message: format!("expected an object, got {other}"),
            }),
        }
    }

    /// Parses an options map.
    ///
    /// Key presence, not value, switches a rule on. Unrecognized keys are
    /// ignored.
    pub fn from_map(map: &Map<String, Value>) -> PlannerResult<Self> {
        let mut options = Self::new();

        if let Some(raw) = map.get("subject_interval_days") {
            let min_days = match raw {
                Value::Null => DEFAULT_INTERVAL_DAYS,
                v => parse_days("subject_interval_days", v)?,
            };
            let strength = match map.get("interval_strength") {
                None | Some(Value::Null) => Strength::default(),
                Some(v) => parse_strength("interval_strength", v)?,
            };
            options.subject_interval = Some(IntervalRule { min_days, strength });
        }

        if let Some(raw) = map.get("preferred_strength") {
            options.preferred_teacher = Some(match raw {
                Value::Null => Strength::default(),
                v => parse_strength("preferred_strength", v)?,
            });
        }

        if let Some(raw) = map.get("seed") {
            if !raw.is_null() {
                options.seed = Some(raw.as_u64().ok_or_else(|| PlannerError::InvalidOption {
                    key: "seed".into(),
                    message: format!("expected an unsigned integer, got {raw}"),
                })?);
            }
        }

        Ok(options)
    }
}

fn parse_days(key: &str, value: &Value) -> PlannerResult<i64> {
    let days = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match days {
        Some(d) if (0..=MAX_INTERVAL_DAYS).contains(&d) => Ok(d),
        _ => Err(PlannerError::InvalidOption {
            key: key.into(),
            message: format!("expected a day count in 0..={MAX_INTERVAL_DAYS}, got {value}"),
        }),
    }
}

fn parse_strength(key: &str, value: &Value) -> PlannerResult<Strength> {
    serde_json::from_value(value.clone()).map_err(|_| PlannerError::InvalidOption {
        key: key.into(),
        message: format!("expected one of weak, normal, strong, got {value}"),
    })
}

/// Structural engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum lessons per container.
    pub capacity: usize,
    /// Subjects at this tier or above require a qualified teacher.
    pub gated_tier: SubjectTier,
    /// Score every feasible slot starts from.
    pub base_score: i64,
    /// Flat bonus when the subject-interval minimum is met.
    pub interval_bonus: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            gated_tier: SubjectTier::High,
            base_score: 100,
            interval_bonus: 50,
        }
    }
}

impl EngineConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the gated subject tier.
    pub fn with_gated_tier(mut self, tier: SubjectTier) -> Self {
        self.gated_tier = tier;
        self
    }

    /// Sets the base score.
    pub fn with_base_score(mut self, score: i64) -> Self {
        self.base_score = score;
        self
    }

    /// Sets the interval bonus.
    pub fn with_interval_bonus(mut self, bonus: i64) -> Self {
        self.interval_bonus = bonus;
        self
    }
}
