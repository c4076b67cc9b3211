use std::str::FromStr;

use crate::risk::RiskWeights;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Tunable knobs for a [crate::MoveSelector]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use flood_filler::SnakeOptions;
///
/// let defaults: SnakeOptions = Default::default();
///
/// assert_eq!(defaults.low_health_threshold, 20);
/// assert_eq!(defaults.risk.wall, 1.0);
/// assert_eq!(defaults.risk.body, 1.0);
/// assert_eq!(defaults.risk.rival_head, 0.25);
/// ```
pub struct SnakeOptions {
    /// Below this much health we go looking for food even when we are the biggest snake around
    ///
    /// Defaults to 20
    pub low_health_threshold: i32,
    /// What each hazard adds to a move's risk score
    pub risk: RiskWeights,
}

impl Default for SnakeOptions {
    fn default() -> Self {
        Self {
            low_health_threshold: 20,
            risk: RiskWeights::default(),
        }
    }
}

impl SnakeOptions {
    /// The defaults, with any of `LOW_HEALTH_THRESHOLD`, `WALL_PENALTY`, `BODY_PENALTY` and
    /// `RIVAL_HEAD_PENALTY` overriding them when set to something parseable
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            low_health_threshold: env_or("LOW_HEALTH_THRESHOLD", defaults.low_health_threshold),
            risk: RiskWeights {
                wall: env_or("WALL_PENALTY", defaults.risk.wall),
                body: env_or("BODY_PENALTY", defaults.risk.body),
                rival_head: env_or("RIVAL_HEAD_PENALTY", defaults.risk.rival_head),
            },
        }
    }
}

/// `key` parsed from the environment, `default` when it is unset or doesn't parse
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key).map(|x| x.parse()) {
        Ok(Ok(x)) => x,
        _ => default,
    }
}
