//! Configuration types for TD agents.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    policy::{EpsilonGreedy, ExplorationPolicy, ExploreSchedule},
    td::TdParams,
};

/// Control algorithm built on the shared TD core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    /// Off-policy: bootstraps on the best next action
    QLearning,
    /// On-policy: bootstraps on the next action actually chosen
    Sarsa,
}

impl TdAlgorithm {
    /// Whether the next action must be chosen before the update because the
    /// bootstrap target depends on it.
    pub fn next_action_considered(self) -> bool {
        matches!(self, TdAlgorithm::Sarsa)
    }

    pub fn name(self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "Q-Learning",
            TdAlgorithm::Sarsa => "SARSA",
        }
    }
}

/// Learning hyperparameters, fixed for the lifetime of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α, in (0, 1]
    pub alpha: f64,
    /// Discount factor γ, in [0, 1]
    pub gamma: f64,
    /// Eligibility decay λ, in [0, 1]; 0 is plain TD(0)
    #[serde(default)]
    pub lambda: f64,
    /// Exploitation probability of the epsilon-greedy policy, in [0, 1]
    pub epsilon: f64,
}

impl Hyperparameters {
    pub fn new(alpha: f64, gamma: f64, lambda: f64, epsilon: f64) -> Self {
        Self {
            alpha,
            gamma,
            lambda,
            epsilon,
        }
    }

    /// Check every parameter against its admissible range.
    pub fn validate(&self) -> Result<()> {
        check_range("alpha", self.alpha, false)?;
        check_range("gamma", self.gamma, true)?;
        check_range("lambda", self.lambda, true)?;
        check_range("epsilon", self.epsilon, true)?;
        Ok(())
    }

    pub fn td_params(&self) -> TdParams {
        TdParams::new(self.alpha, self.gamma, self.lambda)
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            lambda: 0.0,
            epsilon: 0.9,
        }
    }
}

fn check_range(name: &str, value: f64, zero_allowed: bool) -> Result<()> {
    let lower_ok = if zero_allowed { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && lower_ok && value <= 1.0 {
        Ok(())
    } else {
        let interval = if zero_allowed { "[0, 1]" } else { "(0, 1]" };
        Err(Error::invalid_config(format!(
            "{name} = {value} is outside {interval}"
        )))
    }
}

/// Configuration for creating a TD agent.
///
/// # Examples
///
/// ```
/// use gridlearn::config::{Hyperparameters, TdAlgorithm, TdConfig};
/// use gridlearn::policy::ExploreSchedule;
///
/// let config = TdConfig::new(TdAlgorithm::Sarsa, Hyperparameters::new(0.1, 0.99, 0.5, 0.9))
///     .with_seed(42)
///     .with_explore_schedule(ExploreSchedule::default());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdConfig {
    pub algorithm: TdAlgorithm,
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
    /// Time-decayed exploration; the fixed `epsilon` is used when absent
    #[serde(default)]
    pub explore_schedule: Option<ExploreSchedule>,
    /// Random seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TdConfig {
    pub fn new(algorithm: TdAlgorithm, hyperparameters: Hyperparameters) -> Self {
        Self {
            algorithm,
            hyperparameters,
            explore_schedule: None,
            seed: None,
        }
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the fixed epsilon with a decaying exploration schedule.
    pub fn with_explore_schedule(mut self, schedule: ExploreSchedule) -> Self {
        self.explore_schedule = Some(schedule);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.hyperparameters.validate()?;
        if let Some(schedule) = &self.explore_schedule {
            check_range("explore_schedule.start", schedule.start, true)?;
            check_range("explore_schedule.stop", schedule.stop, true)?;
            if !(schedule.decay_rate.is_finite() && schedule.decay_rate >= 0.0) {
                return Err(Error::invalid_config(format!(
                    "explore_schedule.decay_rate = {} must be non-negative",
                    schedule.decay_rate
                )));
            }
        }
        Ok(())
    }

    pub fn exploration(&self) -> ExplorationPolicy {
        match self.explore_schedule {
            Some(schedule) => ExplorationPolicy::Scheduled(schedule),
            None => ExplorationPolicy::Fixed(EpsilonGreedy::new(self.hyperparameters.epsilon)),
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for TdConfig {
    fn default() -> Self {
        Self::new(TdAlgorithm::QLearning, Hyperparameters::default())
    }
}
