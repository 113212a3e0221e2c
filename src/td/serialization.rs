//! Serialization support for temporal difference learning agents.

use std::{
    fmt,
    fs::File,
    hash::Hash,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    actions::ActionSpace,
    config::{TdAlgorithm, TdConfig},
    td::{agent::TdAgent, q_table::QTable},
    value::ActionValue,
};

/// On-disk snapshot of a [`TdAgent`].
///
/// Captures the configuration, the number of completed episodes (which
/// drives a decaying exploration schedule) and the table the policy acts
/// on. Updates still sitting in a delayed-learning shadow are not saved;
/// call `catch_up` first to include them. The action space is not saved
/// either and is supplied again by [`SavedTdAgent::into_agent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Eq + Hash, V: Serialize",
    deserialize = "S: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>"
))]
pub struct SavedTdAgent<S, V = f64> {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    pub config: TdConfig,
    pub episodes_completed: u64,
    table: QTable<S, V>,
}

impl<S, V> SavedTdAgent<S, V>
where
    S: Clone + Eq + Hash + fmt::Debug,
    V: ActionValue,
{
    pub const VERSION: u32 = 1;

    pub fn from_agent<A: ActionSpace>(agent: &TdAgent<A, S, V>) -> Self {
        Self {
            version: Self::VERSION,
            algorithm: agent.algorithm(),
            config: agent.config().clone(),
            episodes_completed: agent.episodes_completed(),
            table: agent.q_table().clone(),
        }
    }

    pub fn table(&self) -> &QTable<S, V> {
        &self.table
    }

    /// Rebuild the agent over `action_space`.
    pub fn into_agent<A: ActionSpace>(self, action_space: A) -> Result<TdAgent<A, S, V>> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported TD save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        if self.algorithm != self.config.algorithm {
            return Err(anyhow!(
                "Saved algorithm {:?} disagrees with its configuration ({:?})",
                self.algorithm,
                self.config.algorithm
            ));
        }

        TdAgent::restore(
            self.config,
            action_space,
            self.table,
            self.episodes_completed,
        )
        .context("Failed to restore TD agent")
    }
}

impl<S, V> SavedTdAgent<S, V>
where
    S: Clone + Eq + Hash + fmt::Debug + Serialize + DeserializeOwned,
    V: ActionValue + Serialize + DeserializeOwned,
{
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize TD agent")?;
        writer.flush().context("Failed to flush TD agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize TD agent")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::{
        actions::{Direction, DiscreteActions},
        config::Hyperparameters,
        types::Preset,
    };

    type GridAgent = TdAgent<DiscreteActions<Direction>, (i32, i32)>;

    fn trained_agent(algorithm: TdAlgorithm) -> GridAgent {
        let config = TdConfig::new(algorithm, Hyperparameters::new(0.5, 0.9, 0.5, 0.9));
        let mut agent = GridAgent::new(config).unwrap().with_seed(7);
        agent.layout(
            9,
            Direction::action_space(),
            &[Preset::terminal((2, 2), 10.0)],
        );
        agent.episode_start(0, &(1, 2)).unwrap();
        agent
            .one_step(&(1, 2), &Direction::East, 10.0, &(2, 2))
            .unwrap();
        agent.episode_end();
        agent
    }

    #[test]
    fn test_q_learning_roundtrip() -> Result<()> {
        let agent = trained_agent(TdAlgorithm::QLearning);
        assert!(agent.table_size() > 0);

        let saved = SavedTdAgent::from_agent(&agent);
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedTdAgent<(i32, i32)> = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.into_agent(Direction::action_space())?;

        assert_eq!(restored.algorithm(), TdAlgorithm::QLearning);
        assert_eq!(restored.table_size(), agent.table_size());
        assert_eq!(restored.episodes_completed(), 1);
        assert_eq!(restored.action_values(&(1, 2)), agent.action_values(&(1, 2)));
        assert!(restored.q_table().is_terminal(&(2, 2)));
        Ok(())
    }

    #[test]
    fn test_sarsa_file_roundtrip() -> Result<()> {
        let agent = trained_agent(TdAlgorithm::Sarsa);
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sarsa.td");

        SavedTdAgent::from_agent(&agent).save_to_file(&path)?;
        let restored = SavedTdAgent::<(i32, i32)>::load_from_file(&path)?
            .into_agent(Direction::action_space())?;

        assert_eq!(restored.algorithm(), TdAlgorithm::Sarsa);
        assert_eq!(restored.action_values(&(1, 2)), agent.action_values(&(1, 2)));
        Ok(())
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let mut saved = SavedTdAgent::from_agent(&trained_agent(TdAlgorithm::QLearning));
        saved.version = 99;
        let err = saved.into_agent(Direction::action_space()).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_write_failure() {
        let saved = SavedTdAgent::from_agent(&trained_agent(TdAlgorithm::QLearning));
        assert!(saved.save_to_file("/dev/full").is_err());
    }

    /// Same field order as [`SavedTdAgent`], with rows of any length.
    #[derive(Serialize)]
    struct RawSave {
        version: u32,
        algorithm: TdAlgorithm,
        config: TdConfig,
        episodes_completed: u64,
        table: RawTable,
    }

    #[derive(Serialize)]
    struct RawTable {
        n_actions: usize,
        values: HashMap<(i32, i32), Vec<f64>>,
        terminals: HashSet<(i32, i32)>,
    }

    #[test]
    fn test_short_row_is_rejected_on_restore() -> Result<()> {
        let config = TdConfig::default();
        let raw = RawSave {
            version: SavedTdAgent::<(i32, i32)>::VERSION,
            algorithm: config.algorithm,
            config,
            episodes_completed: 0,
            table: RawTable {
                n_actions: 4,
                values: HashMap::from([((0, 0), vec![0.0; 4]), ((1, 0), vec![0.0])]),
                terminals: HashSet::new(),
            },
        };
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("short_row.td");
        std::fs::write(&path, rmp_serde::to_vec(&raw)?)?;

        let loaded = SavedTdAgent::<(i32, i32)>::load_from_file(&path)?;
        let err = loaded.into_agent(Direction::action_space()).unwrap_err();
        assert!(format!("{err:#}").contains("(1, 0)"), "{err:#}");
        Ok(())
    }

    #[test]
    fn test_action_space_mismatch_is_rejected() {
        let saved = SavedTdAgent::from_agent(&trained_agent(TdAlgorithm::QLearning));
        let two_actions = DiscreteActions::new([Direction::North, Direction::South]).unwrap();
        assert!(saved.into_agent(two_actions).is_err());
    }
}
