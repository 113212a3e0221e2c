//! Saving, restoring and configuring agents from files.

use anyhow::Result;
use gridlearn::{
    DiscreteActions, Error, SavedTdAgent, TdAgent, TdAlgorithm, TdConfig, actions::Direction,
};

mod common;

use common::{Corridor, greedy_rollout, init_tracing, run_episode};

type CorridorAgent<V = f64> = TdAgent<DiscreteActions<Direction>, u32, V>;

const CONFIG: &str = r#"{
    "algorithm": "q_learning",
    "hyperparameters": { "alpha": 0.5, "gamma": 0.9, "lambda": 0.9, "epsilon": 0.9 },
    "explore_schedule": { "start": 1.0, "stop": 0.1, "decay_rate": 0.5 },
    "seed": 2024
}"#;

fn trained(corridor: &Corridor, episodes: usize) -> Result<CorridorAgent> {
    let mut agent = CorridorAgent::new(TdConfig::from_json_str(CONFIG)?)?;
    agent.layout(
        corridor.len as usize,
        corridor.action_space(),
        &corridor.presets(),
    );
    for episode in 0..episodes {
        run_episode(&mut agent, corridor, episode, 100_000)
            .ok_or_else(|| anyhow::anyhow!("episode {episode} did not finish"))?;
    }
    Ok(agent)
}

#[test]
fn config_file_builds_a_scheduled_agent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("agent.json");
    std::fs::write(&path, CONFIG)?;

    let config = TdConfig::from_json_file(&path)?;
    assert_eq!(config.algorithm, TdAlgorithm::QLearning);
    assert_eq!(config.seed, Some(2024));

    let agent: CorridorAgent = CorridorAgent::new(config)?;
    // The schedule overrides the fixed epsilon.
    assert!(agent.epsilon().abs() < 1e-12);
    Ok(())
}

#[test]
fn invalid_config_file_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{ "algorithm": "sarsa", "hyperparameters": { "alpha": 0.5, "gamma": 1.5, "epsilon": 0.9 } }"#,
    )?;

    let err = TdConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
    assert!(err.to_string().contains("gamma"));

    std::fs::write(&path, "{ not json")?;
    assert!(matches!(
        TdConfig::from_json_file(&path),
        Err(Error::Serialization(_))
    ));
    Ok(())
}

#[test]
fn restored_agent_keeps_policy_and_schedule() -> Result<()> {
    init_tracing();
    let corridor = Corridor::new(5);
    let agent = trained(&corridor, 150)?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("corridor.td");
    SavedTdAgent::from_agent(&agent).save_to_file(&path)?;

    let restored: CorridorAgent =
        SavedTdAgent::load_from_file(&path)?.into_agent(corridor.action_space())?;

    assert_eq!(restored.episodes_completed(), 150);
    assert_eq!(restored.epsilon(), agent.epsilon());
    assert_eq!(restored.q_table().to_string(), agent.q_table().to_string());
    for state in 0..corridor.len {
        assert_eq!(
            restored.best_action(&state)?,
            agent.best_action(&state)?,
            "state {state}"
        );
    }
    assert_eq!(
        greedy_rollout(&restored, &corridor, 20),
        greedy_rollout(&agent, &corridor, 20)
    );
    Ok(())
}

#[test]
fn restored_agent_continues_learning() -> Result<()> {
    let corridor = Corridor::new(5);
    let agent = trained(&corridor, 20)?;
    let before = agent.action_values(&2).map(<[f64]>::to_vec);

    let mut restored: CorridorAgent = SavedTdAgent::from_agent(&agent)
        .into_agent(corridor.action_space())?;
    for episode in 20..40 {
        assert!(run_episode(&mut restored, &corridor, episode, 100_000).is_some());
    }

    assert_eq!(restored.episodes_completed(), 40);
    assert_ne!(restored.action_values(&2).map(<[f64]>::to_vec), before);
    Ok(())
}

#[test]
fn delayed_updates_are_saved_only_after_catch_up() -> Result<()> {
    let corridor = Corridor::new(5);
    let mut agent = trained(&corridor, 0)?;
    agent.set_delayed_learning(true);
    agent.whole_episode(&corridor.straight_path())?;

    let pending = SavedTdAgent::from_agent(&agent);
    assert_eq!(pending.table().get(&3), Some(&[0.0, 0.0][..]));

    agent.catch_up()?;
    let published = SavedTdAgent::from_agent(&agent);
    assert!(published.table().get(&3).is_some_and(|v| v[1] > 0.0));
    Ok(())
}

#[test]
fn single_precision_tables_track_double_precision() -> Result<()> {
    let corridor = Corridor::new(5);
    let config = TdConfig::from_json_str(CONFIG)?;
    let path = corridor.straight_path();

    let mut wide = CorridorAgent::<f64>::new(config.clone())?;
    let mut narrow = CorridorAgent::<f32>::new(config)?;
    wide.layout(5, corridor.action_space(), &corridor.presets());
    narrow.layout(5, corridor.action_space(), &corridor.presets());
    for _ in 0..5 {
        wide.whole_episode(&path)?;
        narrow.whole_episode(&path)?;
    }

    for state in 0..4 {
        let wide_values = wide.action_values(&state).unwrap();
        let narrow_values = narrow.action_values(&state).unwrap();
        for (w, n) in wide_values.iter().zip(narrow_values) {
            assert!((w - f64::from(*n)).abs() < 1e-4, "state {state}: {w} vs {n}");
        }
    }

    let dir = tempfile::tempdir()?;
    let file = dir.path().join("narrow.td");
    SavedTdAgent::from_agent(&narrow).save_to_file(&file)?;
    let restored: CorridorAgent<f32> =
        SavedTdAgent::load_from_file(&file)?.into_agent(corridor.action_space())?;
    assert_eq!(restored.action_values(&3), narrow.action_values(&3));
    Ok(())
}
