//! Shared fixtures for the integration tests.
//!
//! A one-dimensional corridor: the agent starts in cell 0 and the episode
//! ends on reaching the last cell, which pays a fixed reward.

#![allow(dead_code)]

use gridlearn::{
    DiscreteActions, Transition,
    actions::Direction,
    ports::Learner,
    types::Preset,
};

pub const GOAL_REWARD: f64 = 10.0;

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy)]
pub struct Corridor {
    pub len: u32,
}

impl Corridor {
    pub fn new(len: u32) -> Self {
        assert!(len >= 2, "corridor needs a start and a goal");
        Self { len }
    }

    pub fn start(&self) -> u32 {
        0
    }

    pub fn goal(&self) -> u32 {
        self.len - 1
    }

    /// West then East, so index 1 is always the way to the goal.
    pub fn action_space(&self) -> DiscreteActions<Direction> {
        DiscreteActions::new([Direction::West, Direction::East])
            .expect("two distinct directions")
    }

    pub fn presets(&self) -> Vec<Preset<u32>> {
        vec![Preset::terminal(self.goal(), GOAL_REWARD)]
    }

    /// Move one cell; walking into the west wall stays put.
    pub fn step(&self, state: u32, action: Direction) -> (f64, u32) {
        let next = match action {
            Direction::East => (state + 1).min(self.goal()),
            Direction::West => state.saturating_sub(1),
            Direction::North | Direction::South => state,
        };
        let reward = if next == self.goal() { GOAL_REWARD } else { 0.0 };
        (reward, next)
    }

    /// The recorded episode walking straight to the goal.
    pub fn straight_path(&self) -> Vec<Transition<u32, Direction>> {
        (self.start()..self.goal())
            .map(|state| {
                let (reward, next) = self.step(state, Direction::East);
                Transition::new(state, Direction::East, reward, next)
            })
            .collect()
    }
}

/// Drive `learner` through one episode; returns the steps taken, or `None`
/// if the goal was not reached within `max_steps`.
pub fn run_episode<L>(
    learner: &mut L,
    corridor: &Corridor,
    episode: usize,
    max_steps: usize,
) -> Option<usize>
where
    L: Learner<u32, Space = DiscreteActions<Direction>> + ?Sized,
{
    let mut state = corridor.start();
    let mut action = learner
        .episode_start(episode, &state)
        .expect("learner is laid out");

    for step in 1..=max_steps {
        let (reward, next) = corridor.step(state, action);
        action = learner
            .one_step(&state, &action, reward, &next)
            .expect("corridor actions are known");
        state = next;
        if state == corridor.goal() {
            learner.episode_end();
            return Some(step);
        }
    }

    learner.episode_end();
    None
}

/// Follow the greedy policy from the start; `Some(steps)` if it reaches the goal.
pub fn greedy_rollout<L>(learner: &L, corridor: &Corridor, max_steps: usize) -> Option<usize>
where
    L: Learner<u32, Space = DiscreteActions<Direction>> + ?Sized,
{
    let mut state = corridor.start();
    for step in 1..=max_steps {
        let action = learner.best_action(&state).expect("learner is laid out");
        state = corridor.step(state, action).1;
        if state == corridor.goal() {
            return Some(step);
        }
    }
    None
}
