//! Q-learning engine
//!
//! Learns a tabular action-value function by playing episodes in an
//! [`Environment`] with an ε-greedy behaviour policy, then reads the greedy
//! policy off the table.

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    config::QLearningConfig,
    mdp::{ActionOf, Environment, MdpState, Policy, StateSpace},
    ports::Solver,
    q_learning::q_table::QTable,
    utils::build_rng,
};

/// Counters accumulated over the last `train` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingStats {
    pub episodes: usize,
    /// Environment steps taken (one per agent action)
    pub steps: usize,
    /// Steps whose action was drawn at random
    pub explorations: usize,
}

/// Q-learning agent (off-policy TD control)
///
/// Owns its environment for the whole of its life, so no other learner can
/// interleave episodes with it.
#[derive(Debug, Clone)]
pub struct QLearning<E: Environment> {
    env: E,
    config: QLearningConfig,
    q_table: QTable<E::State>,
    epsilon: f64,
    rng: StdRng,
    stats: TrainingStats,
}

impl<E: Environment> QLearning<E> {
    /// Create a Q-learning agent for `env`, with a zeroed Q-table over the
    /// non-terminal states of `space`.
    pub fn new<M>(space: &M, env: E, config: QLearningConfig) -> Result<Self>
    where
        M: StateSpace<State = E::State>,
    {
        config.validate()?;
        let q_table = QTable::new(space.states(), config.learning_rate, config.discount)?;
        Ok(Self {
            env,
            epsilon: config.epsilon,
            rng: build_rng(config.seed),
            config,
            q_table,
            stats: TrainingStats::default(),
        })
    }

    /// Replace the random source used for exploration.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Set every Q-value back to 0.0 and restore the initial ε.
    pub fn initialize_q_table(&mut self) {
        self.q_table.reset();
        self.epsilon = self.config.epsilon;
        self.stats = TrainingStats::default();
    }

    /// ε-greedy action selection
    ///
    /// With probability ε a legal action is drawn uniformly, otherwise the
    /// first action with the highest Q-value is taken.
    pub fn select_action(&mut self, state: &E::State) -> Result<ActionOf<E::State>> {
        if self.rng.random::<f64>() < self.epsilon {
            self.stats.explorations += 1;
            state
                .legal_actions()
                .choose(&mut self.rng)
                .cloned()
                .ok_or_else(|| Error::no_actions(state))
        } else {
            self.q_table.greedy_action(state).cloned()
        }
    }

    /// Play one episode to the end, updating the table after every step.
    ///
    /// Returns the number of steps taken.
    pub fn run_episode(&mut self) -> Result<usize> {
        let mut state = self.env.reset()?;
        let mut steps = 0;
        while !state.is_terminal() {
            let action = self.select_action(&state)?;
            let outcome = self.env.step(&action)?;
            self.q_table.q_learning_update(&outcome)?;
            steps += 1;
            state = outcome.next;
        }
        self.stats.episodes += 1;
        self.stats.steps += steps;
        Ok(steps)
    }

    /// Decay epsilon after episode
    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }

    /// Greedy policy over every non-terminal state in the table.
    ///
    /// States never visited keep their zero values and map to their first
    /// legal action.
    pub fn extract_policy(&self) -> Result<Policy<E::State>> {
        let mut policy = Policy::new();
        for state in self.q_table.states() {
            let action = self.q_table.greedy_action(state)?.clone();
            policy.insert(state.clone(), action);
        }
        Ok(policy)
    }

    pub fn q_value(&self, state: &E::State, action: &ActionOf<E::State>) -> Option<f64> {
        self.q_table.get(state, action)
    }

    pub fn q_table(&self) -> &QTable<E::State> {
        &self.q_table
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn stats(&self) -> TrainingStats {
        self.stats
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }
}

impl<E: Environment> Solver for QLearning<E> {
    type State = E::State;

    /// Run exactly `config.episodes` episodes, then extract the policy.
    fn train(&mut self) -> Result<Policy<E::State>> {
        let episodes = self.config.episodes;
        let checkpoint = (episodes / 10).max(1);
        self.stats = TrainingStats::default();

        for episode in 1..=episodes {
            self.run_episode()?;
            self.decay_epsilon();
            if episode % checkpoint == 0 {
                tracing::debug!(
                    episode,
                    steps = self.stats.steps,
                    explorations = self.stats.explorations,
                    epsilon = self.epsilon,
                    "q-learning progress"
                );
            }
        }

        let policy = self.extract_policy()?;
        tracing::info!(
            episodes = self.stats.episodes,
            steps = self.stats.steps,
            explorations = self.stats.explorations,
            policy_size = policy.len(),
            "q-learning finished"
        );
        Ok(policy)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
