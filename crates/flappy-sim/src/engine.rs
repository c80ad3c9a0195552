//! Episode engine: the fixed-timestep loop.
//!
//! `Episode` owns the population, the obstacle track, and the RNG, runs the
//! systems in order once per `tick`, and produces `EpisodeSnapshot`s.
//! Completely headless: the host decides when to call `tick` and may stop
//! at any tick boundary.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use flappy_core::config::SimConfig;
use flappy_core::decision::BoxedDecision;
use flappy_core::enums::{DeathCause, EpisodeMode, EpisodeState, TerminationReason};
use flappy_core::events::EpisodeEvent;
use flappy_core::state::EpisodeSnapshot;
use flappy_core::types::{AgentId, SimTime};

use crate::error::EpisodeError;
use crate::obstacle::ObstacleTrack;
use crate::population::{Population, Retired};
use crate::silhouette::Silhouettes;
use crate::systems;
use crate::systems::snapshot::SnapshotHeader;

/// Per-episode setup chosen by the host.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeSetup {
    /// RNG seed for gap placement. Same seed = same obstacle field.
    pub seed: u64,
    /// Informational generation counter.
    pub generation: u32,
    pub mode: EpisodeMode,
}

impl Default for EpisodeSetup {
    fn default() -> Self {
        Self {
            seed: 42,
            generation: 0,
            mode: EpisodeMode::Evaluation,
        }
    }
}

/// Final result for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub id: AgentId,
    /// Fitness gained (or lost) this episode.
    pub fitness_delta: f64,
    pub cause: DeathCause,
    /// Tick during which the agent was removed.
    pub died_at_tick: u64,
}

/// Terminal payload of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub generation: u32,
    pub mode: EpisodeMode,
    pub score: u32,
    pub ticks: u64,
    pub reason: TerminationReason,
    /// One entry per agent, in spawn order.
    pub outcomes: Vec<AgentOutcome>,
}

impl EpisodeReport {
    /// Highest fitness delta, with its agent.
    pub fn best(&self) -> Option<&AgentOutcome> {
        self.outcomes
            .iter()
            .max_by(|a, b| a.fitness_delta.total_cmp(&b.fitness_delta))
    }

    pub fn count_by_cause(&self, cause: DeathCause) -> usize {
        self.outcomes.iter().filter(|o| o.cause == cause).count()
    }
}

/// One episode: a generation's evaluation or a single-agent replay.
pub struct Episode {
    config: SimConfig,
    setup: EpisodeSetup,
    silhouettes: Silhouettes,
    time: SimTime,
    state: EpisodeState,
    rng: ChaCha8Rng,
    population: Population,
    track: ObstacleTrack,
    score: u32,
    sensed: usize,
    events: Vec<EpisodeEvent>,
    outcomes: Vec<AgentOutcome>,
    termination: Option<TerminationReason>,
}

impl Episode {
    /// Spawn the population and seed the first obstacle.
    ///
    /// Configuration problems (invalid tunables, empty population, a decision
    /// function with no outputs, replay with other than one agent) are
    /// reported here, before any tick runs.
    pub fn new(
        config: &SimConfig,
        setup: EpisodeSetup,
        pilots: Vec<BoxedDecision>,
    ) -> Result<Self, EpisodeError> {
        Self::with_silhouettes(config, setup, pilots, Silhouettes::default())
    }

    /// Like `new`, colliding with host-supplied silhouettes.
    pub fn with_silhouettes(
        config: &SimConfig,
        setup: EpisodeSetup,
        pilots: Vec<BoxedDecision>,
        silhouettes: Silhouettes,
    ) -> Result<Self, EpisodeError> {
        config.validate()?;
        if setup.mode == EpisodeMode::Replay && pilots.len() != 1 {
            return Err(EpisodeError::ReplayArity {
                count: pilots.len(),
            });
        }

        let population = Population::spawn(config, pilots)?;
        let mut rng = ChaCha8Rng::seed_from_u64(setup.seed);
        let track = ObstacleTrack::seeded(config, silhouettes.obstacle_width(), &mut rng);
        debug!(
            agents = population.len(),
            generation = setup.generation,
            seed = setup.seed,
            "episode spawned"
        );

        Ok(Self {
            config: config.clone(),
            setup,
            silhouettes,
            time: SimTime::default(),
            state: EpisodeState::Running,
            rng,
            population,
            track,
            score: 0,
            sensed: 0,
            events: Vec::new(),
            outcomes: Vec::new(),
            termination: None,
        })
    }

    /// Single-agent replay episode.
    pub fn replay(config: &SimConfig, pilot: BoxedDecision, seed: u64) -> Result<Self, EpisodeError> {
        let setup = EpisodeSetup {
            seed,
            generation: 0,
            mode: EpisodeMode::Replay,
        };
        Self::new(config, setup, vec![pilot])
    }

    /// Advance one tick and return the resulting snapshot.
    ///
    /// A terminated episode does not advance; it keeps returning its final
    /// state. A decision-function error terminates the episode and is
    /// returned to the caller.
    pub fn tick(&mut self) -> Result<EpisodeSnapshot, EpisodeError> {
        if self.state == EpisodeState::Running {
            self.time.advance(self.config.tick_rate);
            if let Err(err) = self.run_systems() {
                self.abort();
                return Err(err);
            }
            self.check_termination();
        }
        Ok(self.snapshot_draining_events())
    }

    /// Tick until terminated, or until `max_ticks` total ticks have elapsed.
    pub fn run(&mut self, max_ticks: Option<u64>) -> Result<EpisodeReport, EpisodeError> {
        while self.state == EpisodeState::Running {
            if max_ticks.is_some_and(|limit| self.time.tick >= limit) {
                break;
            }
            self.tick()?;
        }
        Ok(self.finish())
    }

    /// Stop (if still running) and produce the report.
    pub fn finish(&mut self) -> EpisodeReport {
        self.stop();
        self.build_report(self.termination.unwrap_or(TerminationReason::Extinction))
    }

    /// Host cancellation at a tick boundary. Survivors are recorded with
    /// `DeathCause::TickLimit`.
    pub fn stop(&mut self) {
        if self.state == EpisodeState::Terminated {
            return;
        }
        let retired = self.population.drain();
        self.bury(retired, DeathCause::TickLimit);
        self.termination = Some(TerminationReason::TickLimit);
        self.check_termination();
    }

    /// End the episode after a decision-function failure. Survivors are
    /// recorded with `DeathCause::DecisionFailure`.
    fn abort(&mut self) {
        let retired = self.population.drain();
        self.bury(retired, DeathCause::DecisionFailure);
        self.termination = Some(TerminationReason::DecisionFailure);
        self.check_termination();
    }

    /// Run all systems in order.
    fn run_systems(&mut self) -> Result<(), EpisodeError> {
        // 1. Sensed obstacle, judged from the lead survivor
        self.sensed = systems::flight::sensed_index(&self.population, &self.track);

        // 2. Reward, decide, jump, move
        systems::flight::run(
            &mut self.population,
            &self.track,
            self.sensed,
            &self.config,
            &mut self.events,
        )?;

        // 3. Obstacles advance, then collisions
        self.track.advance(self.config.obstacle_velocity);
        let hits = systems::collision::run(
            &mut self.population,
            &self.track,
            &self.silhouettes,
            self.config.collision_penalty,
        );
        let retired = self.population.prune(|i| hits[i]);
        self.bury(retired, DeathCause::Collision);

        // 4. Retire, pass, spawn (survivors only)
        systems::scoring::run(
            &mut self.population,
            &mut self.track,
            &mut self.rng,
            &self.config,
            &mut self.score,
            &mut self.events,
        );

        // 5. Floor / ceiling
        let causes = systems::bounds::run(
            &self.population,
            self.silhouettes.agent_height(),
            &self.config,
        );
        let retired = self.population.prune(|i| causes[i].is_some());
        for r in retired {
            let cause = causes[r.index].unwrap_or(DeathCause::Floor);
            self.bury(vec![r], cause);
        }

        // 6. Score ceiling (evaluation only, survivors left)
        if !self.population.is_empty() && self.ceiling_reached() {
            if let Some(bonus) = self.config.ceiling_fitness_bonus {
                self.population.reward_all(bonus);
            }
            let retired = self.population.drain();
            self.bury(retired, DeathCause::ScoreCeiling);
            self.termination = Some(TerminationReason::ScoreCeiling);
        }
        Ok(())
    }

    fn ceiling_reached(&self) -> bool {
        self.setup.mode == EpisodeMode::Evaluation
            && self
                .config
                .score_ceiling
                .is_some_and(|ceiling| self.score > ceiling)
    }

    /// Record removed agents and announce them.
    fn bury(&mut self, retired: Vec<Retired>, cause: DeathCause) {
        for r in retired {
            debug!(agent = %r.id, ?cause, fitness = r.fitness, tick = self.time.tick, "agent removed");
            self.events.push(EpisodeEvent::AgentDied { agent: r.id, cause });
            self.outcomes.push(AgentOutcome {
                id: r.id,
                fitness_delta: r.fitness,
                cause,
                died_at_tick: self.time.tick,
            });
        }
    }

    fn check_termination(&mut self) {
        if self.state == EpisodeState::Terminated || !self.population.is_empty() {
            return;
        }
        let reason = *self.termination.get_or_insert(TerminationReason::Extinction);
        self.state = EpisodeState::Terminated;
        self.events.push(EpisodeEvent::Terminated { reason });
        info!(
            generation = self.setup.generation,
            ?reason,
            score = self.score,
            ticks = self.time.tick,
            "episode terminated"
        );
    }

    fn snapshot_draining_events(&mut self) -> EpisodeSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(self.header(), &self.population, &self.track, events)
    }

    fn header(&self) -> SnapshotHeader {
        SnapshotHeader {
            time: self.time,
            state: self.state,
            generation: self.setup.generation,
            score: self.score,
            sensed_obstacle: self.sensed,
        }
    }

    /// Current view without draining pending events.
    pub fn snapshot(&self) -> EpisodeSnapshot {
        systems::snapshot::build_snapshot(
            self.header(),
            &self.population,
            &self.track,
            self.events.clone(),
        )
    }

    /// Final report, once terminated.
    pub fn report(&self) -> Option<EpisodeReport> {
        let reason = self.termination?;
        if self.state != EpisodeState::Terminated {
            return None;
        }
        Some(self.build_report(reason))
    }

    fn build_report(&self, reason: TerminationReason) -> EpisodeReport {
        let mut outcomes = self.outcomes.clone();
        outcomes.sort_by_key(|o| o.id);
        EpisodeReport {
            generation: self.setup.generation,
            mode: self.setup.mode,
            score: self.score,
            ticks: self.time.tick,
            reason,
            outcomes,
        }
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == EpisodeState::Terminated
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn setup(&self) -> EpisodeSetup {
        self.setup
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn track(&self) -> &ObstacleTrack {
        &self.track
    }

    pub fn silhouettes(&self) -> &Silhouettes {
        &self.silhouettes
    }

    /// Outcomes recorded so far, in removal order.
    pub fn outcomes(&self) -> &[AgentOutcome] {
        &self.outcomes
    }

    /// Mutable track access for staging obstacle layouts in tests.
    #[cfg(test)]
    pub fn track_mut(&mut self) -> &mut ObstacleTrack {
        &mut self.track
    }

    /// Mutable population access for staging agent positions in tests.
    #[cfg(test)]
    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }
}
