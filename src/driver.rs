//! Fixed-rate driver
//!
//! Owns the only mutable simulation state: the body set and the RNG. Each
//! tick it polls the quit signal, runs one `step`, then hands a read-only
//! frame to the sink.

use std::fmt;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::render::{Frame, FrameSink, SinkError};
use crate::settings::SimulationConfig;
use crate::sim::{
    Arena, ConfigError, EscapePolicy, EventCounts, InvariantViolation, PolicyKind, SimEvent,
    SimulationState, StepRules, step,
};

/// Anything that can stop a run
#[derive(Debug)]
pub enum SimError {
    Config(ConfigError),
    Invariant(InvariantViolation),
    Sink(SinkError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "Configuration error: {}", e),
            SimError::Invariant(e) => write!(f, "Invariant violation: {}", e),
            SimError::Sink(e) => write!(f, "Frame sink error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Invariant(e) => Some(e),
            SimError::Sink(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<InvariantViolation> for SimError {
    fn from(e: InvariantViolation) -> Self {
        SimError::Invariant(e)
    }
}

impl From<SinkError> for SimError {
    fn from(e: SinkError) -> Self {
        SimError::Sink(e)
    }
}

/// External stop request, polled once per tick
pub trait QuitSignal {
    fn should_quit(&mut self) -> bool;
}

impl<F: FnMut() -> bool> QuitSignal for F {
    fn should_quit(&mut self) -> bool {
        self()
    }
}

/// Quit signal that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverQuit;

impl QuitSignal for NeverQuit {
    fn should_quit(&mut self) -> bool {
        false
    }
}

/// Fixed-timestep accumulator
///
/// Converts elapsed wall time into a whole number of ticks, carrying the
/// remainder to the next poll.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    tick_seconds: f64,
    max_catch_up: u32,
    accumulator: f64,
}

impl Pacer {
    pub fn new(tick_rate: u32, max_catch_up: u32) -> Self {
        Self {
            tick_seconds: 1.0 / tick_rate.max(1) as f64,
            max_catch_up: max_catch_up.max(1),
            accumulator: 0.0,
        }
    }

    pub fn tick_seconds(&self) -> f64 {
        self.tick_seconds
    }

    /// Ticks due after `elapsed` seconds of wall time
    pub fn due_ticks(&mut self, elapsed: f64) -> u32 {
        // Clamp so a long stall doesn't queue up a spiral of catch-up ticks
        let elapsed = elapsed.clamp(0.0, self.tick_seconds * (self.max_catch_up + 1) as f64);
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.tick_seconds && ticks < self.max_catch_up {
            self.accumulator -= self.tick_seconds;
            ticks += 1;
        }
        ticks
    }

    /// Wall time until the next tick is due
    pub fn time_until_next(&self) -> Duration {
        Duration::from_secs_f64((self.tick_seconds - self.accumulator).max(0.0))
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub bodies: usize,
    pub counts: EventCounts,
}

/// Single writer of the simulation state
pub struct Driver<P = PolicyKind> {
    config: SimulationConfig,
    rules: StepRules,
    policy: P,
    rng: Pcg32,
    state: SimulationState,
    tick: u64,
    totals: EventCounts,
}

impl Driver<PolicyKind> {
    /// Driver using the policy named in the config
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let policy = config.policy;
        log::info!("Escape policy: {}", policy.as_str());
        Self::with_policy(config, policy)
    }
}

impl<P: EscapePolicy> Driver<P> {
    /// Driver with an explicitly supplied policy
    pub fn with_policy(config: SimulationConfig, policy: P) -> Result<Self, SimError> {
        config.validate()?;
        let rules = config.step_rules()?;
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let bodies = rules.spawner.spawn_many(config.initial_bodies, &mut rng);
        let state = SimulationState::new(bodies);

        log::info!(
            "Simulation seeded with {} ({} initial bodies)",
            config.seed,
            state.len()
        );

        Ok(Self {
            config,
            rules,
            policy,
            rng,
            state,
            tick: 0,
            totals: EventCounts::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        self.rules.arena()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn totals(&self) -> &EventCounts {
        &self.totals
    }

    /// Run one step, replacing the state
    pub fn tick(&mut self) -> Result<Vec<SimEvent>, SimError> {
        let out = step(&self.state, &self.rules, &self.policy, &mut self.rng)?;
        self.state = out.state;
        self.tick += 1;

        let counts = EventCounts::from_events(&out.events);
        self.totals.merge(&counts);
        if counts.escaped > 0 || counts.left_viewport > 0 {
            log::debug!(
                "Tick {}: {} escaped, {} spawned, {} off-screen, {} alive",
                self.tick,
                counts.escaped,
                counts.spawned,
                counts.left_viewport,
                self.state.len()
            );
        }
        Ok(out.events)
    }

    /// Hand the current state to a sink
    pub fn present<S: FrameSink + ?Sized>(&self, sink: &mut S) -> Result<(), SinkError> {
        sink.present(&Frame {
            tick: self.tick,
            arena: self.rules.arena(),
            bodies: self.state.bodies(),
        })
    }

    /// Step then present
    pub fn advance<S>(&mut self, sink: &mut S) -> Result<Vec<SimEvent>, SimError>
    where
        S: FrameSink + ?Sized,
    {
        let events = self.tick()?;
        self.present(sink)?;
        Ok(events)
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.tick,
            bodies: self.state.len(),
            counts: self.totals,
        }
    }

    /// Run as fast as possible until `quit` fires or `max_ticks` more ticks have run
    pub fn run<S, Q>(
        &mut self,
        sink: &mut S,
        quit: &mut Q,
        max_ticks: Option<u64>,
    ) -> Result<RunSummary, SimError>
    where
        S: FrameSink + ?Sized,
        Q: QuitSignal + ?Sized,
    {
        let start = self.tick;
        while max_ticks.is_none_or(|max| self.tick - start < max) {
            if quit.should_quit() {
                log::info!("Quit requested at tick {}", self.tick);
                break;
            }
            self.advance(sink)?;
        }
        let summary = self.summary();
        log::info!(
            "Run finished after {} ticks: {} bodies, {} escapes, {} spawns, {} off-screen",
            summary.ticks,
            summary.bodies,
            summary.counts.escaped,
            summary.counts.spawned,
            summary.counts.left_viewport
        );
        Ok(summary)
    }

    /// Run in real time at the configured tick rate
    pub fn run_paced<S, Q>(
        &mut self,
        sink: &mut S,
        quit: &mut Q,
        max_ticks: Option<u64>,
    ) -> Result<RunSummary, SimError>
    where
        S: FrameSink + ?Sized,
        Q: QuitSignal + ?Sized,
    {
        let mut pacer = Pacer::new(self.config.tick_rate, self.config.max_catch_up_ticks);
        let start = self.tick;
        let mut last = Instant::now();

        'outer: loop {
            let now = Instant::now();
            let due = pacer.due_ticks(now.duration_since(last).as_secs_f64());
            last = now;

            for _ in 0..due {
                if max_ticks.is_some_and(|max| self.tick - start >= max) || quit.should_quit() {
                    break 'outer;
                }
                self.advance(sink)?;
            }
            std::thread::sleep(pacer.time_until_next());
        }

        let summary = self.summary();
        log::info!(
            "Paced run finished after {} ticks: {} bodies alive",
            summary.ticks,
            summary.bodies
        );
        Ok(summary)
    }
}
