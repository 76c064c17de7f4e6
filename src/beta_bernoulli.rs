//! Beta-Bernoulli bandit for binary outcomes.
//!
//! This is useful when each choice ends in success or failure (on time / late,
//! accepted / rejected) and you want arms ranked by one Thompson draw each.
//!
//! Notes:
//! - Rewards must be exactly `0` or `1`; anything else is rejected rather than
//!   clamped.
//! - The bandit is **seedable** so rankings can be reproduced in tests.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};
use tracing::{debug, trace, warn};

use crate::{ArmStore, ConjugateBandit, Direction, Error, Graded, History, Ranking, Result};

/// Configuration for [`BetaBernoulliBandit`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BetaBernoulliConfig {
    pub direction: Direction,
    /// Prior alpha (must be > 0).
    pub alpha0: f64,
    /// Prior beta (must be > 0).
    pub beta0: f64,
}

impl Default for BetaBernoulliConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Minimize,
            alpha0: 1.0,
            beta0: 1.0,
        }
    }
}

impl BetaBernoulliConfig {
    /// Set the direction from a `minimize` flag.
    pub fn minimize(mut self, minimize: bool) -> Self {
        self.direction = Direction::from_minimize(minimize);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_prior(mut self, alpha0: f64, beta0: f64) -> Self {
        self.alpha0 = alpha0;
        self.beta0 = beta0;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha0.is_finite() && self.alpha0 > 0.0) {
            return Err(Error::InvalidConfig("prior alpha0 must be finite and > 0"));
        }
        if !(self.beta0.is_finite() && self.beta0 > 0.0) {
            return Err(Error::InvalidConfig("prior beta0 must be finite and > 0"));
        }
        Ok(())
    }
}

/// Beta posterior state for one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetaStats {
    /// Successes + prior alpha.
    pub alpha: f64,
    /// Failures + prior beta.
    pub beta: f64,
    /// Trials applied.
    pub runs: u64,
}

impl BetaStats {
    /// Posterior after one trial with `reward` in `{0, 1}`.
    pub fn updated(&self, reward: u8) -> Self {
        let r = f64::from(reward);
        Self {
            alpha: self.alpha + r,
            beta: self.beta + (1.0 - r),
            runs: self.runs.saturating_add(1),
        }
    }

    pub fn expected_value(&self) -> f64 {
        let denom = self.alpha + self.beta;
        if denom <= 0.0 {
            0.5
        } else {
            self.alpha / denom
        }
    }
}

/// Check a binary reward and narrow it to `0` / `1`.
pub fn parse_reward(reward: f64) -> Result<u8> {
    if reward == 0.0 {
        Ok(0)
    } else if reward == 1.0 {
        Ok(1)
    } else {
        Err(Error::InvalidReward(reward))
    }
}

/// One row of a Beta-Bernoulli ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetaGrade {
    pub name: String,
    pub stats: BetaStats,
    /// Draw from `Beta(alpha, beta)`.
    pub theta_sample: f64,
}

impl Graded for BetaGrade {
    fn name(&self) -> &str {
        &self.name
    }

    fn header() -> Vec<&'static str> {
        vec!["name", "runs", "mean", "theta_sample"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.stats.runs.to_string(),
            format!("{:.3}", self.stats.expected_value()),
            format!("{:.3}", self.theta_sample),
        ]
    }
}

/// Seedable Beta-Bernoulli Thompson-sampling bandit over a fixed roster.
#[derive(Debug, Clone)]
pub struct BetaBernoulliBandit {
    cfg: BetaBernoulliConfig,
    store: ArmStore<BetaStats>,
    history: History<u8>,
    rng: StdRng,
}

impl BetaBernoulliBandit {
    /// Create a bandit whose generator is seeded from OS entropy.
    pub fn new<I, N>(arms: I, cfg: BetaBernoulliConfig) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::with_rng(arms, cfg, StdRng::from_os_rng())
    }

    /// Create a bandit with a fixed seed (reproducible rankings).
    pub fn with_seed<I, N>(arms: I, cfg: BetaBernoulliConfig, seed: u64) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::with_rng(arms, cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng<I, N>(arms: I, cfg: BetaBernoulliConfig, rng: StdRng) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        cfg.validate()?;
        let store = ArmStore::new(arms, |_| BetaStats {
            alpha: cfg.alpha0,
            beta: cfg.beta0,
            runs: 0,
        })?;
        Ok(Self {
            cfg,
            store,
            history: History::default(),
            rng,
        })
    }

    pub fn config(&self) -> &BetaBernoulliConfig {
        &self.cfg
    }

    /// Posterior state of `arm`.
    pub fn stats(&self, arm: &str) -> Option<&BetaStats> {
        self.store.get(arm)
    }

    pub fn store(&self) -> &ArmStore<BetaStats> {
        &self.store
    }

    pub fn history(&self) -> &History<u8> {
        &self.history
    }

    /// Record one trial for `arm`:
    /// - `alpha += reward`
    /// - `beta += 1 - reward`
    /// - `runs += 1`
    pub fn update(&mut self, arm: &str, reward: impl Into<f64>) -> Result<()> {
        let r = parse_reward(reward.into())?;
        let s = self.store.get_mut(arm)?;
        *s = s.updated(r);
        debug!(arm, reward = r, alpha = s.alpha, beta = s.beta, runs = s.runs, "beta-bernoulli update");
        self.history.push(arm, r);
        Ok(())
    }
}

impl ConjugateBandit for BetaBernoulliBandit {
    type Value = f64;
    type Grade = BetaGrade;

    fn arms(&self) -> &[String] {
        self.store.names()
    }

    fn direction(&self) -> Direction {
        self.cfg.direction
    }

    fn validate(&self, arm: &str, value: &f64) -> Result<()> {
        parse_reward(*value)?;
        self.store.require(arm).map(|_| ())
    }

    fn apply(&mut self, arm: &str, value: f64) -> Result<()> {
        self.update(arm, value)
    }

    fn grade_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Ranking<BetaGrade> {
        rank(self.cfg.direction, &self.store, rng)
    }

    fn grade(&mut self) -> Ranking<BetaGrade> {
        rank(self.cfg.direction, &self.store, &mut self.rng)
    }
}

fn rank<R: Rng + ?Sized>(
    direction: Direction,
    store: &ArmStore<BetaStats>,
    rng: &mut R,
) -> Ranking<BetaGrade> {
    let mut rows: Vec<BetaGrade> = store
        .iter()
        .map(|(name, s)| {
            let theta_sample = sample_beta(rng, s.alpha, s.beta);
            trace!(arm = name, theta_sample, "graded");
            BetaGrade {
                name: name.to_string(),
                stats: *s,
                theta_sample,
            }
        })
        .collect();
    rows.sort_by(|a, b| direction.compare(a.theta_sample, b.theta_sample));
    Ranking::from_sorted(rows)
}

fn sample_beta<R: Rng + ?Sized>(rng: &mut R, alpha: f64, beta: f64) -> f64 {
    match Beta::new(alpha, beta) {
        Ok(dist) => dist.sample(rng),
        Err(_) => {
            warn!(alpha, beta, "beta draw rejected; using posterior mean");
            alpha / (alpha + beta)
        }
    }
}

impl fmt::Display for BetaBernoulliBandit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BetaBernoulliBandit(direction={:?})", self.cfg.direction)?;
        for (name, s) in self.store.iter() {
            writeln!(
                f,
                "  {name}: alpha={} beta={} runs={}",
                s.alpha, s.beta, s.runs
            )?;
        }
        write!(f, "history: {} records", self.history.len())
    }
}
