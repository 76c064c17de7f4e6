//! Normal-Gamma bandit for continuous observations (travel times, costs).
//!
//! Each arm carries the sufficient statistics of a Normal-Gamma posterior over
//! an unknown mean and unknown precision.  Ranking draws a precision `tau` and a
//! mean `theta` per arm and orders arms by a risk-adjusted key:
//!
//! - minimize: `rho * theta + 1/tau`, ascending
//! - maximize: `rho * theta - 1/tau`, descending
//!
//! so larger `rho` weights the sampled mean more heavily relative to the
//! sampled variance.
//!
//! Notes:
//! - `theta` is drawn with variance `1/T`; arms with `T = 0` are clamped to
//!   [`MIN_SAMPLE_COUNT`] (a very wide draw).
//! - While arms are untried (see [`ColdStart`]) the ranking is by `T`
//!   ascending instead, which walks the roster in order.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal};
use tracing::{debug, trace, warn};

use crate::{
    ArmStore, ConjugateBandit, Direction, Error, Graded, History, Observation, Ranking, Result,
    Z_975,
};

/// Floor applied to `T` when drawing `theta` for an arm without data.
pub const MIN_SAMPLE_COUNT: f64 = 1e-6;

/// Initial posterior parameters shared by every arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalGammaPrior {
    /// Prior mean.
    pub mu0: f64,
    /// Prior pseudo-count (must be >= 0).
    pub t0: f64,
    /// Prior Gamma shape (must be > 0).
    pub alpha0: f64,
    /// Prior Gamma rate (must be > 0).
    pub beta0: f64,
}

impl Default for NormalGammaPrior {
    fn default() -> Self {
        Self {
            mu0: 0.0,
            t0: 0.0,
            alpha0: 0.5,
            beta0: 0.5,
        }
    }
}

/// When to rank by sample count instead of by the risk-adjusted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColdStart {
    /// Explore while any arm has `T == 0`: untried arms come first, in roster order.
    #[default]
    AnyUntried,
    /// Explore only while every arm has `T == 0`.
    AllUntried,
}

/// Configuration for [`NormalGammaBandit`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormalGammaConfig {
    pub direction: Direction,
    /// Risk tolerance: weight on the sampled mean relative to the sampled
    /// variance.  Must be finite.
    pub rho: f64,
    pub prior: NormalGammaPrior,
    pub cold_start: ColdStart,
}

impl Default for NormalGammaConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Minimize,
            rho: 1.0,
            prior: NormalGammaPrior::default(),
            cold_start: ColdStart::AnyUntried,
        }
    }
}

impl NormalGammaConfig {
    /// Set the direction from a `minimize` flag.
    pub fn minimize(mut self, minimize: bool) -> Self {
        self.direction = Direction::from_minimize(minimize);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_prior(mut self, prior: NormalGammaPrior) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_cold_start(mut self, cold_start: ColdStart) -> Self {
        self.cold_start = cold_start;
        self
    }

    /// Check every parameter's domain.
    pub fn validate(&self) -> Result<()> {
        let p = &self.prior;
        if !self.rho.is_finite() {
            return Err(Error::InvalidConfig("rho must be finite"));
        }
        if !p.mu0.is_finite() {
            return Err(Error::InvalidConfig("prior mu0 must be finite"));
        }
        if !(p.t0.is_finite() && p.t0 >= 0.0) {
            return Err(Error::InvalidConfig("prior t0 must be finite and >= 0"));
        }
        if !(p.alpha0.is_finite() && p.alpha0 > 0.0) {
            return Err(Error::InvalidConfig("prior alpha0 must be finite and > 0"));
        }
        if !(p.beta0.is_finite() && p.beta0 > 0.0) {
            return Err(Error::InvalidConfig("prior beta0 must be finite and > 0"));
        }
        Ok(())
    }
}

/// Normal-Gamma posterior state for one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalGammaStats {
    /// Posterior mean.
    pub mu: f64,
    /// Effective sample count.
    pub t: f64,
    /// Gamma shape.
    pub alpha: f64,
    /// Gamma rate.
    pub beta: f64,
}

impl NormalGammaStats {
    pub fn from_prior(prior: NormalGammaPrior) -> Self {
        Self {
            mu: prior.mu0,
            t: prior.t0,
            alpha: prior.alpha0,
            beta: prior.beta0,
        }
    }

    /// Posterior after observing `x`.
    ///
    /// `beta` is updated from the pre-update `mu` and `T`:
    ///
    /// ```text
    /// beta'  = beta + (T / (T + 1)) * (x - mu)^2 / 2
    /// mu'    = T * mu / (T + 1) + x / (T + 1)
    /// T'     = T + 1
    /// alpha' = alpha + 1/2
    /// ```
    pub fn updated(&self, x: f64) -> Self {
        let n = self.t + 1.0;
        let dev = x - self.mu;
        // Shrink before squaring so an untried arm never computes `0 * inf`.
        Self {
            beta: self.beta + self.t / n * dev * dev / 2.0,
            mu: self.t * self.mu / n + x / n,
            t: n,
            alpha: self.alpha + 0.5,
        }
    }

    /// Whether every parameter is finite.
    pub fn is_finite(&self) -> bool {
        self.mu.is_finite() && self.t.is_finite() && self.alpha.is_finite() && self.beta.is_finite()
    }

    /// Whether `T` is still zero (no observations and no prior pseudo-count).
    pub fn is_untried(&self) -> bool {
        self.t == 0.0
    }

    /// Posterior mean of the precision, `alpha / beta`.
    pub fn expected_precision(&self) -> f64 {
        self.alpha / self.beta
    }
}

/// One row of a Normal-Gamma ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalGammaGrade {
    pub name: String,
    pub stats: NormalGammaStats,
    /// Sampled precision, `Gamma(alpha, rate = beta)`.
    pub tau: f64,
    /// Sampled mean, `Normal(mu, 1/T)`.
    pub theta: f64,
    /// `sqrt(1/tau)`.
    pub sd: f64,
    /// 95% band edge on the unfavourable side: `theta + z*SD` when minimizing,
    /// `theta - z*SD` when maximizing.
    pub var95: f64,
    /// Risk-adjusted key (`rho*theta + 1/tau` or `rho*theta - 1/tau`).
    pub score: f64,
}

impl Graded for NormalGammaGrade {
    fn name(&self) -> &str {
        &self.name
    }

    fn header() -> Vec<&'static str> {
        vec!["name", "mu", "T", "SD", "var95"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("{:.2}", self.stats.mu),
            format!("{}", self.stats.t),
            format!("{:.2}", self.sd),
            format!("{:.2}", self.var95),
        ]
    }
}

/// Seedable Normal-Gamma Thompson-sampling bandit over a fixed roster.
#[derive(Debug, Clone)]
pub struct NormalGammaBandit {
    cfg: NormalGammaConfig,
    store: ArmStore<NormalGammaStats>,
    history: History<f64>,
    rng: StdRng,
}

impl NormalGammaBandit {
    /// Create a bandit whose generator is seeded from OS entropy.
    pub fn new<I, N>(arms: I, cfg: NormalGammaConfig) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::with_rng(arms, cfg, StdRng::from_os_rng())
    }

    /// Create a bandit with a fixed seed (reproducible rankings).
    pub fn with_seed<I, N>(arms: I, cfg: NormalGammaConfig, seed: u64) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::with_rng(arms, cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng<I, N>(arms: I, cfg: NormalGammaConfig, rng: StdRng) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        cfg.validate()?;
        let store = ArmStore::new(arms, |_| NormalGammaStats::from_prior(cfg.prior))?;
        Ok(Self {
            cfg,
            store,
            history: History::default(),
            rng,
        })
    }

    pub fn config(&self) -> &NormalGammaConfig {
        &self.cfg
    }

    /// Posterior state of `arm`.
    pub fn stats(&self, arm: &str) -> Option<&NormalGammaStats> {
        self.store.get(arm)
    }

    /// All arms with their posterior state, in roster order.
    pub fn store(&self) -> &ArmStore<NormalGammaStats> {
        &self.store
    }

    /// Applied observations, in minutes for duration inputs.
    pub fn history(&self) -> &History<f64> {
        &self.history
    }

    /// Apply one observation to `arm`.
    ///
    /// Accepts numbers, numeric strings, and `hh:mm:ss` durations (as minutes).
    /// An observation large enough to push the posterior out of `f64` range is
    /// rejected as [`Error::InvalidObservation`].
    pub fn update(&mut self, arm: &str, value: impl Into<Observation>) -> Result<()> {
        let value = value.into();
        let (x, next) = self.checked_update(arm, &value)?;

        let s = self.store.get_mut(arm)?;
        *s = next;
        debug!(arm, value = x, mu = s.mu, t = s.t, beta = s.beta, "normal-gamma update");
        self.history.push(arm, x);
        Ok(())
    }

    fn checked_update(&self, arm: &str, value: &Observation) -> Result<(f64, NormalGammaStats)> {
        let current = self.store.require(arm)?;
        let x = value.resolve()?;
        let next = current.updated(x);
        if !next.is_finite() {
            return Err(Error::InvalidObservation(value.to_string()));
        }
        Ok((x, next))
    }
}

impl ConjugateBandit for NormalGammaBandit {
    type Value = Observation;
    type Grade = NormalGammaGrade;

    fn arms(&self) -> &[String] {
        self.store.names()
    }

    fn direction(&self) -> Direction {
        self.cfg.direction
    }

    fn validate(&self, arm: &str, value: &Observation) -> Result<()> {
        self.checked_update(arm, value).map(|_| ())
    }

    fn apply(&mut self, arm: &str, value: Observation) -> Result<()> {
        self.update(arm, value)
    }

    fn grade_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Ranking<NormalGammaGrade> {
        rank(&self.cfg, &self.store, rng)
    }

    fn grade(&mut self) -> Ranking<NormalGammaGrade> {
        rank(&self.cfg, &self.store, &mut self.rng)
    }
}

fn rank<R: Rng + ?Sized>(
    cfg: &NormalGammaConfig,
    store: &ArmStore<NormalGammaStats>,
    rng: &mut R,
) -> Ranking<NormalGammaGrade> {
    let cold = match cfg.cold_start {
        ColdStart::AnyUntried => store.iter().any(|(_, s)| s.is_untried()),
        ColdStart::AllUntried => store.iter().all(|(_, s)| s.is_untried()),
    };

    let mut rows: Vec<NormalGammaGrade> = store
        .iter()
        .map(|(name, s)| {
            let tau = sample_precision(rng, s.alpha, s.beta);
            let theta = sample_mean(rng, s.mu, s.t);
            let sd = (1.0 / tau).sqrt();
            let (var95, score) = match cfg.direction {
                Direction::Minimize => (theta + Z_975 * sd, cfg.rho * theta + 1.0 / tau),
                Direction::Maximize => (theta - Z_975 * sd, cfg.rho * theta - 1.0 / tau),
            };
            trace!(arm = name, tau, theta, score, "graded");
            NormalGammaGrade {
                name: name.to_string(),
                stats: *s,
                tau,
                theta,
                sd,
                var95,
                score,
            }
        })
        .collect();

    // Stable sorts: ties keep roster order.
    if cold {
        rows.sort_by(|a, b| a.stats.t.total_cmp(&b.stats.t));
    } else {
        rows.sort_by(|a, b| cfg.direction.compare(a.score, b.score));
    }
    Ranking::from_sorted(rows)
}

fn sample_precision<R: Rng + ?Sized>(rng: &mut R, alpha: f64, beta: f64) -> f64 {
    match Gamma::new(alpha, 1.0 / beta) {
        Ok(dist) => dist.sample(rng),
        Err(_) => {
            warn!(alpha, beta, "gamma draw rejected; using posterior mean precision");
            alpha / beta
        }
    }
}

fn sample_mean<R: Rng + ?Sized>(rng: &mut R, mu: f64, t: f64) -> f64 {
    let sd = (1.0 / t.max(MIN_SAMPLE_COUNT)).sqrt();
    match Normal::new(mu, sd) {
        Ok(dist) => dist.sample(rng),
        Err(_) => {
            warn!(mu, t, "normal draw rejected; using posterior mean");
            mu
        }
    }
}

/// Configuration, arm table, and history length.
impl fmt::Display for NormalGammaBandit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "NormalGammaBandit(direction={:?}, rho={})",
            self.cfg.direction, self.cfg.rho
        )?;
        for (name, s) in self.store.iter() {
            writeln!(
                f,
                "  {name}: mu={} T={} alpha={} beta={}",
                s.mu, s.t, s.alpha, s.beta
            )?;
        }
        write!(f, "history: {} records", self.history.len())
    }
}
