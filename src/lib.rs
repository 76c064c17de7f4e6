//! `tripbandit`: conjugate Thompson-sampling bandits for ranking a small set of options.
//!
//! Designed for "which option should I pick next" problems with a handful of
//! arms (commute routes, suppliers, recipes) where each choice is followed by an
//! observation.  Two reward models are provided:
//!
//! - [`NormalGammaBandit`]: continuous observations (e.g. travel time in minutes,
//!   or `hh:mm:ss` strings) tracked with a Normal-Gamma conjugate prior.  The
//!   ranking is risk-adjusted: the sampled mean is weighted by `rho` and the
//!   sampled variance is penalized.
//! - [`BetaBernoulliBandit`]: binary outcomes (`0` / `1`) tracked with a Beta
//!   prior.
//!
//! Both implement [`ConjugateBandit`], which adds windowed event replay
//! ([`ConjugateBandit::process_events`]) on top of single updates.
//!
//! **Goals:**
//! - **Closed-form updates**: every observation is an O(1) in-place update of
//!   one arm's sufficient statistics.
//! - **Seedable**: every random draw goes through a caller-visible `Rng`, so
//!   rankings are reproducible in tests.
//! - **Atomic rejection**: a rejected update or replay leaves the bandit
//!   untouched.
//!
//! **Non-goals:**
//! - No persistence, networking, or multi-user isolation.  Construct one bandit
//!   per decision problem and pass it where it is needed.
//!
//! ```rust
//! use tripbandit::{ConjugateBandit, NormalGammaBandit, NormalGammaConfig};
//!
//! let mut b = NormalGammaBandit::with_seed(["bus", "bike"], NormalGammaConfig::default(), 7).unwrap();
//! b.update("bus", "00:42:00").unwrap();
//! b.update("bike", 35.5).unwrap();
//! let ranking = b.grade();
//! assert_eq!(ranking.len(), 2);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod direction;
pub use direction::*;

mod store;
pub use store::*;

mod history;
pub use history::*;

mod observation;
pub use observation::*;

mod ranking;
pub use ranking::*;

mod replay;
pub use replay::*;

mod policy;
pub use policy::*;

mod normal_gamma;
pub use normal_gamma::*;

mod beta_bernoulli;
pub use beta_bernoulli::*;

mod utils;
pub use utils::*;

pub const TRIPBANDIT_VERSION: &str = env!("CARGO_PKG_VERSION");
