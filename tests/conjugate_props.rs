//! Property tests for the conjugate update engines.
//!
//! 1. **Positivity**: `alpha > 0` and `beta > 0` before and after every update.
//! 2. **Monotone counts**: `T` / `runs` never decrease.
//! 3. **Closed form**: after any sequence, Normal-Gamma `mu` is the sample mean
//!    and `beta - beta0` is half the sum of squared deviations.
//! 4. **Rejection is side-effect free**: a failed update changes nothing.

use proptest::prelude::*;
use tripbandit::{
    BetaBernoulliBandit, BetaBernoulliConfig, BetaStats, Error, NormalGammaBandit,
    NormalGammaConfig, NormalGammaStats,
};

fn arms(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("arm{i}")).collect()
}

fn snapshot_ng(b: &NormalGammaBandit) -> Vec<NormalGammaStats> {
    b.store().iter().map(|(_, s)| *s).collect()
}

fn snapshot_bb(b: &BetaBernoulliBandit) -> Vec<BetaStats> {
    b.store().iter().map(|(_, s)| *s).collect()
}

proptest! {
    #[test]
    fn normal_gamma_parameters_stay_positive(
        n_arms in 1usize..5,
        obs in prop::collection::vec((0usize..5, -1e4f64..1e4), 0..100),
    ) {
        let a = arms(n_arms);
        let mut b = NormalGammaBandit::with_seed(a.clone(), NormalGammaConfig::default(), 0).unwrap();
        for (i, x) in obs {
            let arm = &a[i % n_arms];
            let before = *b.stats(arm).unwrap();
            b.update(arm, x).unwrap();
            let after = *b.stats(arm).unwrap();
            prop_assert!(after.alpha > 0.0 && after.beta > 0.0);
            prop_assert!(after.beta >= before.beta);
            prop_assert_eq!(after.t, before.t + 1.0);
            prop_assert_eq!(after.alpha, before.alpha + 0.5);
        }
        for (_, s) in b.store().iter() {
            prop_assert!(s.alpha > 0.0 && s.beta > 0.0);
        }
    }

    #[test]
    fn normal_gamma_matches_sample_moments(xs in prop::collection::vec(-500f64..500.0, 1..60)) {
        let mut b = NormalGammaBandit::with_seed(["r"], NormalGammaConfig::default(), 0).unwrap();
        for &x in &xs {
            b.update("r", x).unwrap();
        }
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let ss: f64 = xs.iter().map(|x| (x - mean) * (x - mean)).sum();
        let s = b.stats("r").unwrap();

        prop_assert_eq!(s.t, n);
        prop_assert!((s.mu - mean).abs() <= 1e-6 * (1.0 + mean.abs()), "mu={} mean={}", s.mu, mean);
        prop_assert!(((s.beta - 0.5) - ss / 2.0).abs() <= 1e-6 * (1.0 + ss), "beta={} ss={}", s.beta, ss);
        prop_assert_eq!(b.history().len(), xs.len());
    }

    #[test]
    fn beta_bernoulli_counts_add_up(
        n_arms in 1usize..5,
        obs in prop::collection::vec((0usize..5, any::<bool>()), 0..100),
    ) {
        let a = arms(n_arms);
        let mut b = BetaBernoulliBandit::with_seed(a.clone(), BetaBernoulliConfig::default(), 0).unwrap();
        for (i, win) in &obs {
            let arm = &a[i % n_arms];
            let before = *b.stats(arm).unwrap();
            b.update(arm, u8::from(*win)).unwrap();
            let after = *b.stats(arm).unwrap();
            prop_assert!(after.alpha > 0.0 && after.beta > 0.0);
            prop_assert_eq!(after.runs, before.runs + 1);
        }
        for (_, s) in b.store().iter() {
            // alpha - 1 successes, beta - 1 failures.
            prop_assert_eq!((s.alpha - 1.0) + (s.beta - 1.0), s.runs as f64);
        }
        prop_assert_eq!(b.history().len(), obs.len());
    }

    #[test]
    fn rejected_updates_change_nothing(
        warmup in prop::collection::vec((0usize..3, 0f64..100.0), 0..20),
        bad_reward in prop_oneof![-10f64..-0.01, 0.01f64..0.99, 1.01f64..10.0],
    ) {
        let a = arms(3);
        let mut ng = NormalGammaBandit::with_seed(a.clone(), NormalGammaConfig::default(), 1).unwrap();
        let mut bb = BetaBernoulliBandit::with_seed(a.clone(), BetaBernoulliConfig::default(), 1).unwrap();
        for (i, x) in &warmup {
            ng.update(&a[*i], *x).unwrap();
            bb.update(&a[*i], u8::from(*x > 50.0)).unwrap();
        }
        let (ng0, bb0) = (snapshot_ng(&ng), snapshot_bb(&bb));
        let (ngh, bbh) = (ng.history().len(), bb.history().len());

        prop_assert_eq!(ng.update("missing", 1.0), Err(Error::ArmNotFound("missing".into())));
        prop_assert_eq!(
            ng.update(&a[0], "invalid_time"),
            Err(Error::InvalidObservation("invalid_time".into()))
        );
        prop_assert_eq!(bb.update(&a[0], bad_reward), Err(Error::InvalidReward(bad_reward)));
        prop_assert_eq!(bb.update("missing", 1), Err(Error::ArmNotFound("missing".into())));

        prop_assert_eq!(snapshot_ng(&ng), ng0);
        prop_assert_eq!(snapshot_bb(&bb), bb0);
        prop_assert_eq!(ng.history().len(), ngh);
        prop_assert_eq!(bb.history().len(), bbh);
    }
}
