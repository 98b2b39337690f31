use anyhow::{Result, bail};
use rand::Rng;
use rand::rngs::StdRng;

use jackpot_db::models::{BONUS_POOL, MAIN_POOL, Tip};

use super::{TipOutcome, TipStrategy, sample_sorted};
use crate::config::GeneratorConfig;
use crate::gaps::GapProfile;

/// Marche aléatoire qui reproduit la structure d'un tirage typique :
/// départ bas, puis écarts médians historiques perturbés par un jitter.
pub struct MedianGapStrategy {
    reference_gaps: [i32; 4],
    config: GeneratorConfig,
}

impl MedianGapStrategy {
    /// Refuse une configuration dont les bornes rendraient les tirages impossibles.
    pub fn new(reference_gaps: [i32; 4], config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { reference_gaps, config })
    }

    pub fn from_profile(profile: &GapProfile, config: GeneratorConfig) -> Result<Self> {
        let Some(reference_gaps) = profile.median_gaps() else {
            bail!("Historique vide : aucun écart médian disponible");
        };
        Self::new(reference_gaps, config)
    }

    /// Une tentative : `None` si la marche dépasse 50 ou ne croît pas.
    fn walk(&self, rng: &mut StdRng) -> Option<[u8; 5]> {
        let mut current = rng.random_range(1..=self.config.start_max) as i32;
        let mut numbers = [0u8; 5];
        numbers[0] = current as u8;

        for (i, &gap) in self.reference_gaps.iter().enumerate() {
            let jitter = rng.random_range(self.config.jitter_min..=self.config.jitter_max);
            let next = current + gap + jitter;
            if next > MAIN_POOL as i32 || next <= current {
                return None;
            }
            numbers[i + 1] = next as u8;
            current = next;
        }

        let distinct = (0..5).all(|i| (i + 1..5).all(|j| numbers[i] != numbers[j]));
        distinct.then_some(numbers)
    }
}

impl TipStrategy for MedianGapStrategy {
    fn name(&self) -> &str {
        "Écarts médians"
    }

    fn description(&self) -> &str {
        "Marche aléatoire sur les écarts médians historiques + jitter"
    }

    fn generate(&self, rng: &mut StdRng) -> TipOutcome {
        for attempt in 1..=self.config.max_attempts {
            if let Some(main) = self.walk(rng) {
                log::debug!("Grille acceptée après {} tentative(s)", attempt);
                return TipOutcome::Generated(Tip {
                    main,
                    bonus: sample_sorted(rng, BONUS_POOL),
                    reference_gaps: Some(self.reference_gaps),
                });
            }
        }
        log::warn!(
            "Aucune grille valide après {} tentatives (écarts de référence {:?})",
            self.config.max_attempts,
            self.reference_gaps
        );
        TipOutcome::Exhausted { attempts: self.config.max_attempts }
    }

    fn reference_gaps(&self) -> Option<[i32; 4]> {
        Some(self.reference_gaps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaps::compute_gap_profile;
    use crate::generators::make_rng;
    use crate::history::{DrawHistory, make_test_history};

    #[test]
    fn test_generated_tips_valid() {
        let profile = compute_gap_profile(&make_test_history(60));
        let strategy = MedianGapStrategy::from_profile(&profile, GeneratorConfig::default()).unwrap();
        let mut rng = make_rng(Some(11));
        let mut generated = 0;
        for _ in 0..500 {
            if let TipOutcome::Generated(tip) = strategy.generate(&mut rng) {
                generated += 1;
                assert!(tip.main.windows(2).all(|w| w[0] < w[1]), "{:?}", tip.main);
                assert!(tip.main.iter().all(|&n| (1..=50).contains(&n)));
                assert!(tip.main[0] <= 15);
                assert!(tip.bonus[0] < tip.bonus[1]);
                assert!(tip.bonus.iter().all(|&e| (1..=12).contains(&e)));
                assert_eq!(tip.reference_gaps, Some([2, 3, 2, 2]));
            }
        }
        assert!(generated > 0);
    }

    #[test]
    fn test_jitter_bounds_respected() {
        let strategy = MedianGapStrategy::new([8, 8, 8, 8], GeneratorConfig::default()).unwrap();
        let mut rng = make_rng(Some(5));
        for _ in 0..300 {
            if let Some(tip) = strategy.generate(&mut rng).tip() {
                for gap in tip.gaps() {
                    assert!((6..=12).contains(&gap), "écart {} hors [8-2, 8+4]", gap);
                }
            }
        }
    }

    #[test]
    fn test_zero_gaps_no_jitter_exhausts() {
        let config = GeneratorConfig { jitter_min: 0, jitter_max: 0, ..Default::default() };
        let strategy = MedianGapStrategy::new([0, 0, 0, 0], config).unwrap();
        let outcome = strategy.generate(&mut make_rng(Some(1)));
        assert_eq!(outcome, TipOutcome::Exhausted { attempts: 100 });
        assert_eq!(strategy.reference_gaps(), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_custom_attempt_cap() {
        let config = GeneratorConfig { jitter_min: 0, jitter_max: 0, max_attempts: 7, ..Default::default() };
        let strategy = MedianGapStrategy::new([0, 0, 0, 0], config).unwrap();
        assert_eq!(strategy.generate(&mut make_rng(Some(1))), TipOutcome::Exhausted { attempts: 7 });
    }

    #[test]
    fn test_too_wide_gaps_exhaust() {
        // 1 + 4 * 20 > 50 quel que soit le jitter négatif
        let strategy = MedianGapStrategy::new([20, 20, 20, 20], GeneratorConfig::default()).unwrap();
        assert!(strategy.generate(&mut make_rng(Some(2))).is_exhausted());
    }

    #[test]
    fn test_fixed_walk_is_exact() {
        let config = GeneratorConfig { start_max: 1, jitter_min: 0, jitter_max: 0, ..Default::default() };
        let strategy = MedianGapStrategy::new([4, 6, 10, 12], config).unwrap();
        let outcome = strategy.generate(&mut make_rng(Some(8)));
        assert_eq!(outcome.tip().unwrap().main, [1, 5, 11, 21, 33]);
    }

    #[test]
    fn test_seeded_generation_reproducible() {
        let strategy = MedianGapStrategy::new([7, 7, 7, 7], GeneratorConfig::default()).unwrap();
        let a = strategy.generate(&mut make_rng(Some(123)));
        let b = strategy.generate(&mut make_rng(Some(123)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = GeneratorConfig { jitter_min: 3, jitter_max: -3, ..Default::default() };
        assert!(MedianGapStrategy::new([5, 5, 5, 5], inverted).is_err());

        let no_start = GeneratorConfig { start_max: 0, ..Default::default() };
        assert!(MedianGapStrategy::new([5, 5, 5, 5], no_start).is_err());

        let no_attempts = GeneratorConfig { max_attempts: 0, ..Default::default() };
        let profile = compute_gap_profile(&make_test_history(10));
        assert!(MedianGapStrategy::from_profile(&profile, no_attempts).is_err());
    }

    #[test]
    fn test_empty_profile_rejected() {
        let profile = compute_gap_profile(&DrawHistory::new(vec![]));
        assert!(MedianGapStrategy::from_profile(&profile, GeneratorConfig::default()).is_err());
    }
}
