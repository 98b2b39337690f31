use rand::rngs::StdRng;

use jackpot_db::models::{BONUS_POOL, MAIN_POOL, Tip};

use super::{TipOutcome, TipStrategy, sample_sorted};

/// Grille purement aléatoire, sans regard pour l'historique.
pub struct UniformStrategy;

impl TipStrategy for UniformStrategy {
    fn name(&self) -> &str {
        "Aléatoire"
    }

    fn description(&self) -> &str {
        "Tirage uniforme sans remise, chaque numéro a la même chance"
    }

    fn generate(&self, rng: &mut StdRng) -> TipOutcome {
        TipOutcome::Generated(Tip {
            main: sample_sorted(rng, MAIN_POOL),
            bonus: sample_sorted(rng, BONUS_POOL),
            reference_gaps: None,
        })
    }
}
