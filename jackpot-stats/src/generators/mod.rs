pub mod frequency;
pub mod median_gap;
pub mod uniform;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use jackpot_db::models::Tip;

use crate::config::GeneratorConfig;
use crate::gaps::GapProfile;
use crate::history::DrawHistory;

/// Résultat d'une génération : une grille, ou l'abandon après épuisement des essais.
#[derive(Debug, Clone, PartialEq)]
pub enum TipOutcome {
    Generated(Tip),
    Exhausted { attempts: u32 },
}

impl TipOutcome {
    pub fn tip(&self) -> Option<&Tip> {
        match self {
            TipOutcome::Generated(tip) => Some(tip),
            TipOutcome::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, TipOutcome::Exhausted { .. })
    }
}

pub trait TipStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn generate(&self, rng: &mut StdRng) -> TipOutcome;
    /// Écarts de référence, pour comparer la grille générée à l'historique.
    fn reference_gaps(&self) -> Option<[i32; 4]> {
        None
    }
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Tirage uniforme sans remise de `N` numéros dans [1, pool], triés.
pub fn sample_sorted<const N: usize, R: Rng + ?Sized>(rng: &mut R, pool: u8) -> [u8; N] {
    let mut out = [0u8; N];
    let picked = rand::seq::index::sample(rng, pool as usize, N);
    for (slot, idx) in out.iter_mut().zip(picked.iter()) {
        *slot = (idx + 1) as u8;
    }
    out.sort_unstable();
    out
}

pub fn all_strategies(
    history: &DrawHistory,
    profile: &GapProfile,
    config: &GeneratorConfig,
) -> Result<Vec<Box<dyn TipStrategy>>> {
    Ok(vec![
        Box::new(frequency::FrequencyStrategy::from_history(history)),
        Box::new(uniform::UniformStrategy),
        Box::new(median_gap::MedianGapStrategy::from_profile(profile, config.clone())?),
    ])
}
