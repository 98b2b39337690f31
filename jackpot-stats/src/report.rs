use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use jackpot_db::models::{NumberStats, Pool};

use crate::cache::StatsCache;
use crate::combinations::CombinationCount;
use crate::gaps::GapSummary;
use crate::history::DrawHistory;

/// Export JSON de l'ensemble des statistiques d'un historique.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub draw_count: usize,
    pub fingerprint: String,
    pub main_frequencies: Vec<NumberStats>,
    pub bonus_frequencies: Vec<NumberStats>,
    pub pairs: Vec<CombinationCount>,
    pub triplets: Vec<CombinationCount>,
    pub gaps: Vec<GapSummary>,
    pub median_gaps: Option<[i32; 4]>,
}

impl StatsReport {
    /// `top` limite les tables de paires et de triplets (`None` = tout).
    pub fn build(history: &DrawHistory, cache: &mut StatsCache, top: Option<usize>) -> Result<Self> {
        let limit = top.unwrap_or(usize::MAX);
        let main_frequencies = cache.frequencies(history, Pool::Main).to_vec();
        let bonus_frequencies = cache.frequencies(history, Pool::Bonus).to_vec();
        let pairs = cache.combinations(history, 2)?.top(limit).to_vec();
        let triplets = cache.combinations(history, 3)?.top(limit).to_vec();
        let profile = cache.gap_profile(history);

        Ok(Self {
            draw_count: history.len(),
            fingerprint: format!("{:016x}", history.fingerprint()),
            main_frequencies,
            bonus_frequencies,
            pairs,
            triplets,
            gaps: profile.summaries.to_vec(),
            median_gaps: profile.median_gaps(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {:?}", path))?;
        log::info!("Statistiques exportées dans {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::make_test_history;

    #[test]
    fn test_build_report() {
        let history = make_test_history(30);
        let mut cache = StatsCache::new();
        let report = StatsReport::build(&history, &mut cache, Some(5)).unwrap();
        assert_eq!(report.draw_count, 30);
        assert_eq!(report.main_frequencies.len(), 50);
        assert_eq!(report.bonus_frequencies.len(), 12);
        assert_eq!(report.pairs.len(), 5);
        assert_eq!(report.triplets.len(), 5);
        assert_eq!(report.gaps.len(), 4);
        assert_eq!(report.median_gaps, Some([2, 3, 2, 2]));
    }

    #[test]
    fn test_save_json() {
        let history = make_test_history(12);
        let mut cache = StatsCache::new();
        let report = StatsReport::build(&history, &mut cache, None).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        report.save(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["draw_count"], 12);
        assert_eq!(value["gaps"].as_array().unwrap().len(), 4);
        assert!(value["pairs"].as_array().unwrap().len() > 5);
    }
}
