use std::collections::HashMap;

use anyhow::Result;

use jackpot_db::models::{NumberStats, Pool};

use crate::combinations::{CombinationTable, count_combinations};
use crate::frequency::frequencies;
use crate::gaps::{GapProfile, compute_gap_profile};
use crate::history::DrawHistory;

/// Cache explicite des tables dérivées, indexé par l'empreinte de l'historique.
///
/// Un historique d'empreinte différente vide le cache avant recalcul ;
/// `invalidate` le vide à la demande (rechargement de la base).
#[derive(Debug, Default)]
pub struct StatsCache {
    fingerprint: Option<u64>,
    frequencies: HashMap<Pool, Vec<NumberStats>>,
    combinations: HashMap<usize, CombinationTable>,
    gap_profile: Option<GapProfile>,
    hits: u64,
    misses: u64,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        log::debug!("Cache des statistiques invalidé");
        self.fingerprint = None;
        self.frequencies.clear();
        self.combinations.clear();
        self.gap_profile = None;
    }

    fn bind(&mut self, history: &DrawHistory) {
        if self.fingerprint != Some(history.fingerprint()) {
            if self.fingerprint.is_some() {
                log::info!("Historique modifié, recalcul des statistiques");
            }
            self.invalidate();
            self.fingerprint = Some(history.fingerprint());
        }
    }

    fn record(&mut self, hit: bool, what: &str) {
        if hit {
            self.hits += 1;
            log::debug!("Cache hit : {what}");
        } else {
            self.misses += 1;
            log::debug!("Cache miss : {what}");
        }
    }

    pub fn frequencies(&mut self, history: &DrawHistory, pool: Pool) -> &[NumberStats] {
        self.bind(history);
        let hit = self.frequencies.contains_key(&pool);
        self.record(hit, "fréquences");
        self.frequencies
            .entry(pool)
            .or_insert_with(|| frequencies(history, pool))
    }

    pub fn combinations(&mut self, history: &DrawHistory, k: usize) -> Result<&CombinationTable> {
        self.bind(history);
        let hit = self.combinations.contains_key(&k);
        self.record(hit, "combinaisons");
        if !hit {
            let table = count_combinations(history, k)?;
            self.combinations.insert(k, table);
        }
        Ok(&self.combinations[&k])
    }

    pub fn gap_profile(&mut self, history: &DrawHistory) -> &GapProfile {
        self.bind(history);
        let hit = self.gap_profile.is_some();
        self.record(hit, "écarts");
        self.gap_profile.get_or_insert_with(|| compute_gap_profile(history))
    }

    /// (hits, misses) depuis la création du cache.
    pub fn counters(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
