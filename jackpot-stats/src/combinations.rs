use std::collections::HashMap;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::history::DrawHistory;

/// k-uplet canonique de numéros principaux (ordre croissant).
pub type Combination = Vec<u8>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationCount {
    pub numbers: Combination,
    pub count: u32,
}

impl CombinationCount {
    /// Libellé d'affichage : `5 - 10 - 23`.
    pub fn label(&self) -> String {
        self.numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationTable {
    pub arity: usize,
    /// Trié par nombre d'occurrences décroissant, puis par k-uplet croissant.
    pub entries: Vec<CombinationCount>,
}

impl CombinationTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, n: usize) -> &[CombinationCount] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn count_of(&self, numbers: &[u8]) -> u32 {
        let mut key = numbers.to_vec();
        key.sort_unstable();
        self.entries
            .iter()
            .find(|e| e.numbers == key)
            .map(|e| e.count)
            .unwrap_or(0)
    }
}

/// Compte les k-uplets de numéros principaux sortis ensemble.
///
/// Chaque tirage contribue ses C(5, k) sous-ensembles ; un historique vide
/// donne une table vide.
pub fn count_combinations(history: &DrawHistory, k: usize) -> Result<CombinationTable> {
    if k == 0 || k > 5 {
        bail!("Taille de combinaison invalide : {} (attendu 1-5)", k);
    }

    let mut counts: HashMap<Combination, u32> = HashMap::new();
    for draw in history {
        let mut numbers = *draw.main();
        numbers.sort_unstable();
        for_each_subset(&numbers, k, |subset| {
            *counts.entry(subset.to_vec()).or_insert(0) += 1;
        });
    }

    let mut entries: Vec<CombinationCount> = counts
        .into_iter()
        .map(|(numbers, count)| CombinationCount { numbers, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.numbers.cmp(&b.numbers)));

    log::debug!("{} combinaisons distinctes de taille {}", entries.len(), k);
    Ok(CombinationTable { arity: k, entries })
}

/// Énumère les sous-ensembles de taille `k` dans l'ordre lexicographique des indices.
fn for_each_subset<F: FnMut(&[u8])>(items: &[u8], k: usize, mut f: F) {
    let n = items.len();
    if k > n {
        return;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    let mut subset = vec![0u8; k];
    loop {
        for (slot, &i) in subset.iter_mut().zip(&indices) {
            *slot = items[i];
        }
        f(&subset);

        // Position la plus à droite encore incrémentable
        let mut pos = k;
        while pos > 0 && indices[pos - 1] == n - k + pos - 1 {
            pos -= 1;
        }
        if pos == 0 {
            return;
        }
        indices[pos - 1] += 1;
        for j in pos..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
