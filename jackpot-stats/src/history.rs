use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use jackpot_db::models::Draw;

/// Historique immuable des tirages, du plus ancien au plus récent.
///
/// L'empreinte est calculée une fois au chargement et sert de clé de cache
/// pour toutes les tables dérivées.
#[derive(Debug, Clone)]
pub struct DrawHistory {
    draws: Vec<Draw>,
    fingerprint: u64,
}

impl DrawHistory {
    pub fn new(draws: Vec<Draw>) -> Self {
        let mut hasher = DefaultHasher::new();
        draws.len().hash(&mut hasher);
        for draw in &draws {
            draw.main().hash(&mut hasher);
            draw.bonus().hash(&mut hasher);
        }
        let fingerprint = hasher.finish();
        Self { draws, fingerprint }
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }
}

impl From<Vec<Draw>> for DrawHistory {
    fn from(draws: Vec<Draw>) -> Self {
        Self::new(draws)
    }
}

impl<'a> IntoIterator for &'a DrawHistory {
    type Item = &'a Draw;
    type IntoIter = std::slice::Iter<'a, Draw>;

    fn into_iter(self) -> Self::IntoIter {
        self.draws.iter()
    }
}

/// Historique synthétique pour les tests : `n` tirages réguliers et valides.
pub fn make_test_history(n: usize) -> DrawHistory {
    let draws = (0..n)
        .map(|i| {
            let base = (i % 9) as u8;
            let main = [
                base * 5 + 1,
                base * 5 + 3,
                base * 5 + 6,
                base * 5 + 8,
                base * 5 + 10,
            ];
            let bonus = [base % 12 + 1, (base + 3) % 12 + 1];
            Draw::new(main, bonus).expect("tirage de test valide")
        })
        .collect();
    DrawHistory::new(draws)
}
