use jackpot_db::models::{NumberStats, Pool};

use crate::history::DrawHistory;

/// Fréquence de chaque numéro du pool, zéros compris.
///
/// Triée par fréquence décroissante ; à égalité le plus petit numéro passe devant.
pub fn frequencies(history: &DrawHistory, pool: Pool) -> Vec<NumberStats> {
    let size = pool.size();
    let n = history.len();
    let mut counts = vec![0u32; size];
    let mut last_index: Vec<Option<usize>> = vec![None; size];

    for (t, draw) in history.iter().enumerate() {
        for &number in pool.numbers_from(draw) {
            let idx = (number - 1) as usize;
            if idx < size {
                counts[idx] += 1;
                last_index[idx] = Some(t);
            }
        }
    }

    let mut stats: Vec<NumberStats> = (0..size)
        .map(|idx| NumberStats {
            number: (idx + 1) as u8,
            frequency: counts[idx],
            share: if n > 0 { counts[idx] as f64 / n as f64 } else { 0.0 },
            last_seen: match last_index[idx] {
                Some(t) => (n - 1 - t) as u32,
                None => n as u32,
            },
        })
        .collect();

    stats.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));
    stats
}

/// Les `count` numéros les plus fréquents, triés par ordre croissant.
pub fn top_numbers(history: &DrawHistory, pool: Pool, count: usize) -> Vec<u8> {
    let mut top: Vec<u8> = frequencies(history, pool)
        .into_iter()
        .take(count)
        .map(|s| s.number)
        .collect();
    top.sort_unstable();
    top
}
