use serde::Serialize;

use crate::history::DrawHistory;

pub const GAP_SERIES: usize = 4;

/// Résumé d'une série d'écarts entre deux positions adjacentes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapSummary {
    /// Positions comparées, 1-indexées : (1, 2) .. (4, 5).
    pub positions: (usize, usize),
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<u8>,
    pub max: Option<u8>,
    /// Écart-type de l'échantillon (n - 1) ; absent sous deux tirages.
    pub std_dev: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapProfile {
    /// Pour chaque paire de positions, l'écart de chaque tirage (ordre de l'historique).
    pub series: [Vec<u8>; GAP_SERIES],
    pub summaries: [GapSummary; GAP_SERIES],
}

impl GapProfile {
    /// Médianes tronquées à l'entier, comme référence pour le générateur.
    pub fn median_gaps(&self) -> Option<[i32; GAP_SERIES]> {
        let mut gaps = [0i32; GAP_SERIES];
        for (slot, summary) in gaps.iter_mut().zip(&self.summaries) {
            *slot = summary.median?.trunc() as i32;
        }
        Some(gaps)
    }
}

pub fn compute_gap_profile(history: &DrawHistory) -> GapProfile {
    let mut series: [Vec<u8>; GAP_SERIES] = Default::default();
    for s in series.iter_mut() {
        s.reserve(history.len());
    }

    for draw in history {
        let main = draw.main();
        debug_assert!(main.windows(2).all(|w| w[0] < w[1]), "tirage non trié : {:?}", main);
        for i in 0..GAP_SERIES {
            series[i].push(main[i + 1] - main[i]);
        }
    }

    let summaries = std::array::from_fn(|i| summarize((i + 1, i + 2), &series[i]));
    GapProfile { series, summaries }
}

fn summarize(positions: (usize, usize), values: &[u8]) -> GapSummary {
    let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let mean = if count > 0 { Some(sorted.iter().sum::<f64>() / count as f64) } else { None };
    let std_dev = match mean {
        Some(m) if count > 1 => {
            let var = sorted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(var.sqrt())
        }
        _ => None,
    };

    GapSummary {
        positions,
        count,
        mean,
        median: quantile(&sorted, 0.5),
        min: values.iter().copied().min(),
        max: values.iter().copied().max(),
        std_dev,
        q1: quantile(&sorted, 0.25),
        q3: quantile(&sorted, 0.75),
    }
}

/// Quantile par interpolation linéaire entre les rangs (même convention que pandas).
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
