//! Parcours complet : historique -> statistiques en cache -> génération de grilles.

use jackpot_db::models::{Draw, Pool};
use jackpot_stats::cache::StatsCache;
use jackpot_stats::config::GeneratorConfig;
use jackpot_stats::generators::{TipOutcome, all_strategies, make_rng};
use jackpot_stats::history::DrawHistory;

fn sample_history() -> DrawHistory {
    let rows: [([u8; 5], [u8; 2]); 6] = [
        ([5, 12, 19, 33, 47], [3, 8]),
        ([2, 12, 25, 33, 41], [3, 11]),
        ([7, 14, 19, 28, 44], [1, 8]),
        ([12, 19, 20, 33, 50], [5, 8]),
        ([1, 9, 18, 30, 42], [2, 3]),
        ([4, 11, 23, 36, 45], [9, 12]),
    ];
    DrawHistory::new(
        rows.iter()
            .map(|&(main, bonus)| Draw::new(main, bonus).unwrap())
            .collect(),
    )
}

#[test]
fn statistics_and_generation_end_to_end() {
    let history = sample_history();
    let mut cache = StatsCache::new();

    let main = cache.frequencies(&history, Pool::Main).to_vec();
    assert_eq!(main[0].number, 12);
    assert_eq!(main[0].frequency, 3);
    let total: u32 = main.iter().map(|s| s.frequency).sum();
    assert_eq!(total as usize, history.len() * 5);

    let pairs = cache.combinations(&history, 2).unwrap();
    assert_eq!(pairs.entries[0].numbers, vec![12, 33]);
    assert_eq!(pairs.entries[0].count, 3);
    assert_eq!(pairs.count_of(&[19, 12]), 2);

    let triplets = cache.combinations(&history, 3).unwrap();
    assert_eq!(triplets.entries[0].numbers, vec![12, 19, 33]);
    assert_eq!(triplets.entries[0].count, 2);

    let profile = cache.gap_profile(&history).clone();
    assert!(profile.series.iter().all(|s| s.len() == history.len()));
    assert!(profile.series.iter().flatten().all(|&g| g > 0));

    let strategies = all_strategies(&history, &profile, &GeneratorConfig::default()).unwrap();
    let mut rng = make_rng(Some(2024));
    for strategy in &strategies {
        match strategy.generate(&mut rng) {
            TipOutcome::Generated(tip) => {
                assert!(Draw::new(tip.main, tip.bonus).is_ok(), "{}: {:?}", strategy.name(), tip);
                assert!(tip.main.windows(2).all(|w| w[0] < w[1]));
            }
            TipOutcome::Exhausted { attempts } => {
                assert_eq!(strategy.name(), "Écarts médians");
                assert_eq!(attempts, 100);
            }
        }
    }

    let frequency_tip = strategies[0].generate(&mut rng);
    let tip = frequency_tip.tip().unwrap();
    assert_eq!(tip.main, [1, 2, 12, 19, 33]);
    assert_eq!(tip.bonus, [3, 8]);
}
