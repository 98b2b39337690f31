use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};
use textplots::Plot;

use crate::import::ImportResult;
use jackpot_db::models::{Draw, NumberStats, Pool, Tip};
use jackpot_stats::combinations::CombinationTable;
use jackpot_stats::gaps::{GapProfile, GapSummary};
use jackpot_stats::generators::TipOutcome;

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "—".to_string())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Date", "Numéros", "Euro"]);

    for draw in draws {
        table.add_row(vec![
            draw.date().unwrap_or("—").to_string(),
            join_numbers(draw.main()),
            join_numbers(draw.bonus()),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.duplicates);
    if result.malformed > 0 {
        println!("  Lignes mal formées: {}", result.malformed);
    }
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_frequencies(main: &[NumberStats], bonus: &[NumberStats], draw_count: usize) {
    println!("\n📊 Fréquences sur {} tirages\n", draw_count);

    for (pool, stats) in [(Pool::Main, main), (Pool::Bonus, bonus)] {
        println!("── {} ──", pool.label());
        let mut table = new_table();
        table.set_header(vec!["Numéro", "Sorties", "Part", "Dernière sortie"]);

        for stat in stats {
            table.add_row(vec![
                format!("{:2}", stat.number),
                stat.frequency.to_string(),
                format!("{:.1} %", stat.share * 100.0),
                format!("il y a {} tirage(s)", stat.last_seen),
            ]);
        }
        println!("{table}\n");
    }
}

/// Histogramme ASCII des sorties par numéro.
pub fn display_frequency_chart(stats: &[NumberStats], pool: Pool) {
    println!("── Distribution {} ──", pool.label());
    let mut points: Vec<(f32, f32)> = stats
        .iter()
        .map(|s| (s.number as f32, s.frequency as f32))
        .collect();
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    if points.iter().all(|p| p.1 == 0.0) {
        println!("  (Pas de données à afficher)");
        return;
    }

    let x_max = pool.size() as f32 + 1.0;
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new(120, 40, 0.0, x_max);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_gap_profile(profile: &GapProfile) {
    println!("\n📏 Écarts entre numéros consécutifs (tirages triés)\n");

    let mut table = new_table();
    table.set_header(vec!["Positions", "Moyenne", "Médiane", "Min", "Max", "Écart-type"]);
    for s in &profile.summaries {
        table.add_row(vec![
            positions_label(s),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            s.min.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string()),
            s.max.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string()),
            fmt_opt(s.std_dev),
        ]);
    }
    println!("{table}");
    println!("La médiane est moins sensible aux valeurs extrêmes que la moyenne.\n");

    println!("── Distribution (boîte à moustaches) ──");
    let mut table = new_table();
    table.set_header(vec!["Positions", "Min", "Q1", "Médiane", "Q3", "Max"]);
    for s in &profile.summaries {
        table.add_row(vec![
            positions_label(s),
            s.min.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string()),
            fmt_opt(s.q1),
            fmt_opt(s.median),
            fmt_opt(s.q3),
            s.max.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string()),
        ]);
    }
    println!("{table}");
}

fn positions_label(summary: &GapSummary) -> String {
    format!("{} → {}", summary.positions.0, summary.positions.1)
}

pub fn display_combinations(table_data: &CombinationTable, top: usize) {
    let title = match table_data.arity {
        2 => "paires".to_string(),
        3 => "triplets".to_string(),
        k => format!("combinaisons de {}", k),
    };
    println!("\n🔗 Top {} {} ({} distinctes)\n", top.min(table_data.len()), title, table_data.len());

    if table_data.is_empty() {
        println!("Aucune combinaison.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["#", "Combinaison", "Sorties"]);
    for (i, entry) in table_data.top(top).iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            entry.label(),
            entry.count.to_string(),
        ]);
    }
    println!("{table}");
}

fn gaps_label(gaps: &[i32; 4]) -> String {
    format!("{:?}", gaps)
}

pub fn display_tips(results: &[(String, TipOutcome, Option<[i32; 4]>)]) {
    println!("\n🔮 Grilles générées (démonstration, aucune valeur prédictive)\n");

    let mut table = new_table();
    table.set_header(vec!["Stratégie", "Numéros", "Euro", "Écarts générés", "Écarts médians"]);

    for (name, outcome, reference) in results {
        let reference_str = reference.as_ref().map(gaps_label).unwrap_or_else(|| "—".to_string());
        match outcome {
            TipOutcome::Generated(tip) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(join_numbers(&tip.main)).fg(Color::Green),
                    Cell::new(join_numbers(&tip.bonus)).fg(Color::Yellow),
                    Cell::new(generated_gaps(tip)),
                    Cell::new(reference_str),
                ]);
            }
            TipOutcome::Exhausted { attempts } => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(format!("échec après {} tentatives", attempts)).fg(Color::Red),
                    Cell::new("—"),
                    Cell::new("—"),
                    Cell::new(reference_str),
                ]);
            }
        }
    }
    println!("{table}");
}

fn generated_gaps(tip: &Tip) -> String {
    match tip.reference_gaps {
        Some(_) => gaps_label(&tip.gaps()),
        None => "—".to_string(),
    }
}
