mod display;
mod import;
mod interactive;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use jackpot_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, insert_draw, migrate, open_db};
use jackpot_db::models::{Draw, Pool, validate_draw};
use jackpot_db::rusqlite::Connection;
use jackpot_stats::cache::StatsCache;
use jackpot_stats::config::GeneratorConfig;
use jackpot_stats::generators::frequency::FrequencyStrategy;
use jackpot_stats::generators::median_gap::MedianGapStrategy;
use jackpot_stats::generators::uniform::UniformStrategy;
use jackpot_stats::generators::{TipOutcome, TipStrategy, all_strategies, make_rng};
use jackpot_stats::history::DrawHistory;
use jackpot_stats::report::StatsReport;
use crate::display::{
    display_combinations, display_draws, display_frequencies, display_frequency_chart,
    display_gap_profile, display_import_summary, display_tips,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq)]
pub enum StrategyKind {
    Frequency,
    Uniform,
    MedianGap,
    #[default]
    All,
}

#[derive(Parser)]
#[command(name = "jackpot", about = "Statistiques des tirages Eurojackpot (5 sur 50 + 2 sur 12)")]
struct Cli {
    /// Chemin de la base SQLite (défaut : data/eurojackpot.db)
    #[arg(long, global = true, env = "JACKPOT_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV (séparateur ';')
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "data/eurojackpot.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Fréquences des numéros et numéros euro
    Stats {
        /// Afficher aussi les histogrammes
        #[arg(long)]
        chart: bool,
    },

    /// Statistiques des écarts entre numéros consécutifs
    Gaps,

    /// Paires de numéros les plus fréquentes
    Pairs {
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Triplets de numéros les plus fréquents
    Triplets {
        #[arg(short, long, default_value = "15")]
        top: usize,
    },

    /// Générer des grilles de démonstration
    Generate {
        /// Stratégie de génération
        #[arg(short, long, default_value = "all")]
        strategy: StrategyKind,

        /// Nombre de grilles par stratégie
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier JSON de configuration du générateur
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Écrire la configuration par défaut du générateur
    Config {
        #[arg(short, long, default_value = "generator.json")]
        output: PathBuf,
    },

    /// Exporter toutes les statistiques en JSON
    Export {
        #[arg(short, long, default_value = "stats.json")]
        output: PathBuf,

        /// Limiter les tables de paires et de triplets
        #[arg(long)]
        top: Option<usize>,
    },

    /// Ajouter un tirage manuellement
    Add,

    /// Mode interactif (REPL)
    Interactive,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = cli.db.unwrap_or_else(db_path);

    if let Command::DbPath = cli.command {
        println!("{}", path.display());
        return Ok(());
    }
    if let Command::Config { output } = &cli.command {
        return cmd_config(output);
    }

    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { chart } => cmd_stats(&conn, chart),
        Command::Gaps => cmd_gaps(&conn),
        Command::Pairs { top } => cmd_combinations(&conn, 2, top),
        Command::Triplets { top } => cmd_combinations(&conn, 3, top),
        Command::Generate { strategy, count, seed, config } => {
            cmd_generate(&conn, strategy, count, seed, config.as_deref())
        }
        Command::Export { output, top } => cmd_export(&conn, &output, top),
        Command::Add => cmd_add(&conn),
        Command::Interactive => interactive::run_interactive(&conn),
        Command::DbPath | Command::Config { .. } => Ok(()),
    }
}

/// Charge l'historique complet ; une base vide arrête le traitement.
pub(crate) fn load_history(conn: &Connection) -> Result<DrawHistory> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : jackpot import");
    }
    let draws = fetch_all_draws(conn).context("Impossible de charger l'historique")?;
    let history = DrawHistory::new(draws);
    log::info!("{} tirages chargés (empreinte {:016x})", history.len(), history.fingerprint());
    Ok(history)
}

pub(crate) fn load_generator_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(p) => GeneratorConfig::load(p),
        None => Ok(GeneratorConfig::default()),
    }
}

pub(crate) fn generate_tips(
    history: &DrawHistory,
    cache: &mut StatsCache,
    kind: StrategyKind,
    count: usize,
    seed: Option<u64>,
    config: &GeneratorConfig,
) -> Result<Vec<(String, TipOutcome, Option<[i32; 4]>)>> {
    let profile = cache.gap_profile(history);
    let strategies: Vec<Box<dyn TipStrategy>> = match kind {
        StrategyKind::All => all_strategies(history, profile, config)?,
        StrategyKind::Frequency => vec![Box::new(FrequencyStrategy::from_history(history))],
        StrategyKind::Uniform => vec![Box::new(UniformStrategy)],
        StrategyKind::MedianGap => vec![Box::new(MedianGapStrategy::from_profile(profile, config.clone())?)],
    };

    let mut rng = make_rng(seed);
    let mut results = Vec::with_capacity(strategies.len() * count);
    for strategy in &strategies {
        log::debug!("{} : {}", strategy.name(), strategy.description());
        for _ in 0..count {
            let outcome = strategy.generate(&mut rng);
            results.push((strategy.name().to_string(), outcome, strategy.reference_gaps()));
        }
    }
    Ok(results)
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : jackpot import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, chart: bool) -> Result<()> {
    let history = load_history(conn)?;
    let mut cache = StatsCache::new();

    let main = cache.frequencies(&history, Pool::Main).to_vec();
    let bonus = cache.frequencies(&history, Pool::Bonus).to_vec();
    display_frequencies(&main, &bonus, history.len());

    if chart {
        display_frequency_chart(&main, Pool::Main);
        display_frequency_chart(&bonus, Pool::Bonus);
    }
    Ok(())
}

fn cmd_gaps(conn: &Connection) -> Result<()> {
    let history = load_history(conn)?;
    let mut cache = StatsCache::new();
    display_gap_profile(cache.gap_profile(&history));
    Ok(())
}

fn cmd_combinations(conn: &Connection, k: usize, top: usize) -> Result<()> {
    let history = load_history(conn)?;
    let mut cache = StatsCache::new();
    display_combinations(cache.combinations(&history, k)?, top);
    Ok(())
}

fn cmd_generate(
    conn: &Connection,
    kind: StrategyKind,
    count: usize,
    seed: Option<u64>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_generator_config(config_path)?;
    let history = load_history(conn)?;
    let mut cache = StatsCache::new();
    let results = generate_tips(&history, &mut cache, kind, count, seed, &config)?;
    display_tips(&results);
    Ok(())
}

fn cmd_config(output: &Path) -> Result<()> {
    GeneratorConfig::default().save(output)?;
    println!("Configuration par défaut écrite dans {}", output.display());
    Ok(())
}

fn cmd_export(conn: &Connection, output: &Path, top: Option<usize>) -> Result<()> {
    let history = load_history(conn)?;
    let mut cache = StatsCache::new();
    let report = StatsReport::build(&history, &mut cache, top)?;
    report.save(output)?;
    println!("Statistiques de {} tirages exportées dans {}", report.draw_count, output.display());
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let mut stdin = io::stdin().lock();
    let raw_date = prompt_from(&mut stdin, "Date (JJ.MM.AAAA, vide si inconnue) : ")?;
    let main = prompt_main(&mut stdin)?;
    let bonus = prompt_bonus(&mut stdin)?;
    let draw = manual_draw(&raw_date, main, bonus)?;

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt_from(&mut stdin, "\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

/// Date normalisée comme à l'import, pour que les doublons restent détectés.
fn manual_draw(raw_date: &str, main: [u8; 5], bonus: [u8; 2]) -> Result<Draw> {
    let draw = Draw::new(main, bonus)?;
    if raw_date.trim().is_empty() {
        return Ok(draw);
    }
    Ok(draw.with_date(import::parse_date(raw_date)?))
}

pub(crate) fn prompt(msg: &str) -> Result<String> {
    prompt_from(&mut io::stdin().lock(), msg)
}

/// Erreur en fin d'entrée : `read_line` renvoie alors 0 octet.
pub(crate) fn prompt_from(input: &mut impl BufRead, msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Erreur de lecture")?;
    if read == 0 {
        bail!("Fin de l'entrée");
    }
    Ok(line.trim().to_string())
}

fn prompt_main(input: &mut impl BufRead) -> Result<[u8; 5]> {
    loop {
        let line = prompt_from(input, "5 numéros (séparés par des espaces, 1-50) : ")?;
        let nums: Result<Vec<u8>, _> = line.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 5 => {
                let arr = [v[0], v[1], v[2], v[3], v[4]];
                if validate_draw(&arr, &[1, 2]).is_ok() {
                    return Ok(arr);
                }
                println!("Numéros invalides (1-50, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 5 numéros. Réessayez."),
        }
    }
}

fn prompt_bonus(input: &mut impl BufRead) -> Result<[u8; 2]> {
    loop {
        let line = prompt_from(input, "2 numéros euro (séparés par un espace, 1-12) : ")?;
        let nums: Result<Vec<u8>, _> = line.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 2 => {
                let arr = [v[0], v[1]];
                if validate_draw(&[1, 2, 3, 4, 5], &arr).is_ok() {
                    return Ok(arr);
                }
                println!("Numéros euro invalides (1-12, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 2 numéros. Réessayez."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackpot_stats::history::make_test_history;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_load_history_empty_is_fatal() {
        let conn = memory_db();
        assert!(load_history(&conn).is_err());
    }

    #[test]
    fn test_load_history_chronological() {
        let conn = memory_db();
        let history = make_test_history(5);
        for draw in &history {
            insert_draw(&conn, draw).unwrap();
        }
        let loaded = load_history(&conn).unwrap();
        assert_eq!(loaded.draws(), history.draws());
        assert_eq!(loaded.fingerprint(), history.fingerprint());
    }

    #[test]
    fn test_generate_tips_counts() {
        let history = make_test_history(40);
        let mut cache = StatsCache::new();
        let config = GeneratorConfig::default();

        let all = generate_tips(&history, &mut cache, StrategyKind::All, 2, Some(1), &config).unwrap();
        assert_eq!(all.len(), 6);

        let median = generate_tips(&history, &mut cache, StrategyKind::MedianGap, 3, Some(1), &config).unwrap();
        assert_eq!(median.len(), 3);
        assert!(median.iter().all(|(_, _, gaps)| *gaps == Some([2, 3, 2, 2])));
        assert_eq!(cache.counters().0, 1);
    }

    #[test]
    fn test_generate_tips_seeded() {
        let history = make_test_history(40);
        let config = GeneratorConfig::default();
        let a = generate_tips(&history, &mut StatsCache::new(), StrategyKind::Uniform, 4, Some(9), &config).unwrap();
        let b = generate_tips(&history, &mut StatsCache::new(), StrategyKind::Uniform, 4, Some(9), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_stops_at_end_of_input() {
        let mut empty: &[u8] = b"";
        assert!(prompt_from(&mut empty, "> ").is_err());

        let mut blank: &[u8] = b"\n";
        assert_eq!(prompt_from(&mut blank, "> ").unwrap(), "");
        assert!(prompt_from(&mut blank, "> ").is_err());
    }

    #[test]
    fn test_number_prompts_stop_at_end_of_input() {
        let mut empty: &[u8] = b"";
        assert!(prompt_main(&mut empty).is_err());
        assert!(prompt_bonus(&mut empty).is_err());

        // Saisies invalides puis fin d'entrée : plus de relance.
        let mut invalid: &[u8] = b"1 2 3\n1 1 2 3 4\n";
        assert!(prompt_main(&mut invalid).is_err());
    }

    #[test]
    fn test_number_prompts_retry_until_valid() {
        let mut input: &[u8] = b"1 2\n9 7 51 3 1\n9 7 50 3 1\n";
        assert_eq!(prompt_main(&mut input).unwrap(), [9, 7, 50, 3, 1]);

        let mut input: &[u8] = b"4 4\n12 4\n";
        assert_eq!(prompt_bonus(&mut input).unwrap(), [12, 4]);
    }

    #[test]
    fn test_manual_draw_date_normalized() {
        let draw = manual_draw("1.2.2024", [5, 12, 19, 33, 47], [3, 8]).unwrap();
        assert_eq!(draw.date(), Some("2024-02-01"));
        assert_eq!(draw.main(), &[5, 12, 19, 33, 47]);

        let draw = manual_draw("", [5, 12, 19, 33, 47], [3, 8]).unwrap();
        assert_eq!(draw.date(), None);

        assert!(manual_draw("foo.bar.baz", [5, 12, 19, 33, 47], [3, 8]).is_err());
        assert!(manual_draw("31.02.2024", [5, 12, 19, 33, 47], [3, 8]).is_err());
    }

    #[test]
    fn test_manual_draw_duplicate_of_imported() {
        let conn = memory_db();
        let imported = Draw::new([5, 12, 19, 33, 47], [3, 8]).unwrap().with_date("2024-02-01");
        assert!(insert_draw(&conn, &imported).unwrap());

        let manual = manual_draw("1.2.2024", [47, 33, 19, 12, 5], [8, 3]).unwrap();
        assert!(!insert_draw(&conn, &manual).unwrap());
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_default_generator_config() {
        assert_eq!(load_generator_config(None).unwrap(), GeneratorConfig::default());
    }
}
