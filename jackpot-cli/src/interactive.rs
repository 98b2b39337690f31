use anyhow::{Context, Result};

use jackpot_db::models::Pool;
use jackpot_db::rusqlite::Connection;
use jackpot_stats::cache::StatsCache;
use jackpot_stats::config::GeneratorConfig;
use jackpot_stats::history::DrawHistory;

use crate::display::{
    display_combinations, display_frequencies, display_frequency_chart, display_gap_profile,
    display_tips,
};
use crate::{StrategyKind, generate_tips, load_history, prompt};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Frequencies,
    Gaps,
    Pairs,
    Triplets,
    Generate,
    Reload,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "frequences" | "fréquences" | "freq" | "stats" => Some(InteractiveCommand::Frequencies),
        "2" | "ecarts" | "écarts" | "gaps" => Some(InteractiveCommand::Gaps),
        "3" | "paires" | "pairs" => Some(InteractiveCommand::Pairs),
        "4" | "triplets" | "tri" => Some(InteractiveCommand::Triplets),
        "5" | "generer" | "générer" | "generate" | "gen" => Some(InteractiveCommand::Generate),
        "6" | "recharger" | "reload" => Some(InteractiveCommand::Reload),
        "7" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn parse_strategy(input: &str) -> Option<StrategyKind> {
    match input.trim().to_lowercase().as_str() {
        "" | "all" | "tout" | "toutes" => Some(StrategyKind::All),
        "frequency" | "frequences" | "fréquences" | "f" => Some(StrategyKind::Frequency),
        "uniform" | "aleatoire" | "aléatoire" | "u" => Some(StrategyKind::Uniform),
        "median-gap" | "median" | "médian" | "m" => Some(StrategyKind::MedianGap),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif ──");
    println!("  1. frequences Fréquences des numéros");
    println!("  2. ecarts     Écarts entre numéros");
    println!("  3. paires     Paires fréquentes");
    println!("  4. triplets   Triplets fréquents");
    println!("  5. generer    Générer des grilles");
    println!("  6. recharger  Recharger la base");
    println!("  7. quitter    Quitter");
    println!();
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Historique chargé une fois, tables dérivées mises en cache pour la session.
struct Session<'a> {
    conn: &'a Connection,
    history: DrawHistory,
    cache: StatsCache,
    config: GeneratorConfig,
}

impl<'a> Session<'a> {
    fn open(conn: &'a Connection) -> Result<Self> {
        Ok(Self {
            conn,
            history: load_history(conn)?,
            cache: StatsCache::new(),
            config: GeneratorConfig::default(),
        })
    }

    fn reload(&mut self) -> Result<()> {
        self.history = load_history(self.conn)?;
        self.cache.invalidate();
        println!("{} tirages rechargés.", self.history.len());
        Ok(())
    }

    fn frequencies(&mut self) -> Result<()> {
        let main = self.cache.frequencies(&self.history, Pool::Main).to_vec();
        let bonus = self.cache.frequencies(&self.history, Pool::Bonus).to_vec();
        display_frequencies(&main, &bonus, self.history.len());

        let chart = prompt_with_default("Afficher les histogrammes ? (o/n)", "n")?;
        if chart.to_lowercase() == "o" {
            display_frequency_chart(&main, Pool::Main);
            display_frequency_chart(&bonus, Pool::Bonus);
        }
        Ok(())
    }

    fn combinations(&mut self, k: usize, default_top: &str) -> Result<()> {
        let top: usize = prompt_with_default("Nombre de lignes", default_top)?
            .parse()
            .context("Nombre invalide")?;
        display_combinations(self.cache.combinations(&self.history, k)?, top);
        Ok(())
    }

    fn generate(&mut self) -> Result<()> {
        let strategy_str = prompt_with_default("Stratégie (all/frequency/uniform/median-gap)", "all")?;
        let Some(kind) = parse_strategy(&strategy_str) else {
            println!("Stratégie inconnue : '{}'", strategy_str);
            return Ok(());
        };

        let seed_str = prompt_with_default("Seed (vide = aléatoire)", "")?;
        let seed: Option<u64> = if seed_str.is_empty() {
            None
        } else {
            Some(seed_str.parse().context("Seed invalide")?)
        };

        let results = generate_tips(&self.history, &mut self.cache, kind, 1, seed, &self.config)?;
        display_tips(&results);
        Ok(())
    }
}

pub fn run_interactive(conn: &Connection) -> Result<()> {
    let mut session = Session::open(conn)?;
    println!("Bienvenue dans le mode interactif : {} tirages chargés.", session.history.len());

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(e) => {
                log::debug!("Sortie du mode interactif : {e:#}");
                break;
            }
        };

        if input.is_empty() {
            continue;
        }

        let result = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Frequencies) => session.frequencies(),
            Some(InteractiveCommand::Gaps) => {
                display_gap_profile(session.cache.gap_profile(&session.history));
                Ok(())
            }
            Some(InteractiveCommand::Pairs) => session.combinations(2, "20"),
            Some(InteractiveCommand::Triplets) => session.combinations(3, "15"),
            Some(InteractiveCommand::Generate) => session.generate(),
            Some(InteractiveCommand::Reload) => session.reload(),
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-7) ou un nom de commande.", input);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Erreur: {e:#}");
        }
    }

    let (hits, misses) = session.cache.counters();
    log::debug!("Cache : {} hits, {} misses", hits, misses);
    Ok(())
}
