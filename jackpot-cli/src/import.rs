use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use jackpot_db::rusqlite::Connection;
use std::path::Path;

use jackpot_db::db::insert_draw;
use jackpot_db::models::Draw;

const NUMBER_COLUMNS: usize = 7;
const DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Accepte `7` comme `7.0` (exports de tableur).
fn parse_number(s: &str) -> Result<u8> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return Ok(n);
    }
    let f = s
        .replace(',', ".")
        .parse::<f64>()
        .with_context(|| format!("Impossible de parser le nombre: '{}'", s))?;
    if f.fract() != 0.0 || !(0.0..=255.0).contains(&f) {
        bail!("Nombre non entier : '{}'", s);
    }
    Ok(f as u8)
}

pub(crate) fn parse_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    bail!("Format de date invalide: '{}'", raw)
}

/// Ligne de 7 nombres (5 + 2), éventuellement précédée d'une date.
fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let offset = record.len() - NUMBER_COLUMNS;
    let get_u8 = |idx: usize| -> Result<u8> {
        let s = record
            .get(offset + idx)
            .with_context(|| format!("Champ manquant à l'index {}", offset + idx))?;
        parse_number(s).with_context(|| format!("Colonne {}", offset + idx + 1))
    };

    let main = [get_u8(0)?, get_u8(1)?, get_u8(2)?, get_u8(3)?, get_u8(4)?];
    let bonus = [get_u8(5)?, get_u8(6)?];
    let draw = Draw::new(main, bonus)?;

    if offset == 1 {
        let date = parse_date(record.get(0).unwrap_or_default())?;
        Ok(draw.with_date(date))
    } else {
        Ok(draw)
    }
}

fn has_expected_arity(record: &csv::StringRecord) -> bool {
    record.len() == NUMBER_COLUMNS || record.len() == NUMBER_COLUMNS + 1
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub duplicates: u32,
    pub malformed: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        let line = result.total_records + 1;
        let record = match record_result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Erreur lecture ligne {}: {}", line, e);
                result.errors += 1;
                continue;
            }
        };

        if !has_expected_arity(&record) {
            log::warn!(
                "Ligne {} ignorée : {} colonnes (attendu {} ou {})",
                line,
                record.len(),
                NUMBER_COLUMNS,
                NUMBER_COLUMNS + 1
            );
            result.malformed += 1;
            continue;
        }

        match parse_record(&record) {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.duplicates += 1,
                Err(e) => {
                    log::warn!("Erreur insertion ligne {}: {}", line, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Erreur parsing ligne {}: {:#}", line, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    log::info!("Import de {:?} : {} tirages insérés", path, result.inserted);
    Ok(result)
}
