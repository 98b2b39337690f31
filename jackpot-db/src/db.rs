use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    date    TEXT NOT NULL DEFAULT '',
    main_1  INTEGER NOT NULL,
    main_2  INTEGER NOT NULL,
    main_3  INTEGER NOT NULL,
    main_4  INTEGER NOT NULL,
    main_5  INTEGER NOT NULL,
    euro_1  INTEGER NOT NULL,
    euro_2  INTEGER NOT NULL,
    UNIQUE (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
);
";

const SELECT_COLUMNS: &str = "date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2";

type RawRow = (String, [u8; 5], [u8; 2]);

pub fn db_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("eurojackpot.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Insère un tirage ; renvoie `false` si un tirage identique existe déjà.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let main = draw.main();
    let bonus = draw.bonus();
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.date().unwrap_or_default(),
            main[0],
            main[1],
            main[2],
            main[3],
            main[4],
            bonus[0],
            bonus[1],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

/// Tous les tirages, du plus ancien au plus récent (ordre d'insertion).
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM draws ORDER BY id ASC");
    let rows = query_rows(conn, &sql, rusqlite::params![])?;
    rows_to_draws(rows)
}

/// Les `limit` derniers tirages, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM draws ORDER BY id DESC LIMIT ?1");
    let rows = query_rows(conn, &sql, [limit])?;
    rows_to_draws(rows)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

fn query_rows<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<RawRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok((
            row.get::<_, String>(0)?,
            [
                row.get::<_, u8>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, u8>(5)?,
            ],
            [
                row.get::<_, u8>(6)?,
                row.get::<_, u8>(7)?,
            ],
        ))
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// La base peut avoir été modifiée à la main : chaque ligne repasse par la validation.
fn rows_to_draws(rows: Vec<RawRow>) -> Result<Vec<Draw>> {
    rows.into_iter()
        .map(|(date, main, bonus)| {
            Draw::new(main, bonus)
                .map(|d| d.with_date(date))
                .with_context(|| format!("Tirage invalide en base : {:?} + {:?}", main, bonus))
        })
        .collect()
}
