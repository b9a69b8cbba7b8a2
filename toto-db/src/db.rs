use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Params, Row};

use crate::config::StoreConfig;
use crate::error::RepositoryError;
use crate::models::{DrawRecord, Game, validate_draw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_date          TEXT PRIMARY KEY,
    draw_no            INTEGER,
    n1                 INTEGER NOT NULL,
    n2                 INTEGER NOT NULL,
    n3                 INTEGER NOT NULL,
    n4                 INTEGER NOT NULL,
    n5                 INTEGER NOT NULL,
    n6                 INTEGER NOT NULL,
    additional_number  INTEGER
);
";

pub(crate) const SELECT_ALL: &str =
    "SELECT draw_date, draw_no, n1, n2, n3, n4, n5, n6, additional_number FROM draws";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn open_db(config: &StoreConfig) -> Result<Connection> {
    let path = &config.database;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    conn.busy_timeout(config.busy_timeout())
        .context("Impossible de régler le délai d'attente")?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Insère un tirage sauf s'il en existe déjà un à la même date.
///
/// Renvoie `true` si une ligne a été écrite.
pub fn insert_draw(conn: &Connection, draw: &DrawRecord) -> Result<bool> {
    validate_draw(&Game::TOTO, &draw.winning_numbers, draw.additional_number)
        .with_context(|| format!("Tirage du {} refusé", draw.draw_date))?;
    let n = &draw.winning_numbers;
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_date, draw_no, n1, n2, n3, n4, n5, n6, additional_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.draw_date.format(DATE_FORMAT).to_string(),
            draw.draw_no,
            n[0],
            n[1],
            n[2],
            n[3],
            n[4],
            n[5],
            draw.additional_number,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

pub fn fetch_latest_draws(conn: &Connection, limit: u32) -> Result<Vec<DrawRecord>> {
    let sql = format!("{SELECT_ALL} ORDER BY draw_date DESC LIMIT ?1");
    let rows = query_raw_draws(conn, &sql, [limit])?;
    let draws = rows
        .into_iter()
        .map(|raw| raw.into_record(&Game::TOTO))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

/// Ligne brute, avant conversion et validation.
#[derive(Debug)]
pub(crate) struct RawDraw {
    date: String,
    draw_no: Option<i64>,
    numbers: [i64; 6],
    additional: Option<i64>,
}

impl RawDraw {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawDraw {
            date: row.get(0)?,
            draw_no: row.get(1)?,
            numbers: [
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ],
            additional: row.get(8)?,
        })
    }

    pub(crate) fn into_record(self, game: &Game) -> Result<DrawRecord, RepositoryError> {
        let invalid = |reason: String| RepositoryError::InvalidRecord {
            date: self.date.clone(),
            reason,
        };

        let draw_date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| invalid(format!("date illisible : {e}")))?;
        let draw_no = self
            .draw_no
            .map(u32::try_from)
            .transpose()
            .map_err(|_| invalid(format!("numéro de tirage invalide : {:?}", self.draw_no)))?;
        let winning_numbers = self
            .numbers
            .iter()
            .map(|&n| u8::try_from(n).map_err(|_| invalid(format!("numéro invalide : {n}"))))
            .collect::<Result<Vec<u8>, _>>()?;
        let additional_number = self
            .additional
            .map(u8::try_from)
            .transpose()
            .map_err(|_| invalid(format!("complémentaire invalide : {:?}", self.additional)))?;

        validate_draw(game, &winning_numbers, additional_number)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(DrawRecord {
            draw_date,
            draw_no,
            winning_numbers,
            additional_number,
        })
    }
}

pub(crate) fn query_raw_draws<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<RawDraw>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, RawDraw::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
