use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use toto_db::rusqlite::Connection;

use toto_db::db::insert_draw;
use toto_db::models::{DrawRecord, Game, validate_draw};

/// "4,19,40,41,46,47" -> [4, 19, 40, 41, 46, 47]
pub fn parse_numbers(s: &str) -> Result<Vec<u8>> {
    s.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| {
            n.parse::<u8>()
                .with_context(|| format!("Impossible de parser le numéro '{}'", n))
        })
        .collect()
}

/// Accepte AAAA-MM-JJ ou JJ/MM/AAAA.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let parsed = if raw.contains('/') {
        NaiveDate::parse_from_str(raw, "%d/%m/%Y")
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    };
    parsed.with_context(|| format!("Format de date invalide: '{}'", raw))
}

/// Position des colonnes, retrouvée par nom dans l'en-tête.
struct Columns {
    date: usize,
    winning: usize,
    additional: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let Some(date) = find("Date") else {
            bail!("Colonne 'Date' absente de l'en-tête : {:?}", headers);
        };
        let Some(winning) = find("Winning No.") else {
            bail!("Colonne 'Winning No.' absente de l'en-tête : {:?}", headers);
        };
        Ok(Self {
            date,
            winning,
            additional: find("Addl No."),
        })
    }
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Result<DrawRecord> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .map(str::trim)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let draw_date = parse_date(get(columns.date)?)?;
    let winning_numbers = parse_numbers(get(columns.winning)?)?;

    let additional_raw = columns
        .additional
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .unwrap_or_default();
    let additional_number = if additional_raw.is_empty() {
        None
    } else {
        Some(
            additional_raw
                .parse::<u8>()
                .with_context(|| format!("Numéro complémentaire illisible : '{}'", additional_raw))?,
        )
    };

    validate_draw(&Game::TOTO, &winning_numbers, additional_number)?;

    Ok(DrawRecord::new(draw_date, winning_numbers, additional_number))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_reader(conn, file)
}

/// Format de l'archive : colonnes `Date`, `Winning No.` et `Addl No.` (facultative),
/// repérées par leur nom dans la ligne d'en-tête.
pub fn import_reader<R: Read>(conn: &Connection, source: R) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().context("En-tête CSV illisible")?;
    let columns = Columns::from_headers(headers)?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        let line = result.total_records;
        match record_result {
            Ok(record) => match parse_record(&record, &columns) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        tracing::warn!(line, error = %e, "Erreur insertion tirage");
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    tracing::warn!(line, error = %e, "Erreur parsing ligne");
                    result.errors += 1;
                }
            },
            Err(e) => {
                tracing::warn!(line, error = %e, "Erreur lecture ligne");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    tracing::info!(
        total = result.total_records,
        inserted = result.inserted,
        skipped = result.skipped,
        errors = result.errors,
        "Import terminé"
    );
    Ok(result)
}
