use std::io::Write;

use thiserror::Error;

use toto_db::models::GroupCount;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Échec de l'écriture CSV")]
    Csv(#[from] csv::Error),

    #[error("Échec de l'écriture JSON")]
    Json(#[from] serde_json::Error),

    #[error("Erreur d'écriture")]
    Io(#[from] std::io::Error),
}

/// Colonnes `Numbers` (numéros croissants séparés par des virgules) et `Occurrences`.
pub fn export_csv<W: Write>(results: &[GroupCount], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Numbers", "Occurrences"])?;
    for gc in results {
        csv_writer.write_record([gc.numbers_label(), gc.occurrences.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(results.len())
}

pub fn export_json<W: Write>(results: &[GroupCount], mut writer: W) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    Ok(results.len())
}
