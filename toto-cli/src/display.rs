use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::analysis::DateRange;
use crate::import::ImportResult;
use toto_db::models::{DrawRecord, GroupCount, join_numbers};

pub fn group_title(group_size: usize) -> String {
    match group_size {
        1 => "numéros".to_string(),
        2 => "paires".to_string(),
        3 => "triplets".to_string(),
        4 => "quadruplets".to_string(),
        5 => "quintuplets".to_string(),
        6 => "combinaisons de 6 numéros".to_string(),
        n => format!("groupes de {} numéros", n),
    }
}

pub fn range_label(range: Option<&DateRange>) -> String {
    let fmt = |d: Option<chrono::NaiveDateTime>| {
        d.map(|dt| dt.date().to_string())
            .unwrap_or_else(|| "…".to_string())
    };
    match range {
        Some(r) if !r.is_unbounded() => format!("du {} au {}", fmt(r.start()), fmt(r.end())),
        _ => "tout l'historique".to_string(),
    }
}

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "N° tirage", "Numéros gagnants", "Complémentaire"]);

    for draw in draws {
        table.add_row(draw_row(draw));
    }

    println!("{table}");
}

/// Numéros dans l'ordre de publication.
fn draw_row(draw: &DrawRecord) -> Vec<String> {
    let draw_no = draw
        .draw_no
        .map(|n| n.to_string())
        .unwrap_or_else(|| "—".to_string());
    let additional = draw
        .additional_number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "—".to_string());

    vec![
        draw.draw_date.to_string(),
        draw_no,
        join_numbers(&draw.winning_numbers),
        additional,
    ]
}

pub fn display_group_counts(results: &[GroupCount], group_size: usize, top_n: usize, range: Option<&DateRange>) {
    println!(
        "\n🎲 Top {} des {} les plus fréquents ({})\n",
        top_n,
        group_title(group_size),
        range_label(range)
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros", "Occurrences"]);

    let best = results.first().map(|gc| gc.occurrences).unwrap_or(0);
    for (i, gc) in results.iter().enumerate() {
        let color = if gc.occurrences == best {
            Color::Green
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(gc.numbers_label()),
            Cell::new(gc.occurrences).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}
