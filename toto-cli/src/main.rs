use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use toto_cli::analysis::{DateRange, FrequencyAnalyzer, MAX_GROUP_SIZE};
use toto_cli::config::AppConfig;
use toto_cli::display::{display_draws, display_group_counts, display_import_summary};
use toto_cli::export::{export_csv, export_json};
use toto_cli::import::{import_csv, parse_numbers};
use toto_cli::logging;
use toto_db::config::StoreConfig;
use toto_db::db::{count_draws, fetch_latest_draws, insert_draw, migrate, open_db};
use toto_db::models::{DrawRecord, Game, GroupCount, validate_draw};
use toto_db::repository::SqliteRepository;
use toto_db::rusqlite::Connection;

#[derive(Parser)]
#[command(name = "toto", version, about = "Analyse de fréquence des tirages TOTO")]
struct Cli {
    /// Fichier de configuration TOML (défaut : ./toto.toml s'il existe)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chemin de la base SQLite (remplace la configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Journalisation détaillée sur stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer l'historique depuis un fichier CSV (Date,Winning No.,Addl No.)
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "toto_results.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    Latest {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "3")]
        num: u32,
    },

    /// Numéros les plus fréquents
    Topnum {
        /// Nombre de résultats
        #[arg(short, long, default_value = "6")]
        num: usize,

        #[command(flatten)]
        filter: RangeArg,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Groupes de numéros les plus fréquents (paires, triplets, ...)
    Groupfreq {
        /// Taille des groupes (1 à 6)
        #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=MAX_GROUP_SIZE as i64))]
        group_size: u8,

        /// Nombre de résultats
        #[arg(short, long, default_value = "10")]
        top: usize,

        #[command(flatten)]
        filter: RangeArg,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Combinaisons complètes déjà sorties plusieurs fois
    Combination {
        /// Nombre de résultats
        #[arg(short, long, default_value = "3")]
        top: usize,

        #[command(flatten)]
        filter: RangeArg,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ajouter un tirage manuellement
    Add,
}

#[derive(Args)]
struct RangeArg {
    /// Plage de dates AAAA-MM-JJ:AAAA-MM-JJ (bornes incluses, un côté peut être vide)
    #[arg(short, long, value_parser = DateRange::parse)]
    range: Option<DateRange>,
}

#[derive(Args)]
struct OutputArgs {
    /// Enregistrer le résultat en CSV
    #[arg(long)]
    csv: bool,

    /// Écrire le résultat en JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Fichier de sortie (CSV : top_<N>_<type>.csv par défaut, JSON : stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.database = db;
    }
    logging::init(cli.debug, &config.logging.level);
    tracing::debug!(db = %config.store.database.display(), "Configuration chargée");

    match cli.command {
        Command::Import { file } => cmd_import(&config.store, &file),
        Command::DbPath => {
            println!("{}", config.store.database.display());
            Ok(())
        }
        Command::Latest { num } => cmd_latest(&config.store, num),
        Command::Topnum { num, filter, output } => {
            cmd_groups(&config.store, 1, num, filter.range, &output, "numbers")
        }
        Command::Groupfreq {
            group_size,
            top,
            filter,
            output,
        } => cmd_groups(
            &config.store,
            group_size as usize,
            top,
            filter.range,
            &output,
            "groups",
        ),
        Command::Combination { top, filter, output } => {
            cmd_groups(&config.store, Game::TOTO.arity, top, filter.range, &output, "combinations")
        }
        Command::Add => cmd_add(&config.store),
    }
}

fn open_store(store: &StoreConfig) -> Result<Connection> {
    let conn = open_db(store)?;
    migrate(&conn)?;
    Ok(conn)
}

fn cmd_import(store: &StoreConfig, file: &Path) -> Result<()> {
    let conn = open_store(store)?;
    let result = import_csv(&conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_latest(store: &StoreConfig, num: u32) -> Result<()> {
    let conn = open_store(store)?;
    if count_draws(&conn)? == 0 {
        println!("Base vide. Lancez d'abord : toto import");
        return Ok(());
    }
    let draws = fetch_latest_draws(&conn, num)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_groups(
    store: &StoreConfig,
    group_size: usize,
    top: usize,
    range: Option<DateRange>,
    output: &OutputArgs,
    kind: &str,
) -> Result<()> {
    let repository = SqliteRepository::open(store)
        .context("Base inaccessible. Lancez d'abord : toto import")?;
    let analyzer = FrequencyAnalyzer::new(repository);

    let results = match (range.as_ref(), group_size) {
        (Some(r), _) => analyzer.analyze(Some(r), group_size, top)?,
        (None, 1) => analyzer.analyze_top_numbers(None, top)?,
        (None, g) if g == analyzer.game().arity => analyzer.analyze_exact_combinations(top)?,
        (None, g) => analyzer.analyze_group_frequency(g, top)?,
    };

    if results.is_empty() && !output.json {
        match range {
            Some(_) => println!("Aucun tirage ne correspond à cette plage."),
            None => println!("Aucun tirage en base. Lancez d'abord : toto import"),
        }
        return Ok(());
    }

    if output.csv {
        let path = output
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("top_{}_{}.csv", top, kind)));
        let file = File::create(&path)
            .with_context(|| format!("Impossible de créer {:?}", path))?;
        let rows = export_csv(&results, BufWriter::new(file))?;
        println!("✅ {} lignes enregistrées dans {}", rows, path.display());
    } else if output.json {
        write_json(&results, output.output.as_deref())?;
    } else {
        display_group_counts(&results, group_size, top, range.as_ref());
    }
    Ok(())
}

fn write_json(results: &[GroupCount], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Impossible de créer {:?}", path))?;
            export_json(results, BufWriter::new(file))?;
        }
        None => {
            export_json(results, io::stdout().lock())?;
        }
    }
    Ok(())
}

fn cmd_add(store: &StoreConfig) -> Result<()> {
    let conn = open_store(store)?;
    println!("Ajout d'un tirage manuellement\n");

    let raw_date = prompt("Date (AAAA-MM-JJ) : ")?;
    let draw_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .with_context(|| format!("Format de date invalide: '{}'", raw_date))?;

    let raw_no = prompt("Numéro du tirage (vide si inconnu) : ")?;
    let draw_no = if raw_no.is_empty() {
        None
    } else {
        Some(raw_no.parse::<u32>().context("Numéro de tirage invalide")?)
    };

    let winning_numbers = prompt_numbers()?;
    let additional_number = prompt_additional()?;

    let draw = DrawRecord {
        draw_date,
        draw_no,
        winning_numbers,
        additional_number,
    };
    validate_draw(&Game::TOTO, &draw.winning_numbers, draw.additional_number)?;

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        if insert_draw(&conn, &draw)? {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Un tirage existe déjà à cette date (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        bail!("Entrée standard fermée");
    }
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<Vec<u8>> {
    let game = Game::TOTO;
    loop {
        let input = prompt("6 numéros gagnants (séparés par des virgules, 1-49) : ")?;
        match parse_numbers(&input) {
            Ok(v) if v.len() == game.arity => {
                if validate_draw(&game, &v, None).is_ok() {
                    return Ok(v);
                }
                println!("Numéros invalides (1-49, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 6 numéros. Réessayez."),
        }
    }
}

fn prompt_additional() -> Result<Option<u8>> {
    loop {
        let input = prompt("Numéro complémentaire (vide si aucun) : ")?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<u8>() {
            Ok(n) if Game::TOTO.contains(n) => return Ok(Some(n)),
            _ => println!("Numéro invalide (1-49). Réessayez."),
        }
    }
}
