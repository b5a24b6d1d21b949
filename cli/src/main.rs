mod output;

use std::path::PathBuf;
use std::process::exit;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use gita_backend::{AppData, get_create_gita_dir};
use gita_backend::types::VerseKey;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bhagavad Gita verse index CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional path to the data directory with settings, content and videos.
    /// If not provided, the GITA_DIR environment variable will be used.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "GITA_DIR")]
    gita_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all chapters
    Chapters,

    /// Show one chapter with its key verses
    #[command(arg_required_else_help = true)]
    Chapter {
        /// Chapter number, 1-18
        number: u32,
    },

    /// List every verse key in reading order
    Keys {
        /// Only print the number of keys
        #[arg(long, default_value_t = false)]
        count: bool,
    },

    /// Show a verse with its videos, neighbours and related verses
    #[command(arg_required_else_help = true)]
    Verse {
        /// Verse reference, e.g. 2.47 or "BG 18:66"
        #[arg(value_name = "REFERENCE")]
        reference: VerseKey,
    },

    /// Related verses for a verse
    #[command(arg_required_else_help = true)]
    Related {
        #[arg(value_name = "REFERENCE")]
        reference: VerseKey,
    },

    /// Key verses in the chapter of a verse, excluding the verse itself
    #[command(arg_required_else_help = true)]
    Popular {
        #[arg(value_name = "REFERENCE")]
        reference: VerseKey,
    },

    /// Video sources of a verse and the default language
    #[command(arg_required_else_help = true)]
    Videos {
        #[arg(value_name = "REFERENCE")]
        reference: VerseKey,
    },

    /// Report verses without content and curated table entries pointing nowhere
    Check,
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require_verse(app_data: &AppData, key: VerseKey) -> Result<()> {
    if app_data.verse_exists(key.chapter, key.verse) {
        Ok(())
    } else {
        Err(anyhow!("Verse not found: {}", key))
    }
}

fn run(command: Commands, app_data: &AppData, json: bool) -> Result<()> {
    match command {
        Commands::Chapters => {
            let chapters = app_data.get_all_chapters();
            if json {
                return print_json(&chapters);
            }
            for ch in chapters {
                println!("{}", output::chapter_line(ch));
            }
        }

        Commands::Chapter { number } => {
            let ch = app_data
                .get_chapter_info(number)
                .ok_or_else(|| anyhow!("Chapter not found: {}", number))?;
            // No verse is current on a chapter page.
            let popular = app_data.get_popular_verses_in_chapter(number, 0);
            if json {
                return print_json(&serde_json::json!({ "chapter": ch, "key_verses": popular }));
            }
            let link_text = app_data.chapters().get_chapter_link_text(number);
            print!("{}", output::chapter_details(ch, &link_text, &popular));
        }

        Commands::Keys { count } => {
            let keys = app_data.get_all_verse_keys();
            if count {
                println!("{}", keys.len());
            } else if json {
                print_json(&keys)?;
            } else {
                for k in keys {
                    println!("{}", k);
                }
            }
        }

        Commands::Verse { reference } => {
            require_verse(app_data, reference)?;
            let page = app_data
                .verse_page(reference.chapter, reference.verse)
                .ok_or_else(|| anyhow!("No content available for verse {}", reference))?;
            if json {
                return print_json(&page);
            }
            print!("{}", output::verse_page(&page));
        }

        Commands::Related { reference } => {
            require_verse(app_data, reference)?;
            let related = app_data.get_related_verses(reference.chapter, reference.verse);
            if json {
                return print_json(&related);
            }
            print!("{}", output::related_lines(&related));
        }

        Commands::Popular { reference } => {
            require_verse(app_data, reference)?;
            let popular = app_data.get_popular_verses_in_chapter(reference.chapter, reference.verse);
            if json {
                return print_json(&popular);
            }
            print!("{}", output::popular_lines(reference.chapter, &popular));
        }

        Commands::Videos { reference } => {
            require_verse(app_data, reference)?;
            let sources = app_data.get_verse_video_sources(reference.chapter, reference.verse);
            let default_language = app_data.resolve_default_video_language(&sources);
            if json {
                return print_json(&serde_json::json!({
                    "videos": sources,
                    "default_language": default_language,
                }));
            }
            print!("{}", output::video_lines(&sources, default_language.as_deref()));
        }

        Commands::Check => {
            let missing = app_data.missing_verse_keys()?;
            let drift = app_data.drift_report();

            if json {
                print_json(&serde_json::json!({ "missing_content": missing, "table_drift": drift }))?;
            } else {
                println!("Verses: {}", app_data.get_all_verse_keys().len());
                println!("Missing content: {}", missing.len());
                if !missing.is_empty() {
                    println!("  {}", output::key_ranges(&missing));
                }
                println!("Table drift: {}", drift.len());
                print!("{}", output::drift_lines(&drift));
            }

            if !drift.is_empty() {
                return Err(anyhow!("{} table entries point to verses that don't exist", drift.len()));
            }
        }
    }

    Ok(())
}

fn main() {
    // A .env file may define GITA_DIR, clap picks it up via `env = "GITA_DIR"`.
    dotenv().ok();

    let cli = Cli::parse();

    // Precedence:
    // - given with --gita-dir
    // - set with env var GITA_DIR
    // - get_create_gita_dir()
    let gita_dir = match cli.gita_dir {
        Some(path) => path,
        None => match get_create_gita_dir() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Failed to get the data directory: {}", e);
                eprintln!("Use the --gita-dir option or set the GITA_DIR environment variable.");
                exit(1);
            }
        },
    };

    if !gita_dir.is_dir() {
        eprintln!("Error: Directory does not exist or is not a directory: {:?}", gita_dir);
        exit(1);
    }

    let app_data = match AppData::new(&gita_dir) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("Failed to load data: {:#}", e);
            exit(1);
        }
    };

    if let Err(e) = run(cli.command, &app_data, cli.json) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}
