// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use chaptershelf_config::{Config, ConfigManager};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

mod commands;
mod player;

fn build_cli() -> Command {
    Command::new("chaptershelf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Audiobook library with chapter-bounded playback")
        .arg(
            Arg::new("library")
                .short('l')
                .long("library")
                .value_name("PATH")
                .help("Library file to use instead of the configured one")
                .global(true),
        )
        .subcommand(
            Command::new("list")
                .about("List all books in the library")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print book summaries as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new book to the library")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("source").required(true).value_name("SOURCE").help("Audio file path or URL"))
                .arg(
                    Arg::new("duration")
                        .short('d')
                        .long("duration")
                        .required(true)
                        .value_name("TIME")
                        .help("Length of the audio, as seconds or H:MM:SS"),
                )
                .arg(
                    Arg::new("chapter")
                        .short('c')
                        .long("chapter")
                        .value_name("TITLE=START-END")
                        .help("Chapter to add; repeat for more chapters")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("cover").long("cover").value_name("PATH").help("Cover image path or URL")),
        )
        .subcommand(
            Command::new("edit")
                .about("Change a book's title, cover or chapters")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID or unique prefix"))
                .arg(Arg::new("title").short('t').long("title").value_name("TITLE").help("New title"))
                .arg(Arg::new("cover").long("cover").value_name("PATH").help("New cover image"))
                .arg(
                    Arg::new("no-cover")
                        .long("no-cover")
                        .help("Remove the cover image")
                        .conflicts_with("cover")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("rename-chapter")
                        .long("rename-chapter")
                        .value_name("N=TITLE")
                        .help("Rename chapter N (1-based)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("remove-chapter")
                        .long("remove-chapter")
                        .value_name("N")
                        .help("Remove chapter N (1-based)")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("chapter")
                        .short('c')
                        .long("chapter")
                        .value_name("TITLE=START-END")
                        .help("Chapter to append")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("chapters")
                .about("Show a book's chapters")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID or unique prefix")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a book from the library")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID or unique prefix")),
        )
        .subcommand(
            Command::new("play")
                .about("Play one chapter on the simulated transport")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID or unique prefix"))
                .arg(
                    Arg::new("chapter")
                        .short('c')
                        .long("chapter")
                        .value_name("N")
                        .help("Chapter to play (1-based)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("speed")
                        .short('s')
                        .long("speed")
                        .value_name("RATE")
                        .help("Playback rate")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("volume")
                        .short('v')
                        .long("volume")
                        .value_name("PERCENT")
                        .help("Volume, 0-100")
                        .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    Arg::new("warp")
                        .long("warp")
                        .value_name("FACTOR")
                        .help("Run the simulated clock this many times faster than real time")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the final player state as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write a default config file if none exists"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("validate").about("Check the config file for invalid values"))
                .subcommand(Command::new("reset").about("Overwrite the config file with defaults")),
        )
}

/// Config, library location and config manager shared by every command
pub struct CliContext {
    pub config_manager: ConfigManager,
    pub config: Config,
    pub library_path: PathBuf,
}

impl CliContext {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let config_manager =
            ConfigManager::new().context("Failed to locate the configuration directory")?;
        let config = config_manager
            .load_with_env_overrides()
            .unwrap_or_else(|e| {
                eprintln!("Warning: {}, using default configuration", e);
                Config::default()
            });

        let library_path = match matches.get_one::<String>("library") {
            Some(path) => PathBuf::from(path),
            None => config_manager.library_path(&config),
        };

        Ok(Self {
            config_manager,
            config,
            library_path,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let ctx = CliContext::from_matches(&matches)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(ctx.config.app.log_level.to_string()),
    )
    .init();
    log::debug!("Using library at {}", ctx.library_path.display());

    match matches.subcommand() {
        Some(("list", sub_matches)) => commands::list_books(&ctx, sub_matches.get_flag("json")),
        Some(("add", sub_matches)) => commands::add_book(&ctx, sub_matches),
        Some(("edit", sub_matches)) => commands::edit_book(&ctx, sub_matches),
        Some(("chapters", sub_matches)) => commands::show_chapters(&ctx, sub_matches),
        Some(("delete", sub_matches)) => commands::delete_book(&ctx, sub_matches),
        Some(("play", sub_matches)) => {
            let options = player::PlayOptions::from_matches(sub_matches)?;
            player::play_book(&ctx, options).await
        }
        Some(("config", sub_matches)) => commands::config_command(&ctx, sub_matches),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
