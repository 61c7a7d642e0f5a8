// FILE: crates/cli/src/commands.rs

use crate::CliContext;
use anyhow::{anyhow, bail, Context, Result};
use chaptershelf_core::{format_time, AppError, AudioBook, ErrorSeverity};
use chaptershelf_library::{BookDraft, LibraryError, LibraryManager};
use clap::ArgMatches;
use console::style;

/// Opens the library file named by the context
pub fn open_library(ctx: &CliContext) -> Result<LibraryManager> {
    let manager = LibraryManager::open(&ctx.library_path)
        .map_err(library_error)
        .with_context(|| format!("Failed to open library {}", ctx.library_path.display()))?;
    Ok(manager.require_cover(ctx.config.library.require_cover))
}

/// Friendly message first, technical detail after
pub fn library_error(err: LibraryError) -> anyhow::Error {
    let detail = err.to_string();
    let app_error = AppError::from(err);
    if app_error.severity() == ErrorSeverity::Fatal {
        log::error!("{}", detail);
    }
    anyhow!("{} ({})", app_error.user_message(), detail)
}

/// Parses `90`, `90.5`, `1:30` or `1:02:03` into seconds
pub fn parse_time(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.split(':').count() > 3 {
        bail!("'{}' has too many ':' separators", text);
    }

    let mut seconds = 0.0;
    for part in text.split(':') {
        let value: f64 = part
            .parse()
            .with_context(|| format!("'{}' is not a time", text))?;
        if !value.is_finite() || value < 0.0 {
            bail!("'{}' is not a time", text);
        }
        seconds = seconds * 60.0 + value;
    }
    Ok(seconds)
}

/// Parses `TITLE=START-END`; the title may itself contain `=`
pub fn parse_chapter_spec(spec: &str) -> Result<(String, f64, f64)> {
    let (title, range) = spec
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Chapter '{}' must look like TITLE=START-END", spec))?;
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| anyhow!("Chapter '{}' must look like TITLE=START-END", spec))?;
    Ok((title.trim().to_string(), parse_time(start)?, parse_time(end)?))
}

fn parse_chapter_number(text: &str, count: usize) -> Result<usize> {
    let number: usize = text
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a chapter number", text))?;
    chapter_index(number, count)
}

/// Converts a 1-based chapter number into an index
pub fn chapter_index(number: usize, count: usize) -> Result<usize> {
    if number == 0 || number > count {
        bail!("Chapter {} does not exist (book has {})", number, count);
    }
    Ok(number - 1)
}

fn add_chapter_specs<'a>(
    draft: &mut BookDraft,
    specs: impl Iterator<Item = &'a String>,
) -> Result<()> {
    for spec in specs {
        let (title, start, end) = parse_chapter_spec(spec)?;
        draft
            .add_chapter(title, start, end)
            .map_err(library_error)
            .with_context(|| format!("Chapter '{}' rejected", spec))?;
    }
    Ok(())
}

/// List all books in the library
pub fn list_books(ctx: &CliContext, as_json: bool) -> Result<()> {
    let manager = open_library(ctx)?;
    let summaries = manager.library().summaries();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No books in library. Use 'add' command to add one.");
        return Ok(());
    }

    println!(
        "\n{} Books in Library ({} total)",
        style(summaries.len()).bold().cyan(),
        format_time(manager.library().total_duration())
    );
    println!("{}", "=".repeat(80));

    for summary in summaries {
        println!(
            "{}  {}",
            style(&summary.id.as_string()[..8]).dim(),
            style(&summary.title).bold()
        );
        println!(
            "          {} | {} chapters{}",
            summary.duration,
            summary.chapter_count,
            if summary.has_cover { " | cover" } else { "" }
        );
    }

    Ok(())
}

/// Add a new book to the library
pub fn add_book(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let title = matches
        .get_one::<String>("title")
        .ok_or_else(|| anyhow!("Title is required"))?;
    let source = matches
        .get_one::<String>("source")
        .ok_or_else(|| anyhow!("Audio source is required"))?;
    let duration = parse_time(
        matches
            .get_one::<String>("duration")
            .ok_or_else(|| anyhow!("Duration is required"))?,
    )?;

    if !ctx.config.library.is_supported(source) {
        eprintln!(
            "{} '{}' does not have a supported audio extension ({})",
            style("Warning:").yellow(),
            source,
            ctx.config.library.supported_extensions.join(", ")
        );
    }

    let mut draft = BookDraft::new();
    draft.set_title(title.as_str());
    draft.set_audio_source(source.as_str(), duration);
    draft.set_cover_source(matches.get_one::<String>("cover").cloned());

    if let Some(specs) = matches.get_many::<String>("chapter") {
        add_chapter_specs(&mut draft, specs)?;
    }

    let mut manager = open_library(ctx)?;
    let id = manager.save_draft(&draft).map_err(library_error)?;

    println!("{} Book added successfully!", style("✓").green().bold());
    println!("  ID: {}", id);
    println!("  Title: {}", draft.title());
    println!("  Chapters: {}", draft.chapters().len());

    Ok(())
}

/// Edit title, cover and chapters of an existing book
pub fn edit_book(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let query = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("Book ID is required"))?;

    let mut manager = open_library(ctx)?;
    let book = manager.find_book(query).map_err(library_error)?;
    let mut draft = BookDraft::from_book(book);

    if let Some(title) = matches.get_one::<String>("title") {
        draft.set_title(title.as_str());
    }
    if let Some(cover) = matches.get_one::<String>("cover") {
        draft.set_cover_source(Some(cover.clone()));
    }
    if matches.get_flag("no-cover") {
        draft.set_cover_source(None);
    }

    // Renames and removals use the numbering shown before this edit
    if let Some(renames) = matches.get_many::<String>("rename-chapter") {
        for rename in renames {
            let (number, title) = rename
                .split_once('=')
                .ok_or_else(|| anyhow!("'{}' must look like N=TITLE", rename))?;
            let index = parse_chapter_number(number, draft.chapters().len())?;
            let chapter = &draft.chapters()[index];
            let (start, end) = (chapter.start_time, chapter.end_time);
            draft
                .edit_chapter(index, title.trim(), start, end)
                .map_err(library_error)?;
        }
    }

    if let Some(numbers) = matches.get_many::<usize>("remove-chapter") {
        let count = draft.chapters().len();
        let mut indices = numbers
            .map(|&n| chapter_index(n, count))
            .collect::<Result<Vec<_>>>()?;
        indices.sort_unstable();
        indices.dedup();
        for index in indices.into_iter().rev() {
            draft.remove_chapter(index).map_err(library_error)?;
        }
    }

    if let Some(specs) = matches.get_many::<String>("chapter") {
        add_chapter_specs(&mut draft, specs)?;
    }

    let id = manager.save_draft(&draft).map_err(library_error)?;
    println!("{} Updated {} ({})", style("✓").green().bold(), draft.title(), id);
    Ok(())
}

/// Show a book's chapters
pub fn show_chapters(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let query = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("Book ID is required"))?;

    let manager = open_library(ctx)?;
    let book = manager.find_book(query).map_err(library_error)?;
    print_chapters(book);
    Ok(())
}

fn print_chapters(book: &AudioBook) {
    println!("\n{}", style(&book.title).bold().cyan());
    println!("{}", "=".repeat(80));

    if book.chapters.is_empty() {
        println!("No chapters.");
        return;
    }

    for (i, chapter) in book.chapters.iter().enumerate() {
        println!(
            "{:>3}. {:<40} {:>8} - {:<8} ({})",
            i + 1,
            chapter.title,
            format_time(chapter.start_time),
            format_time(chapter.end_time),
            chapter.formatted_duration()
        );
    }
}

/// Delete a book from the library
pub fn delete_book(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let query = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("Book ID is required"))?;

    let mut manager = open_library(ctx)?;
    let id = manager.find_book(query).map_err(library_error)?.id;
    let removed = manager.delete_book(id).map_err(library_error)?;

    println!("{} Deleted '{}'", style("✓").green().bold(), removed.title);
    Ok(())
}

/// `config init|show|validate|reset`
pub fn config_command(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let manager = &ctx.config_manager;

    match matches.subcommand() {
        Some(("init", _)) => {
            if manager.initialize()? {
                println!("Created {}", manager.config_path().display());
            } else {
                println!("Config already exists at {}", manager.config_path().display());
            }
        }
        Some(("show", _)) => {
            println!("# {}", manager.config_path().display());
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
            println!("# library file: {}", ctx.library_path.display());
        }
        Some(("validate", _)) => {
            let problems = manager.validate()?;
            if problems.is_empty() {
                println!("{} Configuration is valid", style("✓").green().bold());
            } else {
                for problem in &problems {
                    println!("{} {}", style("✗").red().bold(), problem);
                }
                bail!("{} invalid config value(s)", problems.len());
            }
        }
        Some(("reset", _)) => {
            manager.reset()?;
            println!("Reset {}", manager.config_path().display());
        }
        _ => bail!("Unknown config command"),
    }

    Ok(())
}
