use super::render::{render_card, render_card_list, render_messages, render_reconcile, render_stats};
use super::setup::{build_command, Cli, Commands};
use super::styles::{Palette, THEME};
use anyhow::{bail, Context, Result};
use cardvaultapp::commands::list::CardFilter;
use cardvaultapp::commands::CmdMessage;
use cardvaultapp::config::CardVaultConfig;
use cardvaultapp::init::{initialize_with, resolve_data_dir, CardVaultContext};
use cardvaultapp::model::CardForm;
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// How command results reach the terminal.
struct Output<'a> {
    json: bool,
    palette: &'a Palette,
}

impl Output<'_> {
    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn messages(&self, messages: &[CmdMessage]) {
        print!("{}", render_messages(messages, self.palette));
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        clap_complete::generate(*shell, &mut build_command(), "cardvault", &mut io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir(cli.data.clone())?;
    let config = CardVaultConfig::load(&data_dir)?;
    init_logging(cli.verbose, &config.log_level);

    let mut ctx = initialize_with(data_dir, config);
    let output = Output {
        json: cli.json,
        palette: &THEME,
    };
    eprint!("{}", render_reconcile(&ctx.reconcile, output.palette));

    match cli.command {
        None | Some(Commands::List) => handle_search(&ctx, &output, CardFilter::default()),
        Some(Commands::Add(card)) => handle_save(&mut ctx, &output, None, card.into_form()),
        Some(Commands::Edit { id, card }) => {
            handle_save(&mut ctx, &output, Some(&id), card.into_form())
        }
        Some(Commands::Show { id }) => handle_show(&ctx, &output, &id),
        Some(Commands::Rm { id }) => handle_rm(&mut ctx, &output, &id),
        Some(Commands::Search {
            query,
            author,
            card_type,
        }) => handle_search(
            &ctx,
            &output,
            CardFilter {
                query,
                author,
                card_type,
            },
        ),
        Some(Commands::Stats) => handle_stats(&ctx, &output),
        Some(Commands::Export { output: target }) => handle_export(&ctx, &output, target),
        Some(Commands::Import { file }) => handle_import(&mut ctx, &output, &file),
        Some(Commands::Doctor) => handle_doctor(&ctx, &output),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, &output, yes),
        // Generated before any context exists.
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// `RUST_LOG` wins, then `--verbose`, then the configured level. Logs go to stderr.
fn init_logging(verbose: bool, config_level: &str) {
    let fallback = if verbose { "debug" } else { config_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_search(ctx: &CardVaultContext, out: &Output, filter: CardFilter) -> Result<()> {
    let result = ctx.api.search(&filter)?;
    if out.json {
        return out.print_json(&result.listed_cards);
    }
    print!("{}", render_card_list(&result.listed_cards, out.palette));
    Ok(())
}

/// Add and edit both go through the editor flow: an id puts the session in
/// edit mode first, and the form only carries the flags that were given.
fn handle_save(
    ctx: &mut CardVaultContext,
    out: &Output,
    editing: Option<&str>,
    form: CardForm,
) -> Result<()> {
    if let Some(id) = editing {
        ctx.api.begin_edit(&mut ctx.session, id)?;
    }
    let result = ctx.api.save_form(&mut ctx.session, form)?;
    if out.json {
        return out.print_json(&result.card());
    }
    out.messages(&result.messages);
    if let Some(card) = result.card() {
        println!("{}", out.palette.id.apply_to(card.id.as_str()));
    }
    Ok(())
}

fn handle_show(ctx: &CardVaultContext, out: &Output, id: &str) -> Result<()> {
    let card = ctx.api.get(id)?;
    if out.json {
        return out.print_json(&card);
    }
    print!("{}", render_card(&card, out.palette));
    Ok(())
}

fn handle_rm(ctx: &mut CardVaultContext, out: &Output, id: &str) -> Result<()> {
    let result = ctx.api.delete(id)?;
    if out.json {
        return out.print_json(&result);
    }
    out.messages(&result.messages);
    Ok(())
}

fn handle_stats(ctx: &CardVaultContext, out: &Output) -> Result<()> {
    let stats = ctx.api.stats()?;
    if out.json {
        return out.print_json(&stats);
    }
    print!("{}", render_stats(&stats, out.palette));
    Ok(())
}

fn handle_export(ctx: &CardVaultContext, out: &Output, target: Option<PathBuf>) -> Result<()> {
    let document = ctx.api.export()?;
    let text = document.to_json_pretty()?;

    if target.as_deref() == Some(Path::new("-")) {
        println!("{}", text);
        return Ok(());
    }

    let path = target.unwrap_or_else(|| {
        PathBuf::from(cardvaultapp::commands::export::default_file_name(
            &ctx.config.export_prefix,
            Local::now().date_naive(),
        ))
    });
    std::fs::write(&path, format!("{}\n", text))
        .with_context(|| format!("writing export to {}", path.display()))?;

    if out.json {
        return out.print_json(&serde_json::json!({
            "file": path.display().to_string(),
            "cardCount": document.card_count,
        }));
    }
    out.messages(&[CmdMessage::success(format!(
        "Exported {} card(s) to {}",
        document.card_count,
        path.display()
    ))]);
    Ok(())
}

fn handle_import(ctx: &mut CardVaultContext, out: &Output, file: &Path) -> Result<()> {
    let text = if file == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading import document from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?
    };

    let result = ctx.api.import_str(&text)?;
    if out.json {
        return out.print_json(&result);
    }
    out.messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &CardVaultContext, out: &Output) -> Result<()> {
    let report = ctx.api.doctor()?;
    if out.json {
        return out.print_json(&report);
    }
    out.messages(&report.messages());
    Ok(())
}

fn handle_clear(ctx: &mut CardVaultContext, out: &Output, yes: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to delete every card without --yes");
    }
    let result = ctx.api.clear()?;
    if out.json {
        return out.print_json(&result);
    }
    out.messages(&result.messages);
    Ok(())
}
