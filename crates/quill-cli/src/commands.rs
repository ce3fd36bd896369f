use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use quill_settings::{
    acquire, codec, SettingField, SettingValue, Settings, SettingsConfig, SettingsContext,
    SettingsProvider,
};
use quill_store::{DurableStore, FileStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let store = FileStore::open(&cli.store)
        .with_context(|| format!("opening store {}", cli.store.display()))?;

    let command = match cli.command {
        // Raw inspection must not open a scope, which would rewrite the key.
        Command::Raw => return cmd_raw(&store, &config),
        command => command,
    };

    let provider = SettingsProvider::with_config(Arc::new(store), config);
    let scope = provider.create_scope()?;
    let ctx = scope.context();

    match command {
        Command::Show => cmd_show(&ctx, &cli.format),
        Command::Get(args) => cmd_get(&ctx, args),
        Command::Set(args) => cmd_set(&ctx, args),
        Command::Reset => cmd_reset(&ctx, &cli.format),
        Command::Raw => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SettingsConfig> {
    let Some(path) = path else {
        return Ok(SettingsConfig::default());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    Ok(SettingsConfig::from_toml_str(&contents)?)
}

fn cmd_show(ctx: &SettingsContext, format: &OutputFormat) -> anyhow::Result<()> {
    let settings = acquire(ctx)?;
    println!("{}", render(&settings.snapshot(), format));
    Ok(())
}

fn cmd_get(ctx: &SettingsContext, args: GetArgs) -> anyhow::Result<()> {
    let field: SettingField = args.field.parse()?;
    println!("{}", acquire(ctx)?.snapshot().get(field));
    Ok(())
}

fn cmd_set(ctx: &SettingsContext, args: SetArgs) -> anyhow::Result<()> {
    let settings = acquire(ctx)?;
    let field: SettingField = args.field.parse()?;
    let value = SettingValue::parse(field, &args.value)?;
    settings.set(value)?;

    let pinned = settings.config().pinned_language.as_deref();
    match (field, pinned) {
        (SettingField::Language, Some(pinned)) if pinned != args.value => {
            println!(
                "{} language is pinned to {}, value unchanged",
                "!".yellow().bold(),
                pinned.bold()
            );
        }
        _ => {
            let current = settings.snapshot().get(field).to_string();
            println!("{} {} = {}", "✓".green().bold(), field, current.yellow());
        }
    }
    Ok(())
}

fn cmd_reset(ctx: &SettingsContext, format: &OutputFormat) -> anyhow::Result<()> {
    let settings = acquire(ctx)?;
    settings.reset()?;
    if let OutputFormat::Text = format {
        println!("{} Settings restored to defaults", "✓".green().bold());
    }
    println!("{}", render(&settings.snapshot(), format));
    Ok(())
}

fn cmd_raw(store: &dyn DurableStore, config: &SettingsConfig) -> anyhow::Result<()> {
    match store.get(&config.storage_key)? {
        Some(raw) => println!("{raw}"),
        None => println!("{} no value under {}", "-".dimmed(), config.storage_key.bold()),
    }
    Ok(())
}

fn render(settings: &Settings, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => codec::dump(settings),
        OutputFormat::Text => SettingField::ALL
            .into_iter()
            .map(|field| format!("{:<18} {}", field.to_string().bold(), settings.get(field)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
