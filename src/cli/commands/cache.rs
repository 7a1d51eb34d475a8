//! Cache command - inspect and manage the artifact store

use crate::cache::{format_bytes, ArtifactStore, StoredEntry};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::cli::commands::open_store;
use crate::config::Config;
use crate::error::WwResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> WwResult<()> {
    let store = open_store(config);

    match args.action {
        CacheAction::List { format } => list_entries(&store, format),
        CacheAction::Gc { days, dry_run } => {
            gc_entries(&store, days.unwrap_or(config.cache.max_age_days), dry_run)
        }
        CacheAction::Clear { yes } => clear_entries(&store, yes).await,
    }
}

fn list_entries(store: &ArtifactStore, format: OutputFormat) -> WwResult<()> {
    let entries = store.entries()?;

    if entries.is_empty() {
        println!("No store entries at {}.", store.root().display());
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&entries, store)?,
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.id.dir_name());
            }
        }
    }

    Ok(())
}

fn print_table(entries: &[StoredEntry], store: &ArtifactStore) -> WwResult<()> {
    println!(
        "{:<42} {:<10} {:<12} {:<8} {:<17}",
        "ENTRY", "KIND", "PACKAGE", "FROZEN", "CREATED"
    );
    println!("{}", "-".repeat(92));

    for entry in entries {
        let created = entry.meta.created_at.format("%Y-%m-%d %H:%M").to_string();
        println!(
            "{:<42} {:<10} {:<12} {:<8} {:<17}",
            entry.id.dir_name(),
            entry.meta.kind.to_string(),
            entry.meta.package.as_deref().unwrap_or("-"),
            if entry.meta.frozen { "yes" } else { "no" },
            created
        );
    }

    println!();
    println!(
        "Total: {} entr(ies), {}",
        entries.len(),
        format_bytes(store.size_bytes()?)
    );
    Ok(())
}

fn print_json(entries: &[StoredEntry]) -> WwResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson {
        name: String,
        kind: String,
        key: String,
        package: Option<String>,
        frozen: bool,
        files: Vec<String>,
        created_at: String,
    }

    let json_entries: Vec<EntryJson> = entries
        .iter()
        .map(|e| EntryJson {
            name: e.id.dir_name(),
            kind: e.meta.kind.to_string(),
            key: e.meta.key.clone(),
            package: e.meta.package.clone(),
            frozen: e.meta.frozen,
            files: e.meta.files.clone(),
            created_at: e.meta.created_at.to_rfc3339(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_entries)?);
    Ok(())
}

fn gc_entries(store: &ArtifactStore, days: u32, dry_run: bool) -> WwResult<()> {
    if dry_run {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(i64::from(days));
        let candidates: Vec<String> = store
            .entries()?
            .into_iter()
            .filter(|e| e.meta.created_at < cutoff)
            .map(|e| e.id.dir_name())
            .collect();

        if candidates.is_empty() {
            println!("Nothing older than {} day(s).", days);
        } else {
            println!("Would remove {} entr(ies):", candidates.len());
            for name in candidates {
                println!("  {}", name);
            }
        }
        return Ok(());
    }

    let removed = store.gc(days)?;
    if removed.is_empty() {
        println!("Nothing older than {} day(s).", days);
    } else {
        println!(
            "{} Removed {} entr(ies)",
            style("✓").green(),
            removed.len()
        );
    }
    Ok(())
}

async fn clear_entries(store: &ArtifactStore, yes: bool) -> WwResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let count = store.entries()?.len();

    if count == 0 {
        println!("Store is already empty.");
        return Ok(());
    }

    let confirmed = ui::confirm(
        &ctx,
        &format!("Remove all {} store entr(ies)?", count),
        false,
    )
    .await?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }

    let removed = store.clear()?;
    println!("{} Removed {} entr(ies)", style("✓").green(), removed);
    Ok(())
}
