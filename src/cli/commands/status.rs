//! Status command - check build tools and store health

use crate::cache::format_bytes;
use crate::cli::commands::open_store;
use crate::config::Config;
use crate::error::WwResult;
use crate::toolchain::{
    parse_tool_version, CargoCompiler, MaturinBuilder, PipInstaller, WheelBuilder, WheelInstaller,
    WorkspaceCompiler,
};
use console::{style, Emoji};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");

/// Execute the status command
pub async fn execute(config: &Config) -> WwResult<()> {
    println!("{}", style("Wheelwright Status").bold().cyan());
    println!();

    let mut all_ok = true;

    println!("{}", style("Build tools:").bold());
    let probe = crate::ui::tool_spinner("Probing build tools...");
    let cargo = CargoCompiler::with_program(config.build.cargo.as_str());
    let maturin = MaturinBuilder::with_program(config.build.maturin.as_str());
    let pip = PipInstaller::with_program(config.install.pip.as_str());
    let cargo_up = cargo.is_available().await;
    let maturin_up = maturin.is_available().await;
    let pip_up = pip.is_available().await;
    probe.finish_and_clear();

    all_ok &= report_tool(&config.build.cargo, cargo_up, || async {
        cargo.version().await
    })
    .await;
    all_ok &= report_tool(&config.build.maturin, maturin_up, || async {
        maturin.version().await
    })
    .await;
    all_ok &= report_tool(&config.install.pip, pip_up, || async {
        pip.version().await
    })
    .await;

    println!();
    println!("{}", style("Artifact store:").bold());
    let store = open_store(config);
    match store.entries() {
        Ok(entries) => {
            println!("  {} Root: {}", CHECK, store.root().display());
            println!(
                "  {} {} entr(ies), {}",
                CHECK,
                entries.len(),
                format_bytes(store.size_bytes()?)
            );
        }
        Err(e) => {
            println!("  {} {} - {}", CROSS, style("Unreadable").red(), e);
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("{}", style("All checks passed").green().bold());
    } else {
        println!(
            "{}",
            style("Some checks failed - see above for details")
                .yellow()
                .bold()
        );
    }

    Ok(())
}

async fn report_tool<F, Fut>(name: &str, available: bool, version: F) -> bool
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = WwResult<String>>,
{
    if !available {
        println!(
            "  {} {} - {}",
            CROSS,
            name,
            style("not found on PATH").red()
        );
        return false;
    }

    match version().await {
        Ok(raw) => match parse_tool_version(&raw) {
            Some(version) => println!("  {} {} {}", CHECK, name, version),
            None => println!("  {} {} ({})", CHECK, name, raw),
        },
        Err(_) => println!("  {} {}", CHECK, name),
    }
    true
}
