use anyhow::{Context, Result};

use study_tracker_lib::catalog::{ModulePatch, ModuleStatus, YearMonth};

use crate::app::App;
use crate::OutputFormat;

pub async fn run_set_status(
    app: &mut App,
    query: &str,
    status: &str,
    format: &OutputFormat,
) -> Result<()> {
    let module_id = app.module_id(query)?;
    let status: ModuleStatus = status.parse()?;

    app.study
        .update_module(&module_id, &ModulePatch::status(status))
        .await
        .context("Failed to update status")?;
    print_result(app, &module_id, format)
}

/// `date` is `YYYY-MM`, or `none`/empty to clear it
pub async fn run_set_date(
    app: &mut App,
    query: &str,
    date: &str,
    format: &OutputFormat,
) -> Result<()> {
    let module_id = app.module_id(query)?;
    let date = date.trim();
    let final_date = if date.is_empty() || date.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(date.parse::<YearMonth>()?)
    };

    app.study
        .update_module(&module_id, &ModulePatch::final_date(final_date))
        .await
        .context("Failed to update final date")?;
    print_result(app, &module_id, format)
}

fn print_result(app: &App, module_id: &str, format: &OutputFormat) -> Result<()> {
    let module = app.find_module(module_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(module)?),
        OutputFormat::Plain => {
            let date = module
                .final_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unscheduled".to_string());
            println!("Updated {}: {}, final {}", module.id, module.status, date);
        }
    }
    Ok(())
}
