use anyhow::{Context, Result};

use study_tracker_lib::catalog::{Difficulty, Facet, FilterSpec, Level, ModuleStatus};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

/// Build a filter from the three facet flags ("all" leaves a facet open)
pub fn parse_filters(status: &str, difficulty: &str, level: &str) -> Result<FilterSpec> {
    Ok(FilterSpec {
        status: status.parse::<Facet<ModuleStatus>>().context("Bad --status")?,
        difficulty: difficulty.parse::<Facet<Difficulty>>().context("Bad --difficulty")?,
        level: level.parse::<Facet<Level>>().context("Bad --level")?,
    })
}

pub fn run(app: &App, spec: &FilterSpec, format: &OutputFormat, use_color: bool) -> Result<()> {
    let groups = app.study.state().semester_groups(spec).display_groups();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        OutputFormat::Plain => {
            if groups.is_empty() {
                println!("No modules match these filters.");
                return Ok(());
            }
            for group in &groups {
                println!("{}", terminal::paint(&group.label, Color::BOLD, use_color));
                for module in &group.modules {
                    println!("  {}", terminal::module_line(module, use_color));
                }
                println!();
            }
        }
    }

    Ok(())
}
