use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let state = app.study.state();
    let progress = state.progress();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "email": state.identity().and_then(|i| i.email.clone()),
                "progress": progress,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if let Some(email) = state.identity().and_then(|i| i.email.as_deref()) {
                println!("Hello {}", terminal::paint(email, Color::BOLD, use_color));
            }
            println!("Ready to climb another step?");
            println!();
            println!("Progress ({} modules)", progress.total);
            println!("  {}", terminal::progress_bar(&progress, 40, use_color));
            println!(
                "  {} completed ({:.0}%)  {} in progress ({:.0}%)  {} upcoming",
                progress.completed,
                progress.completed_percentage,
                progress.in_progress,
                progress.in_progress_percentage,
                progress.upcoming,
            );
        }
    }

    Ok(())
}
