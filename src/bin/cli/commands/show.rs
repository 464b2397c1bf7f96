use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let module = app.find_module(query)?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(module)?);
        return Ok(());
    }

    println!("{}", terminal::paint(&module.name, Color::BOLD, use_color));
    let status = format!("[{}]", module.status);
    println!(
        "{}  Level {}  {}",
        terminal::paint(&status, terminal::status_color(module.status), use_color),
        module.level,
        module.difficulty,
    );
    println!();

    let final_date = module
        .final_date
        .map(|d| d.long_label())
        .unwrap_or_else(|| "Not scheduled".to_string());
    println!("  Midterm:         {}", module.midterm);
    println!("  Final:           {}", module.final_assessment);
    println!("  Final date:      {}", final_date);
    println!("  Estimated time:  {}", module.estimated_time);

    println!();
    println!("Files");
    if module.files.is_empty() {
        println!("  {}", terminal::paint("(no files)", Color::DIM, use_color));
    }
    for file in &module.files {
        println!("  {}  {}", file.name, terminal::paint(&file.url, Color::DIM, use_color));
    }

    println!();
    println!("Links");
    if module.links.is_empty() {
        println!("  {}", terminal::paint("(no links)", Color::DIM, use_color));
    }
    for link in &module.links {
        if link.label() == link.url {
            println!("  {}", link.url);
        } else {
            println!("  {}  {}", link.label(), terminal::paint(&link.url, Color::DIM, use_color));
        }
    }

    Ok(())
}
