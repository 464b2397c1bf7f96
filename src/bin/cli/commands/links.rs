use anyhow::{bail, Context, Result};

use study_tracker_lib::catalog::LinkRef;

use crate::app::App;
use crate::OutputFormat;

pub async fn run_add(
    app: &mut App,
    query: &str,
    title: &str,
    url: &str,
    format: &OutputFormat,
) -> Result<()> {
    let module_id = app.module_id(query)?;
    app.study
        .add_link(&module_id, LinkRef::new(title, url))
        .await
        .context("Failed to add link")?;
    print_links(app, &module_id, format)
}

/// Remove the link whose URL matches exactly
pub async fn run_rm(app: &mut App, query: &str, url: &str, format: &OutputFormat) -> Result<()> {
    let module = app.find_module(query)?;
    let module_id = module.id.clone();
    let Some(link) = module.links.iter().find(|l| l.url == url.trim()).cloned() else {
        bail!("{} has no link to {}", module_id, url);
    };

    app.study
        .remove_link(&module_id, &link)
        .await
        .context("Failed to delete link")?;
    print_links(app, &module_id, format)
}

fn print_links(app: &App, module_id: &str, format: &OutputFormat) -> Result<()> {
    let module = app.find_module(module_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&module.links)?),
        OutputFormat::Plain => {
            println!("{} links:", module.id);
            for link in &module.links {
                println!("  {}  {}", link.label(), link.url);
            }
        }
    }
    Ok(())
}
