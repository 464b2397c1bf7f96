use anyhow::{Context, Result};

use study_tracker_lib::flashcards::NewFlashcard;

use crate::app::App;
use crate::OutputFormat;

pub async fn run_ls(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let module_id = app.module_id(query)?;
    let cards = app
        .study
        .list_flashcards(&module_id)
        .await
        .context("Failed to fetch flashcards")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No flashcards for {} yet.", module_id);
                return Ok(());
            }
            for (i, card) in cards.iter().enumerate() {
                println!("{:>3}. Q: {}", i + 1, card.question);
                println!("     A: {}", card.answer);
            }
        }
    }
    Ok(())
}

pub async fn run_add(
    app: &App,
    query: &str,
    question: &str,
    answer: &str,
    format: &OutputFormat,
) -> Result<()> {
    let module_id = app.module_id(query)?;
    let card = app
        .study
        .add_flashcard(&module_id, &NewFlashcard::new(question, answer))
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Added flashcard {} to {}", card.id, module_id),
    }
    Ok(())
}
