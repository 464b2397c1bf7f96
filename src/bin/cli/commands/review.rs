use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use study_tracker_lib::flashcards::ReviewSession;

use crate::app::App;
use crate::render::terminal::{self, Color};

const HELP: &str = "[enter] reveal  [n]ext  [p]rev  [k]new it  [a]gain  [q]uit";

/// Interactive review over the cards of `queries`, in the order given
pub async fn run(app: &App, queries: &[String], use_color: bool) -> Result<()> {
    let mut session = ReviewSession::new();
    let module_ids = queries
        .iter()
        .map(|q| app.module_id(q))
        .collect::<Result<Vec<_>>>()?;
    session.set_selection(module_ids);

    println!("Loading flashcards...");
    app.study
        .start_review(&mut session)
        .await
        .context("Failed to fetch flashcards")?;

    if session.is_empty_review() {
        println!("No flashcards found for the selected modules.");
        return Ok(());
    }

    println!("{}", terminal::paint(HELP, Color::DIM, use_color));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_card(&session, use_color);
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" | "r" => session.reveal(),
            "n" => session.next(),
            "p" => session.prev(),
            "k" => session.knew_it(),
            "a" => session.review_again(),
            "q" => break,
            other => println!("Unknown key {:?}. {}", other, HELP),
        }
    }

    Ok(())
}

fn print_card(session: &ReviewSession, use_color: bool) {
    let (Some((position, total)), Some(text)) = (session.position(), session.visible_text()) else {
        return;
    };
    let side = if session.is_revealed() { "Answer" } else { "Question" };
    println!();
    println!(
        "Card {} / {}  {}",
        position,
        total,
        terminal::paint(side, Color::DIM, use_color)
    );
    println!("  {}", terminal::paint(text, Color::BOLD, use_color));
}
