//! Interactive review loop for the `review` command.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::cli::open_store;
use crate::review::{ReviewError, ReviewMode, ReviewOutcome, ReviewProgress, ReviewSession};

/// Walk one set's queue card by card, reading verdicts from stdin.
pub async fn run_review(set_id: &str, learning_only: bool) -> Result<()> {
    let mut store = open_store().await?;

    let mode = if learning_only {
        ReviewMode::LearningOnly
    } else {
        ReviewMode::All
    };

    let mut session = ReviewSession::new();
    let total = match session.start(&store, set_id, mode) {
        Ok(total) => total,
        Err(ReviewError::EmptyQueue) => {
            println!("Nothing to review in this set.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Reviewing {} cards. Enter reveals, q quits.", total);
    println!();

    let stdin = io::stdin();
    let mut line = String::new();
    let mut learned = 0usize;

    loop {
        let card = match session.current_card(&store) {
            Some(card) => card.clone(),
            None => break,
        };
        let (position, _) = session.position().unwrap_or((0, total));

        let descriptor = card
            .part_of_speech
            .as_deref()
            .or(card.level.as_deref())
            .unwrap_or("-");
        println!("[{}/{}] {} ({})", position + 1, total, card.word, descriptor);

        print!("  ...");
        io::stdout().flush()?;
        line.clear();
        stdin.lock().read_line(&mut line)?;
        if line.trim().eq_ignore_ascii_case("q") {
            session.cancel();
            println!("Session abandoned.");
            return Ok(());
        }

        println!("  {}", card.translation);
        if !card.example.is_empty() {
            println!("  \"{}\"", card.example);
        }

        print!("  Got it? [y]es / [n]ot yet / [q]uit: ");
        io::stdout().flush()?;
        line.clear();
        stdin.lock().read_line(&mut line)?;

        let outcome = match line.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                learned += 1;
                ReviewOutcome::Learned
            }
            "q" | "quit" => {
                session.cancel();
                println!("Session abandoned.");
                return Ok(());
            }
            _ => ReviewOutcome::Learning,
        };

        match session.record_outcome(&mut store, outcome).await? {
            ReviewProgress::Completed => break,
            ReviewProgress::Next { .. } => println!(),
        }
    }

    println!();
    println!("Done: {} of {} marked learned.", learned, total);
    Ok(())
}
