use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, MissedTickBehavior};

use study_tracker_lib::dashboard::{Pomodoro, PomodoroMode};

use crate::render::terminal::{self, Color};

/// Count down `periods` work/break periods, one line redrawn per second.
/// Ctrl-C stops early.
pub async fn run(start_with_break: bool, periods: u32, use_color: bool) -> Result<()> {
    let mut timer = Pomodoro::new();
    if start_with_break {
        timer.set_mode(PomodoroMode::Break);
    }
    timer.toggle();

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    let mut remaining = periods.max(1);

    loop {
        draw(&timer, use_color)?;
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Stopped.");
                return Ok(());
            }
        }

        if let Some(next) = timer.tick() {
            remaining -= 1;
            println!();
            println!("Time for {}!", next.to_string().to_lowercase());
            if remaining == 0 {
                return Ok(());
            }
            timer.toggle();
        }
    }
}

fn draw(timer: &Pomodoro, use_color: bool) -> Result<()> {
    let color = match timer.mode() {
        PomodoroMode::Work => Color::MAGENTA,
        PomodoroMode::Break => Color::CYAN,
    };
    let label = format!("{:<6}", timer.mode());
    print!("\r{} {}", terminal::paint(&label, color, use_color), timer);
    std::io::stdout().flush()?;
    Ok(())
}
