use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use study_tracker_lib::timeline::TimelineEvent;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, today: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let today = match today {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date {:?} (expected YYYY-MM-DD)", date))?,
        None => Local::now().date_naive(),
    };
    let events = app.study.state().timeline(today);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Plain => {
            if events.is_empty() {
                println!("Nothing scheduled.");
                return Ok(());
            }
            // Events sharing a period are printed under one header.
            let mut current = None;
            for event in by_period(&events) {
                if current != Some((event.start, event.end)) {
                    current = Some((event.start, event.end));
                    let header = format!(
                        "Revision {} → {} ({} days)",
                        event.start.format("%Y-%m-%d"),
                        event.end.format("%Y-%m-%d"),
                        (event.end - event.start).num_days() + 1,
                    );
                    println!();
                    println!("{}", terminal::paint(&header, Color::BOLD, use_color));
                }
                let module = &event.resource;
                let final_date = module.final_date.map(|d| d.to_string()).unwrap_or_default();
                println!(
                    "  {}  final {}",
                    terminal::paint(&module.name, terminal::status_color(module.status), use_color),
                    final_date,
                );
            }
        }
    }
    Ok(())
}

/// Events ordered by period start, keeping module order within a period
fn by_period(events: &[TimelineEvent]) -> Vec<&TimelineEvent> {
    let mut ordered: Vec<&TimelineEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.start);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_tracker_lib::catalog::default_modules;
    use study_tracker_lib::timeline::timeline_events;

    #[test]
    fn test_by_period_leaves_events_untouched() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let mut modules = default_modules();
        modules.reverse();
        let events = timeline_events(&modules, today);

        let ordered = by_period(&events);
        assert!(ordered.windows(2).all(|w| w[0].start <= w[1].start));
        assert_eq!(ordered.len(), events.len());
        // The input list keeps module order: the reversed registry puts a
        // 2028 module first.
        assert_eq!(events[0].resource.id, "CM3070");
        assert_eq!(ordered[0].start, today);
    }
}
