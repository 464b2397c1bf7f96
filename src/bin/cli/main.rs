mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "study-cli", about = "Study tracker CLI", version)]
struct Cli {
    /// Config file (default: <config dir>/study-tracker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sign-in email (overrides the config file)
    #[arg(long, global = true)]
    email: Option<String>,

    /// Sign-in password
    #[arg(long, global = true, env = "STUDY_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Progress summary
    Dashboard,

    /// List modules grouped by semester
    Modules {
        /// Upcoming, "In Progress", Completed or all
        #[arg(long, default_value = "all")]
        status: String,
        /// Easy, Medium, Hard, Custom or all
        #[arg(long, default_value = "all")]
        difficulty: String,
        /// Level number (e.g. 5) or all
        #[arg(long, default_value = "all")]
        level: String,
    },

    /// Show one module with its files and links
    Show {
        /// Module id (case-insensitive prefix match)
        module: String,
    },

    /// Change a module's status
    SetStatus {
        module: String,
        /// Upcoming, "In Progress" or Completed
        status: String,
    },

    /// Set or clear a module's final assessment month
    SetDate {
        module: String,
        /// YYYY-MM, or "none" to clear
        date: String,
    },

    /// Manage a module's links
    #[command(subcommand)]
    Link(LinkCommand),

    /// Manage a module's files
    #[command(subcommand)]
    File(FileCommand),

    /// Manage a module's flashcards
    #[command(subcommand)]
    Cards(CardsCommand),

    /// Review flashcards of one or more modules
    Review {
        /// Module ids, reviewed in the order given
        #[arg(required = true)]
        modules: Vec<String>,
    },

    /// Assessments and revision periods
    Timeline {
        /// Reference date for revision periods (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Run a pomodoro countdown in the terminal
    Pomodoro {
        /// Start with a break instead of work
        #[arg(long = "break")]
        start_with_break: bool,
        /// Work/break periods to run before exiting
        #[arg(long, default_value = "1")]
        periods: u32,
    },
}

#[derive(Subcommand)]
enum LinkCommand {
    /// Attach a link
    Add {
        module: String,
        url: String,
        /// Display title
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Remove a link by URL
    Rm { module: String, url: String },
}

#[derive(Subcommand)]
enum FileCommand {
    /// Upload a local file
    Upload {
        module: String,
        path: PathBuf,
        /// Name to store it under (default: the file's name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete an attached file by name
    Rm { module: String, name: String },
    /// List attached files and stored blobs
    Ls { module: String },
}

#[derive(Subcommand)]
enum CardsCommand {
    /// List flashcards
    Ls { module: String },
    /// Add a flashcard
    Add {
        module: String,
        question: String,
        answer: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let options = app::ConnectOptions {
        config: cli.config,
        email: cli.email,
        password: cli.password,
    };

    match cli.command {
        Command::Pomodoro { start_with_break, periods } => {
            commands::pomodoro::run(start_with_break, periods, use_color).await?;
        }
        Command::Dashboard => {
            let app = app::App::connect(&options).await?;
            commands::dashboard::run(&app, &cli.format, use_color)?;
        }
        Command::Modules { status, difficulty, level } => {
            let app = app::App::connect(&options).await?;
            let spec = commands::modules::parse_filters(&status, &difficulty, &level)?;
            commands::modules::run(&app, &spec, &cli.format, use_color)?;
        }
        Command::Show { module } => {
            let app = app::App::connect(&options).await?;
            commands::show::run(&app, &module, &cli.format, use_color)?;
        }
        Command::SetStatus { module, status } => {
            let mut app = app::App::connect(&options).await?;
            commands::edit::run_set_status(&mut app, &module, &status, &cli.format).await?;
        }
        Command::SetDate { module, date } => {
            let mut app = app::App::connect(&options).await?;
            commands::edit::run_set_date(&mut app, &module, &date, &cli.format).await?;
        }
        Command::Link(subcmd) => {
            let mut app = app::App::connect(&options).await?;
            match subcmd {
                LinkCommand::Add { module, url, title } => {
                    commands::links::run_add(&mut app, &module, &title, &url, &cli.format).await?;
                }
                LinkCommand::Rm { module, url } => {
                    commands::links::run_rm(&mut app, &module, &url, &cli.format).await?;
                }
            }
        }
        Command::File(subcmd) => {
            let mut app = app::App::connect(&options).await?;
            match subcmd {
                FileCommand::Upload { module, path, name } => {
                    commands::files::run_upload(&mut app, &module, &path, name.as_deref(), &cli.format)
                        .await?;
                }
                FileCommand::Rm { module, name } => {
                    commands::files::run_rm(&mut app, &module, &name, &cli.format).await?;
                }
                FileCommand::Ls { module } => {
                    commands::files::run_ls(&app, &module, &cli.format).await?;
                }
            }
        }
        Command::Cards(subcmd) => {
            let app = app::App::connect(&options).await?;
            match subcmd {
                CardsCommand::Ls { module } => {
                    commands::cards::run_ls(&app, &module, &cli.format).await?;
                }
                CardsCommand::Add { module, question, answer } => {
                    commands::cards::run_add(&app, &module, &question, &answer, &cli.format).await?;
                }
            }
        }
        Command::Review { modules } => {
            let app = app::App::connect(&options).await?;
            commands::review::run(&app, &modules, use_color).await?;
        }
        Command::Timeline { today } => {
            let app = app::App::connect(&options).await?;
            commands::timeline::run(&app, today.as_deref(), &cli.format, use_color)?;
        }
    }

    Ok(())
}
