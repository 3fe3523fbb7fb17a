use std::io::Write;

use clap::{Parser, Subcommand, ValueEnum};
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::aggregate::Macro;
use crate::auth;
use crate::error::ApiError;
use crate::meals::dto::parse_day;
use crate::meals::{MealForm, MealType, MealUpdate};
use crate::render;
use crate::state::AppState;
use crate::views::{DashboardView, Goals, JournalView, StatsView, SubmitStatus};

#[derive(Parser, Debug)]
#[command(name = "macrotrack", author, version, about = "Personal nutrition tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MACROTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Meals and running total of one day
    Day {
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Record a meal
    Add {
        #[arg(long)]
        calories: String,
        #[arg(long)]
        proteins: String,
        #[arg(long)]
        carbohydrates: String,
        #[arg(long)]
        fats: String,
        #[arg(long)]
        fiber: String,
        /// breakfast, lunch, dinner or other
        #[arg(long)]
        meal_type: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Show a single meal
    Show { id: i64 },
    /// Change fields of a meal
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        calories: Option<f64>,
        #[arg(long)]
        proteins: Option<f64>,
        #[arg(long)]
        carbohydrates: Option<f64>,
        #[arg(long)]
        fats: Option<f64>,
        #[arg(long)]
        fiber: Option<f64>,
        #[arg(long, value_parser = parse_meal_type)]
        meal_type: Option<MealType>,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Delete a meal
    Delete { id: i64 },
    /// Server-side statistics of one day against daily goals
    Stats {
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Daily totals of one macro with rolling averages
    Dashboard {
        #[arg(long = "macro", value_enum, default_value_t = MacroArg::Calories)]
        nutrient: MacroArg,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MacroArg {
    Calories,
    Proteins,
    Carbohydrates,
    Fats,
    Fiber,
}

impl From<MacroArg> for Macro {
    fn from(arg: MacroArg) -> Self {
        match arg {
            MacroArg::Calories => Macro::Calories,
            MacroArg::Proteins => Macro::Proteins,
            MacroArg::Carbohydrates => Macro::Carbohydrates,
            MacroArg::Fats => Macro::Fats,
            MacroArg::Fiber => Macro::Fiber,
        }
    }
}

fn parse_date(s: &str) -> Result<Date, String> {
    parse_day(s).ok_or_else(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))
}

fn parse_meal_type(s: &str) -> Result<MealType, String> {
    s.parse()
}

/// How a command ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
    SessionExpired,
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Shows the session-expired prompt (or a bare error line) and logs out.
fn session_expired(state: &AppState, out: &mut impl Write) -> anyhow::Result<Outcome> {
    if state.config.expiry_prompt {
        writeln!(out, "{}", render::SESSION_EXPIRED)?;
    } else {
        eprintln!("error: session expired");
    }
    state.sessions.clear()?;
    Ok(Outcome::SessionExpired)
}

fn api_failure(
    state: &AppState,
    err: ApiError,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    if err.is_session_expired() {
        return session_expired(state, out);
    }
    eprintln!("{err}");
    Ok(Outcome::Failed)
}

pub async fn run(cli: Cli, state: &AppState) -> anyhow::Result<Outcome> {
    run_with_output(cli, state, &mut std::io::stdout()).await
}

/// Runs one command, writing rendered views to `out`. Diagnostics go to stderr.
pub async fn run_with_output(
    cli: Cli,
    state: &AppState,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    match cli.command {
        Command::Login { email, password } => {
            match auth::login(&state.api, &email, &password).await {
                Ok(session) => {
                    state.sessions.save(&session)?;
                    writeln!(out, "Logged in as {}", email.trim().to_lowercase())?;
                    Ok(Outcome::Done)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(Outcome::Failed)
                }
            }
        }
        Command::Logout => {
            state.sessions.clear()?;
            writeln!(out, "Logged out")?;
            Ok(Outcome::Done)
        }
        Command::Day { date } => {
            let session = state.session()?;
            let mut view = JournalView::new(date.unwrap_or_else(today));
            view.refresh(&state.api, &session).await;
            if view.meals().session_expired() {
                return session_expired(state, out);
            }
            writeln!(out, "{}", render::render_journal(&view.snapshot()))?;
            Ok(if view.meals().error().is_some() {
                Outcome::Failed
            } else {
                Outcome::Done
            })
        }
        Command::Add {
            calories,
            proteins,
            carbohydrates,
            fats,
            fiber,
            meal_type,
            name,
            description,
            date,
        } => {
            let session = state.session()?;
            let form = MealForm {
                calories,
                proteins,
                carbohydrates,
                fats,
                fiber,
                meal_type,
                name,
                description,
            };
            let mut view = JournalView::new(date.unwrap_or_else(today));
            let status = view.submit(&state.api, &session, form).await.clone();
            if view.meals().session_expired() {
                return session_expired(state, out);
            }
            writeln!(out, "{}", render::render_journal(&view.snapshot()))?;
            Ok(match status {
                SubmitStatus::Error(_) => Outcome::Failed,
                _ => Outcome::Done,
            })
        }
        Command::Show { id } => {
            let session = state.session()?;
            match state.api.get_meal(&session, id).await {
                Ok(meal) => {
                    writeln!(out, "{}", render::render_meal(&meal))?;
                    Ok(Outcome::Done)
                }
                Err(e) => api_failure(state, e, out),
            }
        }
        Command::Edit {
            id,
            name,
            description,
            calories,
            proteins,
            carbohydrates,
            fats,
            fiber,
            meal_type,
            date,
        } => {
            let update = MealUpdate {
                name,
                description,
                calories,
                proteins,
                carbohydrates,
                fats,
                fiber,
                meal_type,
                date: date.map(|d| d.midnight().assume_utc()),
            };
            if update.is_empty() {
                eprintln!("nothing to change");
                return Ok(Outcome::Failed);
            }
            let session = state.session()?;
            match state.api.update_meal(&session, id, &update).await {
                Ok(meal) => {
                    info!(id, "meal updated");
                    writeln!(out, "{}", render::render_meal(&meal))?;
                    Ok(Outcome::Done)
                }
                Err(e) => api_failure(state, e, out),
            }
        }
        Command::Delete { id } => {
            let session = state.session()?;
            match state.api.delete_meal(&session, id).await {
                Ok(()) => {
                    writeln!(out, "Meal #{id} deleted")?;
                    Ok(Outcome::Done)
                }
                Err(e) => api_failure(state, e, out),
            }
        }
        Command::Stats { date } => {
            let session = state.session()?;
            let mut view = StatsView::new(date.unwrap_or_else(today), Goals::default());
            view.refresh(&state.api, &session).await;
            if view.stats().session_expired() {
                return session_expired(state, out);
            }
            writeln!(out, "{}", render::render_stats(&view.snapshot()))?;
            Ok(if view.stats().error().is_some() {
                Outcome::Failed
            } else {
                Outcome::Done
            })
        }
        Command::Dashboard { nutrient } => {
            let session = state.session()?;
            let mut view = DashboardView::new(state.config.dashboard_days);
            view.select(nutrient.into());
            view.refresh(&state.api, &session).await;
            if view.meals().session_expired() {
                return session_expired(state, out);
            }
            writeln!(out, "{}", render::render_dashboard(&view.snapshot()))?;
            Ok(if view.meals().error().is_some() {
                Outcome::Failed
            } else {
                Outcome::Done
            })
        }
    }
}
