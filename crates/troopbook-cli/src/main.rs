//! troopbook - command-line front end for the troop schedule.
//!
//! Browse, add, edit and remove scheduled events, and record which members
//! attended. All rules live in `troopbook-core`; this binary handles input,
//! confirmation prompts and printing.

mod output;

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use troopbook_core::models::attendance;
use troopbook_core::{
    Branch, Config, Confirmation, EventCandidate, EventChanges, EventFilter, EventIdentity,
    EventSortColumn, MemberId, Workspace,
};

#[derive(Parser)]
#[command(name = "troopbook", version, about = "Troop schedule and attendance")]
struct Cli {
    /// Schedule store base URL (overrides config and TROOPBOOK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List scheduled events
    List {
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Only troop-wide and highlighted-branch events
        #[arg(long)]
        highlighted: bool,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long)]
        desc: bool,
    },
    /// Show one event and its attendance
    Show { name: String, date: String },
    /// Add an event
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        branch: String,
        #[arg(long = "type", default_value = "")]
        event_type: String,
    },
    /// Edit an event
    Edit {
        name: String,
        date: String,
        #[arg(long = "new-name")]
        new_name: Option<String>,
        #[arg(long = "new-date")]
        new_date: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long = "type")]
        event_type: Option<String>,
    },
    /// Remove an event
    Remove {
        name: String,
        date: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Record who attended an event (replaces any earlier record)
    Attend {
        name: String,
        date: String,
        /// Member ids present at the event
        members: Vec<String>,
    },
    /// List the member roster
    Members,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Date,
    Branch,
}

impl From<SortArg> for EventSortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => EventSortColumn::Name,
            SortArg::Date => EventSortColumn::Date,
            SortArg::Branch => EventSortColumn::Branch,
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_base_url = Some(url);
    }
    info!(api = config.api_base_url(), "troopbook starting");

    let mut workspace = Workspace::connect(&config)?;
    run(&mut workspace, &config, cli.command).await
}

async fn run(workspace: &mut Workspace, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::List {
            branch,
            search,
            highlighted,
            sort,
            desc,
        } => {
            workspace.schedule.load().await?;
            let filter = EventFilter {
                branch: branch.as_deref().map(Branch::parse),
                search,
                highlighted_only: highlighted,
            };
            let rows = workspace
                .rows(&filter, sort.map(|s| (s.into(), !desc)))
                .await;
            output::print_schedule(config.schedule_title(), &rows);
        }
        Command::Show { name, date } => {
            let identity = EventIdentity::parse(&name, &date)?;
            workspace.open().await?;
            let event = workspace
                .schedule
                .find(&identity)
                .await
                .ok_or_else(|| troopbook_core::ScheduleError::NotFound(identity.clone()))?;
            let roster = workspace.roster.members().await;
            output::print_event(&event, &attendance::checklist(&event, &roster));
        }
        Command::Add {
            name,
            date,
            branch,
            event_type,
        } => {
            workspace.schedule.load().await?;
            let candidate = EventCandidate::new(name, date)
                .branch(branch)
                .event_type(event_type);
            let events = workspace.schedule.create(&candidate).await?;
            println!("Added. The schedule now has {} events.", events.len());
        }
        Command::Edit {
            name,
            date,
            new_name,
            new_date,
            branch,
            event_type,
        } => {
            let identity = EventIdentity::parse(&name, &date)?;
            let changes = EventChanges {
                name: new_name,
                date: new_date,
                branch,
                event_type,
            };
            if changes.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            workspace.schedule.load().await?;
            workspace.schedule.update(&identity, &changes).await?;
            println!("Updated {}.", changes.resulting_identity(&identity)?);
        }
        Command::Remove { name, date, yes } => {
            let identity = EventIdentity::parse(&name, &date)?;
            workspace.schedule.load().await?;
            let confirmation = if yes {
                Confirmation::Confirmed
            } else {
                confirm(&format!("Are you sure you want to delete {}?", identity.name))?
            };
            if confirmation == Confirmation::Unconfirmed {
                println!("Cancelled.");
                return Ok(());
            }
            let events = workspace.remove_event(&identity, confirmation).await?;
            println!("Removed. The schedule now has {} events.", events.len());
        }
        Command::Attend {
            name,
            date,
            members,
        } => {
            let identity = EventIdentity::parse(&name, &date)?;
            let present: BTreeSet<MemberId> = members.into_iter().map(MemberId::new).collect();
            workspace.open().await?;
            let events = workspace.record_attendance(&identity, &present).await?;
            if let Some(event) = events.iter().find(|e| e.has_identity(&identity)) {
                println!("Recorded {} attendees for {}.", event.attendance_count(), identity);
            }
        }
        Command::Members => {
            let members = workspace.roster.list().await?;
            output::print_members(&members);
        }
    }
    Ok(())
}

/// Ask a yes/no question on the terminal; anything but "y"/"yes" declines.
fn confirm(prompt: &str) -> Result<Confirmation> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(Confirmation::from(
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"),
    ))
}
