//! Headless driver for the project board.
//!
//! Mounts the board on an in-memory page and plays the user's part from line
//! commands on stdin.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use projboard_core::{App, BoardConfig, ProjectStatus};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "projboard", version, about = "Drive a project board from stdin")]
struct Cli {
    /// Board configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the board after every command that changes it
    #[arg(long)]
    echo: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Add {
        title: String,
        description: String,
        people: String,
    },
    Move {
        id: String,
        to: ProjectStatus,
    },
    Show,
    Dump,
    Alerts,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

        match verb.to_lowercase().as_str() {
            "add" => {
                let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
                let [title, description, people] = parts.as_slice() else {
                    bail!("usage: add <title> | <description> | <people>");
                };
                Ok(Self::Add {
                    title: title.to_string(),
                    description: description.to_string(),
                    people: people.to_string(),
                })
            }
            "move" => {
                let mut args = rest.split_whitespace();
                let (Some(id), Some(status), None) = (args.next(), args.next(), args.next())
                else {
                    bail!("usage: move <id-prefix> <active|finished>");
                };
                Ok(Self::Move {
                    id: id.to_string(),
                    to: status.parse()?,
                })
            }
            "show" => Ok(Self::Show),
            "dump" => Ok(Self::Dump),
            "alerts" => Ok(Self::Alerts),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(anyhow!("unknown command '{}', try 'help'", other)),
        }
    }
}

const HELP: &str = "\
commands:
  add <title> | <description> | <people>   submit the new-project form
  move <id-prefix> <active|finished>      drag a project onto a list
  show                                    print the board
  dump                                    print all projects as JSON
  alerts                                  print alerts raised so far
  help                                    this message
  quit                                    leave";

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Runs one command. Returns false when the session should end.
fn execute(app: &App, command: Command, echo: bool, out: &mut impl Write) -> Result<bool> {
    let changed = match command {
        Command::Add {
            title,
            description,
            people,
        } => {
            if app.submit_project(&title, &description, &people)? {
                writeln!(out, "added")?;
                true
            } else {
                for alert in app.dom().take_alerts() {
                    writeln!(out, "alert: {}", alert)?;
                }
                false
            }
        }
        Command::Move { id, to } => {
            let project = app
                .resolve_project(&id)
                .ok_or_else(|| anyhow!("no single project matches '{}'", id))?;
            if project.status == to {
                writeln!(out, "{} is already {}", project.title, to)?;
                false
            } else if app.drag_project(project.id, to)? {
                writeln!(out, "{} is {}", project.title, to)?;
                true
            } else {
                writeln!(out, "{} was not accepted by the {} list", project.title, to)?;
                false
            }
        }
        Command::Show => {
            write!(out, "{}", app.render_text()?)?;
            false
        }
        Command::Dump => {
            let json = serde_json::to_string_pretty(&app.store().projects())?;
            writeln!(out, "{}", json)?;
            false
        }
        Command::Alerts => {
            for alert in app.dom().alerts() {
                writeln!(out, "{}", alert)?;
            }
            false
        }
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            false
        }
        Command::Quit => return Ok(false),
    };

    if changed && echo {
        write!(out, "{}", app.render_text()?)?;
    }
    Ok(true)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BoardConfig::default(),
    };
    let app = App::with_default_page(config).context("failed to mount board")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let result = line
            .parse::<Command>()
            .and_then(|command| execute(&app, command, cli.echo, &mut stdout));
        match result {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => writeln!(stdout, "error: {:#}", err)?,
        }
    }
    Ok(())
}
