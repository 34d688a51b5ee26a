//! Satchel CLI - a plain-text study assistant with coin rewards.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use satchel::{Assistant, SubjectProgress, TaskEntry, TaskProgress, TaskStatus, SKIP_COST};
use std::fs;
use std::path::{Path, PathBuf};

mod cli;
mod menu;

use cli::{Cli, Command, SyllabusAction};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("satchel")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("satchel.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_store_dir(cli: &Cli) -> PathBuf {
    cli.dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn open_assistant(store_dir: &Path) -> Result<Assistant> {
    let assistant = Assistant::open(store_dir).context("Failed to open record directory")?;
    assistant.bootstrap().context("Failed to initialize records")?;
    Ok(assistant)
}

/// One-shot commands need a finished signup; sessions run it themselves.
fn open_signed_up(store_dir: &Path) -> Result<Assistant> {
    let assistant = open_assistant(store_dir)?;
    if assistant.profile()?.is_none() {
        eyre::bail!("no profile found; run `satchel init` first");
    }
    Ok(assistant)
}

pub(crate) fn print_entries(entries: &[TaskEntry]) {
    if entries.is_empty() {
        println!("{}", "No tasks yet".dimmed());
        return;
    }
    for (position, entry) in entries.iter().enumerate() {
        let line = entry.encode();
        match entry.status_token() {
            Some(TaskStatus::Completed) => println!("{}. {}", position + 1, line.green()),
            Some(TaskStatus::Pending) => println!("{}. {}", position + 1, line),
            None => println!("{}. {}", position + 1, line.dimmed()),
        }
    }
}

pub(crate) fn print_progress(progress: &TaskProgress) {
    println!("{} Done: {}", "✓".green(), progress.done);
    println!("{} Pending: {}", "→".blue(), progress.pending);
    println!("Completion: {:.2} %", progress.percent);
}

pub(crate) fn print_subjects(subjects: &[SubjectProgress]) {
    if subjects.is_empty() {
        println!("{}", "No subjects recorded yet".dimmed());
        return;
    }
    for subject in subjects {
        println!(
            "{} {:.2} % ({} of {} chapters)",
            format!("{}:", subject.subject).bold(),
            subject.percentage(),
            subject.covered_chapters,
            subject.total_chapters
        );
    }
}

fn subjects_as_json(subjects: &[SubjectProgress]) -> Result<String> {
    let rows: Vec<serde_json::Value> = subjects
        .iter()
        .map(|s| {
            serde_json::json!({
                "subject": s.subject,
                "total_chapters": s.total_chapters,
                "covered_chapters": s.covered_chapters,
                "percentage": s.percentage(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("Failed to serialize subjects")
}

fn run(cli: Cli) -> Result<()> {
    let store_dir = get_store_dir(&cli);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Init => {
            let assistant = open_assistant(&store_dir)?;
            let created = menu::signup(&assistant)?;
            if created {
                println!(
                    "{} Signup complete. Run `satchel` to start a session.",
                    "✓".green()
                );
            } else {
                println!("{} Already signed up", "✓".green());
            }
        }

        Command::Menu => {
            let assistant = open_assistant(&store_dir)?;
            menu::signup(&assistant)?;
            menu::run_session(&assistant)?;
        }

        Command::Status => {
            let assistant = open_signed_up(&store_dir)?;
            let report = assistant.load().context("Failed to load records")?;

            if report.pruned > 0 {
                println!(
                    "{} Cleared {} stale completed task(s)",
                    "✓".green(),
                    report.pruned
                );
            }
            println!("🪙 {} coins", report.balance);
            let progress = assistant.progress()?;
            print_progress(&progress);
        }

        Command::Add { subject, title } => {
            let assistant = open_signed_up(&store_dir)?;
            let task = assistant
                .add_task(&subject, &title)
                .context("Failed to add task")?;
            println!("{} Added: {}", "✓".green(), task.encode());
        }

        Command::List { json } => {
            let assistant = open_signed_up(&store_dir)?;
            let entries = assistant.list_tasks().context("Failed to list tasks")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_entries(&entries);
            }
        }

        Command::Done { number } => {
            let assistant = open_signed_up(&store_dir)?;
            let done = assistant
                .complete_task(number)
                .context("Failed to complete task")?;
            println!("{} Done: {}", "✓".green(), done.task.title);
            println!(
                "🪙 You earned {} coins! Balance: {}",
                done.coins_earned, done.balance
            );
        }

        Command::Progress { json } => {
            let assistant = open_signed_up(&store_dir)?;
            let progress = assistant.progress().context("Failed to read progress")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                print_progress(&progress);
            }
        }

        Command::Skip { number } => {
            let assistant = open_signed_up(&store_dir)?;
            let balance = assistant.skip_task(number).context("Failed to skip task")?;
            println!(
                "{} Skipped task {} for {} coins (balance: {})",
                "✓".green(),
                number,
                SKIP_COST,
                balance
            );
        }

        Command::Syllabus { action } => {
            let assistant = open_signed_up(&store_dir)?;
            match action {
                SyllabusAction::Add { name, chapters } => {
                    assistant.initialize_syllabus()?;
                    let subject = assistant
                        .add_subject(&name, chapters)
                        .context("Failed to add subject")?;
                    println!(
                        "{} Added {} ({} chapters)",
                        "✓".green(),
                        subject.subject.cyan(),
                        subject.total_chapters
                    );
                }
                SyllabusAction::Covered { name, chapters } => {
                    let subject = assistant
                        .set_covered(&name, chapters)
                        .context("Failed to update subject")?;
                    println!(
                        "{} {} now at {}/{} chapters ({:.2} %)",
                        "✓".green(),
                        subject.subject.cyan(),
                        subject.covered_chapters,
                        subject.total_chapters,
                        subject.percentage()
                    );
                }
                SyllabusAction::List { json } => {
                    let subjects = assistant.subjects().context("Failed to list subjects")?;
                    if json {
                        println!("{}", subjects_as_json(&subjects)?);
                    } else {
                        print_subjects(&subjects);
                    }
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
