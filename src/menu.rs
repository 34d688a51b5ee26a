//! Interactive menu session and first-run signup.
//!
//! Thin prompt layer over the engine: every choice is parsed, retried on
//! bad input, and handed over as an already-validated value. Operation
//! errors print and return to the menu; only broken stdin ends the session.

use colored::*;
use eyre::{Context, Result};
use satchel::{Assistant, SyllabusError, SKIP_COST};
use std::io::{self, Write};

/// Run whatever first-run setup is still missing: the profile, then the
/// subject records. Returns true when anything was created.
pub fn signup(assistant: &Assistant) -> Result<bool> {
    let mut created = false;

    if assistant.profile()?.is_none() {
        println!("Signup to save your tasks and progress\n");
        let name = loop {
            let name = prompt("Enter your name: ")?;
            if !name.is_empty() {
                break name;
            }
            println!("Kindly enter a name.");
        };
        let class_level = prompt_u32("In which class are you studying: ")?;
        assistant.create_profile(&name, class_level)?;
        created = true;
    }

    if !assistant.syllabus_initialized() {
        assistant.initialize_syllabus()?;
        let count = prompt_u32("\nHow many subjects do you have? ")?;
        for slot in 1..=count {
            loop {
                let subject = prompt(&format!("Enter subject {}: ", slot))?;
                let chapters =
                    prompt_u32(&format!("Enter the number of chapters in {}: ", subject))?;
                match assistant.add_subject(&subject, chapters) {
                    Ok(_) => break,
                    Err(e) if is_duplicate(&e) => {
                        println!("You have already given this subject");
                        break;
                    }
                    Err(e) => println!("{} {}", "✗".red(), e),
                }
            }
        }
        created = true;
    }

    Ok(created)
}

/// The main menu loop.
pub fn run_session(assistant: &Assistant) -> Result<()> {
    println!("📚 Welcome to Study Assistant");

    let report = assistant.load().context("Failed to load records")?;
    if report.pruned > 0 {
        println!("🧹 Cleared {} stale completed task(s)", report.pruned);
    }
    println!(
        "\n📂 Tasks and syllabus loaded.\n🪙 You currently have {} coins.",
        report.balance
    );

    println!("\n============ Main Menu ============\n");
    let items = [
        "➕ Add Task",
        "📋 View Tasks",
        "✅ Mark Task as Done",
        "📊 Show Task Progress",
        "⛷️ Skip a Task",
        "📘 Syllabus Tracker",
        "💾 Save & Exit",
    ];
    for (position, item) in items.iter().enumerate() {
        println!("{}. {}", position + 1, item);
    }
    println!("\n===================================");

    loop {
        match prompt_u32("\nChoose an option: ")? {
            1 => add_task(assistant)?,
            2 => {
                view_tasks(assistant)?;
            }
            3 => mark_done(assistant)?,
            4 => show_progress(assistant)?,
            5 => skip_task(assistant)?,
            6 => syllabus_tracker(assistant)?,
            7 => {
                println!("\n📁 Tasks saved.\n👋 Goodbye! Stay productive.");
                break;
            }
            _ => println!("Kindly enter a valid number."),
        }
    }

    Ok(())
}

fn add_task(assistant: &Assistant) -> Result<()> {
    let subject = prompt("\nSubject: ")?;
    let title = prompt("Task title: ")?;
    match assistant.add_task(&subject, &title) {
        Ok(task) => {
            println!("Due Date (YYYY-MM-DD): {}", task.due);
            println!("\n✅ Task added successfully!");
        }
        Err(e) => println!("{} {}", "✗".red(), e),
    }
    Ok(())
}

fn view_tasks(assistant: &Assistant) -> Result<bool> {
    let entries = assistant.list_tasks()?;
    if entries.is_empty() {
        println!("{}", "No tasks yet".dimmed());
        return Ok(false);
    }
    println!("\n📋 Your Tasks:\n");
    crate::print_entries(&entries);
    Ok(true)
}

fn mark_done(assistant: &Assistant) -> Result<()> {
    println!("Which task would you like to mark as done?");
    if !view_tasks(assistant)? {
        return Ok(());
    }
    let number = prompt_u32("\nEnter the task number to mark as done: ")? as usize;
    match assistant.complete_task(number) {
        Ok(done) => {
            println!("\n✅ Task marked as completed.");
            println!("🎉 You earned {} coins!", done.coins_earned);
            println!("Current Balance: {} coins", done.balance);
        }
        Err(e) => println!("{} {}", "✗".red(), e),
    }
    Ok(())
}

fn show_progress(assistant: &Assistant) -> Result<()> {
    println!("\n📊 Task Progress:");
    let progress = assistant.progress()?;
    crate::print_progress(&progress);
    Ok(())
}

fn skip_task(assistant: &Assistant) -> Result<()> {
    if !view_tasks(assistant)? {
        return Ok(());
    }
    println!("\n🪙 Coins required to skip a task: {}", SKIP_COST);
    let number = prompt_u32("Enter the task number to skip: ")? as usize;
    match assistant.skip_task(number) {
        Ok(balance) => println!("✅ Task skipped\nCurrent Balance: {}", balance),
        Err(e) => println!("{} {}", "✗".red(), e),
    }
    Ok(())
}

fn syllabus_tracker(assistant: &Assistant) -> Result<()> {
    println!("\n📘 Welcome to Syllabus Tracker\n");
    let options = [
        "✅ Mark Chapters as Covered",
        "📊 Show Progress",
        "🔙 Back to Main Menu",
    ];
    for (position, option) in options.iter().enumerate() {
        println!("{}. {}", position + 1, option);
    }

    loop {
        match prompt_u32("\nChoose: ")? {
            1 => {
                let subject = prompt("Choose Subject: ")?;
                let covered = prompt_u32("Chapters completed now: ")?;
                match assistant.set_covered(&subject, covered) {
                    Ok(updated) => println!(
                        "✅ Updated! You've now completed {}/{} chapters.",
                        updated.covered_chapters, updated.total_chapters
                    ),
                    Err(e) => println!("{} {}", "✗".red(), e),
                }
            }
            2 => {
                println!("\n📚 Syllabus Progress:\n");
                let subjects = assistant.subjects()?;
                crate::print_subjects(&subjects);
            }
            3 => break,
            _ => println!("Kindly enter a valid number."),
        }
    }

    Ok(())
}

fn is_duplicate(err: &eyre::Report) -> bool {
    matches!(
        err.downcast_ref::<SyllabusError>(),
        Some(SyllabusError::DuplicateSubject(_))
    )
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    if read == 0 {
        eyre::bail!("input ended");
    }
    Ok(line.trim().to_string())
}

fn prompt_u32(message: &str) -> Result<u32> {
    loop {
        let raw = prompt(message)?;
        match raw.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Kindly enter a valid number."),
        }
    }
}
