//! Integration tests for the core assistant workflows.
//!
//! Covers the task lifecycle, the coin economy, and syllabus tracking the
//! way a real session would drive them.

mod common;

use common::TestEnv;
use satchel::{TaskStatus, MAX_REWARD, MIN_REWARD, SKIP_COST};

// =============================================================================
// Task Lifecycle
// =============================================================================

#[test]
fn test_added_task_is_pending_and_due_today() {
    let env = TestEnv::new();
    let task = env.assistant.add_task("Math", "Algebra homework").unwrap();

    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.due, chrono::Local::now().date_naive());

    let entries = env.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].as_task().unwrap(), &task);
}

#[test]
fn test_stored_line_format() {
    let env = TestEnv::new();
    let task = env.assistant.add_task("Math", "Algebra homework").unwrap();

    let expected = format!(
        "[🕒] Algebra homework (Math) - Due: {}\n",
        task.due.format("%Y-%m-%d")
    );
    assert_eq!(env.raw_task_record(), expected);
}

#[test]
fn test_complete_swaps_marker_and_moves_last() {
    let env = TestEnv::new();
    env.add_task("Math", "First");
    env.add_task("Physics", "Second");

    let done = env.assistant.complete_task(1).unwrap();
    assert_eq!(done.task.title, "First");
    assert_eq!(done.task.status, TaskStatus::Completed);

    let raw = env.raw_task_record();
    let lines: Vec<&str> = raw.lines().collect();
    assert!(lines[0].starts_with("[🕒] Second"));
    assert!(lines[1].starts_with("[✅] First"));
}

#[test]
fn test_full_lifecycle_add_complete_prune() {
    let env = TestEnv::new();
    env.add_task("Math", "Chapter 4 problems");
    env.complete_task(1);

    // Today's completion survives the next load untouched.
    let report = env.assistant.load().unwrap();
    assert_eq!(report.pruned, 0);

    // A stale completion from an earlier session is cleared.
    env.write_task_lines(&["[✅] Ancient (Math) - Due: 2020-01-01"]);
    let report = env.assistant.load().unwrap();
    assert_eq!(report.pruned, 1);
    assert!(env.entries().is_empty());
}

// =============================================================================
// Coin Economy
// =============================================================================

#[test]
fn test_completion_reward_lands_on_balance() {
    let env = TestEnv::new();
    env.add_task("Math", "Worksheet");

    let done = env.assistant.complete_task(1).unwrap();
    assert!(done.coins_earned % 5 == 0);
    assert!((MIN_REWARD..=MAX_REWARD).contains(&done.coins_earned));
    assert_eq!(done.balance, done.coins_earned);
    assert_eq!(env.balance(), done.coins_earned);
}

#[test]
fn test_every_reward_is_a_multiple_of_five() {
    let env = TestEnv::new();
    for i in 0..20 {
        env.add_task("Math", &format!("Task {}", i));
    }
    for _ in 0..20 {
        let coins = env.complete_task(1);
        assert!(coins % 5 == 0);
        assert!((MIN_REWARD..=MAX_REWARD).contains(&coins));
    }
}

#[test]
fn test_skip_charges_flat_fee() {
    let env = TestEnv::new();
    env.set_balance(35);
    env.add_task("Math", "Unwanted");

    let balance = env.assistant.skip_task(1).unwrap();
    assert_eq!(balance, 35 - SKIP_COST);
    assert_eq!(env.balance(), 25);
    assert!(env.entries().is_empty());
}

#[test]
fn test_skip_exact_balance_reaches_zero() {
    let env = TestEnv::new();
    env.set_balance(SKIP_COST);
    env.add_task("Math", "Unwanted");

    let balance = env.assistant.skip_task(1).unwrap();
    assert_eq!(balance, 0);
    assert!(env.entries().is_empty());
}

#[test]
fn test_skip_removes_completed_entries_too() {
    let env = TestEnv::new();
    env.set_balance(50);
    env.add_task("Math", "Done one");
    env.complete_task(1);

    env.assistant.skip_task(1).unwrap();
    assert!(env.entries().is_empty());
}

// =============================================================================
// Progress
// =============================================================================

#[test]
fn test_progress_over_mixed_list() {
    let env = TestEnv::new();
    env.add_task("Math", "A");
    env.add_task("Math", "B");
    env.add_task("Math", "C");
    env.add_task("Math", "D");
    env.complete_task(1);

    let progress = env.assistant.progress().unwrap();
    assert_eq!(progress.done, 1);
    assert_eq!(progress.pending, 3);
    assert_eq!(progress.total, 4);
    assert!((progress.percent - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_progress_all_done_is_hundred() {
    let env = TestEnv::new();
    env.add_task("Math", "A");
    env.add_task("Math", "B");
    env.complete_task(1);
    env.complete_task(1);

    let progress = env.assistant.progress().unwrap();
    assert!((progress.percent - 100.0).abs() < f64::EPSILON);
}

// =============================================================================
// Syllabus
// =============================================================================

#[test]
fn test_syllabus_percentage() {
    let env = TestEnv::new();
    env.assistant.initialize_syllabus().unwrap();
    env.assistant.add_subject("Math", 20).unwrap();
    env.assistant.set_covered("Math", 5).unwrap();

    let subjects = env.assistant.subjects().unwrap();
    assert_eq!(subjects.len(), 1);
    assert!((subjects[0].percentage() - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_syllabus_covered_can_step_back() {
    let env = TestEnv::new();
    env.assistant.initialize_syllabus().unwrap();
    env.assistant.add_subject("Math", 20).unwrap();
    env.assistant.set_covered("Math", 12).unwrap();

    // The count is absolute, not additive.
    let subject = env.assistant.set_covered("Math", 3).unwrap();
    assert_eq!(subject.covered_chapters, 3);
}

#[test]
fn test_syllabus_listing_is_sorted() {
    let env = TestEnv::new();
    env.assistant.initialize_syllabus().unwrap();
    env.assistant.add_subject("Physics", 10).unwrap();
    env.assistant.add_subject("Biology", 8).unwrap();

    let names: Vec<String> = env
        .assistant
        .subjects()
        .unwrap()
        .into_iter()
        .map(|s| s.subject)
        .collect();
    assert_eq!(names, ["Biology", "Physics"]);
}

#[test]
fn test_subject_record_layout() {
    let env = TestEnv::new();
    env.assistant.initialize_syllabus().unwrap();
    env.assistant.add_subject("Math", 20).unwrap();
    env.assistant.set_covered("Math", 7).unwrap();

    let raw =
        std::fs::read_to_string(env.temp_dir.path().join("Subjects").join("Math.txt")).unwrap();
    assert_eq!(raw, "20\n7");
}

// =============================================================================
// Profile
// =============================================================================

#[test]
fn test_profile_round_trip() {
    let env = TestEnv::new();
    let created = env.assistant.create_profile("Asha", 9).unwrap();

    let read_back = env.assistant.profile().unwrap().unwrap();
    assert_eq!(read_back.name, "Asha");
    assert_eq!(read_back.class_level, 9);
    assert_eq!(read_back.signed_up, created.signed_up);
}

#[test]
fn test_profile_record_layout() {
    let env = TestEnv::new();
    let profile = env.assistant.create_profile("Asha", 9).unwrap();

    let raw = std::fs::read_to_string(env.temp_dir.path().join("User Info.txt")).unwrap();
    let expected = format!("Asha\n9\n{}\n", profile.signed_up.format("%Y-%m-%d"));
    assert_eq!(raw, expected);
}
