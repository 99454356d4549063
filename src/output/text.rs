use colored::{ColoredString, Colorize};

use crate::models::{Status, Task, TaskType};

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for task in tasks {
        print_task_line(task);
    }
}

/// One-line summary: `id symbol icon title [labels]`.
pub fn print_task_line(task: &Task) {
    let mut line = format!(
        "{} {} {} {}",
        task.id.cyan(),
        paint_status(task.status, status_symbol(task.status)),
        kind_icon(task.kind),
        task.title,
    );
    if !task.labels.is_empty() {
        let labels = format!("[{}]", task.labels.join(", "));
        line.push(' ');
        line.push_str(&labels.bright_black().to_string());
    }
    println!("{line}");
}

pub fn print_task_detail(task: &Task) {
    println!("{} {}", task.id.cyan(), task.title);
    println!("{}", "─".repeat(40));

    println!(
        "Status:  {}",
        paint_status(
            task.status,
            &format!("{} {}", status_symbol(task.status), task.status)
        )
    );
    println!("Type:    {} {}", kind_icon(task.kind), task.kind);

    if task.labels.is_empty() {
        println!("Labels:  {}", "(none)".bright_black());
    } else {
        println!("Labels:  {}", task.labels.join(", "));
    }

    println!();
    match task.description.as_deref() {
        Some(description) if !description.is_empty() => {
            println!("Description:\n  {description}");
        }
        _ => println!("Description: {}", "(none)".bright_black()),
    }

    println!();
    println!(
        "{}",
        format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M:%S")).bright_black()
    );
    println!(
        "{}",
        format!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M:%S")).bright_black()
    );

    if !task.notes.is_empty() {
        println!();
        println!("Notes ({}):", task.notes.len());
        for note in &task.notes {
            println!(
                "  {} {}",
                format!("[{}]", note.created_at.format("%Y-%m-%d %H:%M")).bright_black(),
                note.content
            );
        }
    }
}

fn status_symbol(status: Status) -> &'static str {
    match status {
        Status::Todo => "○",
        Status::Progress => "◐",
        Status::Blocked => "✕",
        Status::Abandon => "⊘",
        Status::Done => "●",
    }
}

fn paint_status(status: Status, text: &str) -> ColoredString {
    match status {
        Status::Todo => text.yellow(),
        Status::Progress => text.blue(),
        Status::Blocked => text.red(),
        Status::Abandon => text.bright_black(),
        Status::Done => text.green(),
    }
}

fn kind_icon(kind: TaskType) -> &'static str {
    match kind {
        TaskType::Task => "📋",
        TaskType::Bug => "🐛",
        TaskType::Feature => "✨",
    }
}
