//! Some utility functions

use std::io::{stdin, stdout, Write};

use crate::calendar::MonthGrid;
use crate::task::Task;
use crate::view::{Board, IndexedTask, Partition};

/// A debug utility that pretty-prints a task
pub fn print_task(item: &IndexedTask) {
    let task = &item.task;
    let completion = if task.completed() { "✓" } else { " " };
    let deadline = task.deadline()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    println!("    {} [{:>3}] {:<6} {} {}", completion, item.index, task.priority(), deadline, task.name());
    if let Some(details) = task.details() {
        println!("                             {}", details);
    }
}

/// A debug utility that pretty-prints the three lists of a board
pub fn print_partition(partition: &Partition<IndexedTask>) {
    let sections: [(&str, &[IndexedTask]); 3] = [
        ("TODAY", partition.today.as_slice()),
        ("PENDING", partition.pending.as_slice()),
        ("COMPLETED", partition.completed.as_slice()),
    ];
    for (title, tasks) in sections.iter() {
        println!("{} ({})", title, tasks.len());
        for item in tasks.iter() {
            print_task(item);
        }
    }
}

pub fn print_board(board: &Board) {
    match board {
        Board::Tasks(partition) => print_partition(partition),
        Board::Error(message) => println!("!! {}", message),
    }
}

/// A debug utility that pretty-prints a month, with a marker per priority on the days that have tasks
pub fn print_calendar(grid: &MonthGrid) {
    println!("        {:04}-{:02}", grid.year(), grid.month());
    println!(" Mo   Tu   We   Th   Fr   Sa   Su");
    for week in grid.weeks() {
        let line: Vec<String> = week.iter()
            .map(|day| {
                let number = if day.in_month {
                    format!("{:>2}", chrono::Datelike::day(&day.date))
                } else {
                    " .".to_string()
                };
                let marks: String = day.marks.priorities().iter()
                    .map(|p| match p {
                        crate::task::Priority::High => '!',
                        crate::task::Priority::Medium => '+',
                        crate::task::Priority::Low => '-',
                    })
                    .collect();
                format!("{}{:<3}", number, marks)
            })
            .collect();
        println!("{}", line.join(""));
    }
}

/// Ask the user to confirm the deletion of a task
pub fn confirm_deletion(task: &Task) -> bool {
    let mut stdout = stdout();
    if write!(stdout, "Delete {:?}? [y/N] ", task.name()).is_err() || stdout.flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
