use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use task_desk::cache::LocalStorage;
use task_desk::client::Client;
use task_desk::{Bucket, Priority, SortMethod, TaskDraft, TaskIndex, ViewError, ViewModel};

/// Manage the tasks of a task server from the command line
#[derive(Parser)]
#[command(name = "task-desk", version)]
struct Cli {
    /// Base URL of the task server
    #[arg(long)]
    api_url: Option<String>,
    /// File where the "today" list is stored
    #[arg(long)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the today, pending and completed lists
    List {
        #[arg(long, default_value = "priority")]
        sort: SortMethod,
    },
    /// Create a task
    Add {
        name: String,
        #[arg(long, default_value = "Low")]
        priority: Priority,
        /// Deadline, as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Change a task. Fields that are not given are kept
    Edit {
        index: TaskIndex,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        no_deadline: bool,
        #[arg(long)]
        details: Option<String>,
    },
    /// Mark a task as completed
    Complete { index: TaskIndex },
    /// Delete a task
    Delete {
        index: TaskIndex,
        /// Do not ask for a confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Move a task to the today list
    Today { index: TaskIndex },
    /// Move a task back to the pending list
    Untoday { index: TaskIndex },
    /// Show a month, with the days tasks are due on
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// List the tasks due on a day
    Day { date: NaiveDate },
}


#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(url) = &cli.api_url {
        task_desk::config::set_api_url(url);
    }
    if let Some(path) = &cli.storage {
        task_desk::config::set_storage_file(path);
    }

    let client = match Client::from_config() {
        Ok(c) => c,
        Err(err) => {
            eprintln!("Invalid server URL {:?}: {}", task_desk::config::api_url(), err);
            std::process::exit(2);
        }
    };
    let storage = LocalStorage::from_config();
    let mut view = ViewModel::new(client, storage);

    if let Err(err) = run(&mut view, cli.command.unwrap_or(Command::List{ sort: SortMethod::default() })).await {
        log::error!("{}", err);
        eprintln!("{}", err.notice());
        std::process::exit(1);
    }
}

async fn run(view: &mut ViewModel<Client, LocalStorage>, command: Command) -> Result<(), ViewError> {
    view.refresh().await?;

    match command {
        Command::List{ sort } => {
            view.set_sort(sort);
        },
        Command::Add{ name, priority, deadline, details } => {
            let mut form = TaskDraft { name, priority, deadline, details };
            let task = view.add(&mut form).await?;
            println!("Added {:?}", task.name());
        },
        Command::Edit{ index, name, priority, deadline, no_deadline, details } => {
            let mut draft = view.task_at(index)?.to_draft();
            if let Some(name) = name { draft.name = name; }
            if let Some(priority) = priority { draft.priority = priority; }
            if let Some(deadline) = deadline { draft.deadline = Some(deadline); }
            if no_deadline { draft.deadline = None; }
            if let Some(details) = details { draft.details = Some(details); }
            let task = view.update(index, &draft).await?;
            println!("Updated {:?}", task.name());
        },
        Command::Complete{ index } => {
            view.complete(index).await?;
        },
        Command::Delete{ index, yes } => {
            let deleted = if yes {
                view.delete(index, |_: &task_desk::Task| true).await?
            } else {
                view.delete(index, task_desk::utils::confirm_deletion).await?
            };
            if deleted == false {
                println!("Nothing deleted");
            }
        },
        Command::Today{ index } => {
            if view.move_task(index, Bucket::Pending, Bucket::Today).await? == false {
                println!("Task {} is not in the pending list", index);
            }
        },
        Command::Untoday{ index } => {
            if view.move_task(index, Bucket::Today, Bucket::Pending).await? == false {
                println!("Task {} is not in the today list", index);
            }
        },
        Command::Calendar{ year, month } => {
            let now = Local::now().date_naive();
            let year = year.unwrap_or_else(|| now.year());
            let month = month.unwrap_or_else(|| now.month());
            match view.calendar(year, month) {
                None => eprintln!("Invalid month {}-{}", year, month),
                Some(grid) => task_desk::utils::print_calendar(&grid),
            }
            return Ok(());
        },
        Command::Day{ date } => {
            let due = view.tasks_on(date);
            println!("{} task(s) due on {}", due.len(), date);
            for item in &due {
                task_desk::utils::print_task(item);
            }
            return Ok(());
        },
    }

    task_desk::utils::print_board(view.board());
    Ok(())
}
