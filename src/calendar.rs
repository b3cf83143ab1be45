//! A month calendar, with the days on which tasks are due

use std::borrow::Borrow;
use std::convert::TryInto;

use bitflags::bitflags;
use chrono::{Datelike, Duration, NaiveDate};

use crate::task::{Priority, Task};
use crate::view::sort::{sort_by, SortMethod};

bitflags! {
    /// Which priorities are present among the tasks due on a day
    #[derive(Default)]
    pub struct PriorityMarks: u8 {
        const HIGH = 1;
        const MEDIUM = 2;
        const LOW = 4;
    }
}

impl From<Priority> for PriorityMarks {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => PriorityMarks::HIGH,
            Priority::Medium => PriorityMarks::MEDIUM,
            Priority::Low => PriorityMarks::LOW,
        }
    }
}

impl PriorityMarks {
    /// The marked priorities, most urgent first
    pub fn priorities(&self) -> Vec<Priority> {
        Priority::ALL.iter()
            .copied()
            .filter(|p| self.contains(PriorityMarks::from(*p)))
            .collect()
    }
}


/// A cell of the calendar grid
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading and trailing days that belong to the adjacent months
    pub in_month: bool,
    /// How many tasks are due on this day
    pub task_count: usize,
    pub marks: PriorityMarks,
}

impl CalendarDay {
    pub fn has_tasks(&self) -> bool {
        self.task_count > 0
    }
}

/// A Monday-first grid that covers a whole month
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    weeks: Vec<[CalendarDay; 7]>,
}

impl MonthGrid {
    /// Build the grid of `month` (1-12) of `year`.
    /// Returns `None` for an invalid month, or when the grid does not fit in the supported date range
    pub fn new<T: Borrow<Task>>(year: i32, month: u32, tasks: &[T]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (next_year, next_month) = next_month(year, month);
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;

        let start = first.checked_sub_signed(Duration::days(i64::from(first.weekday().num_days_from_monday())))?;
        let end = last.checked_add_signed(Duration::days(i64::from(6 - last.weekday().num_days_from_monday())))?;

        let mut weeks = Vec::new();
        let mut week = Vec::with_capacity(7);
        let mut date = start;
        while date <= end {
            week.push(Self::day(date, month, tasks));
            if week.len() == 7 {
                let full: [CalendarDay; 7] = match std::mem::take(&mut week).try_into() {
                    Ok(w) => w,
                    Err(_) => return None,
                };
                weeks.push(full);
            }
            date = date.succ_opt()?;
        }

        Some(Self { year, month, weeks })
    }

    fn day<T: Borrow<Task>>(date: NaiveDate, month: u32, tasks: &[T]) -> CalendarDay {
        let mut task_count = 0;
        let mut marks = PriorityMarks::empty();
        for task in tasks {
            let task: &Task = task.borrow();
            if task.is_due_on(date) {
                task_count += 1;
                marks.insert(PriorityMarks::from(task.priority()));
            }
        }
        CalendarDay { date, in_month: date.month() == month, task_count, marks }
    }

    pub fn year(&self) -> i32                   { self.year  }
    pub fn month(&self) -> u32                  { self.month }
    pub fn weeks(&self) -> &[[CalendarDay; 7]]  { &self.weeks }

    /// Every cell of the grid, row after row
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|w| w.iter())
    }

    /// The cell of `date`, if it is displayed in this grid
    pub fn day_of(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days().find(|d| d.date == date)
    }

    /// The (year, month) before this one
    pub fn previous_month(&self) -> (i32, u32) {
        if self.month == 1 { (self.year - 1, 12) } else { (self.year, self.month - 1) }
    }

    /// The (year, month) after this one
    pub fn next_month(&self) -> (i32, u32) {
        next_month(self.year, self.month)
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// The tasks due on `date`, most urgent first
pub fn tasks_on<T>(date: NaiveDate, tasks: &[T]) -> Vec<T>
where
    T: Borrow<Task> + Clone,
{
    let due: Vec<T> = tasks.iter()
        .filter(|t| {
            let task: &Task = (*t).borrow();
            task.is_due_on(date)
        })
        .cloned()
        .collect();
    sort_by(SortMethod::Priority, &due)
}
