//! This crate provides the client side of a to-do list backed by a simple REST server.
//!
//! The server (see [`client`]) owns the task list and addresses every task by its position in it.
//! The [`view`] module holds the state a user interacts with: the cached task list, its ordering,
//! and its split into "today", "pending" and "completed" lists. \
//! The "today" list only exists on the client. It is persisted in a local store (see [`cache`]).
//!
//! A [`MonthGrid`](calendar::MonthGrid) shows which days tasks are due on.

pub mod traits;
pub mod error;
pub use error::ViewError;

mod task;
pub use task::{Priority, Task, TaskDraft, TaskIndex};
pub mod view;
pub use view::{ViewModel, ViewEvent, Board, Bucket, SortMethod, TodaySet};
pub mod calendar;

pub mod client;
pub mod cache;
pub mod mock_behaviour;
pub mod mock_backend;

pub mod config;
pub mod utils;
