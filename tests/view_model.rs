//! Scenarios that drive a view-model against an in-memory backend
#![cfg(feature = "mocks")]

use chrono::NaiveDate;

use task_desk::cache::MemoryStorage;
use task_desk::config::TODAY_TASKS_KEY;
use task_desk::mock_backend::MockBackend;
use task_desk::view::IndexedTask;
use task_desk::{Board, Bucket, Priority, SortMethod, Task, TaskDraft, TaskIndex, TodaySet, ViewError, ViewEvent, ViewModel};

type TestView = ViewModel<MockBackend, MemoryStorage>;

fn task(name: &str, priority: Priority, deadline: Option<&str>) -> Task {
    let deadline = deadline.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap());
    Task::new(name, priority, deadline, None)
}

fn view_with(tasks: Vec<Task>, today: &[&str]) -> TestView {
    let _ = env_logger::builder().is_test(true).try_init();

    let today: TodaySet = today.iter().map(|n| n.to_string()).collect();
    let storage = MemoryStorage::with_item(TODAY_TASKS_KEY, today.to_json());
    ViewModel::new(MockBackend::with_tasks(tasks), storage)
}

fn names(tasks: &[IndexedTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.task.name()).collect()
}

fn stored_today(view: &TestView) -> TodaySet {
    TodaySet::from_json(view.store().peek(TODAY_TASKS_KEY).unwrap_or("[]"))
}

fn always(_: &Task) -> bool { true }
fn never(_: &Task) -> bool { false }


#[tokio::test]
async fn refresh_partitions_the_tasks() {
    let mut done = task("A", Priority::Low, None);
    done.set_completed(true);
    let mut view = view_with(vec![done, task("B", Priority::Low, None), task("C", Priority::Low, None)], &["B"]);

    view.refresh().await.unwrap();

    let board = view.board().partition().unwrap();
    assert_eq!(names(&board.completed), vec!["A"]);
    assert_eq!(names(&board.today), vec!["B"]);
    assert_eq!(names(&board.pending), vec!["C"]);
    assert_eq!(board.len(), 3);
}

#[tokio::test]
async fn refresh_prunes_the_today_set() {
    let mut view = view_with(vec![task("X", Priority::Low, None)], &["X", "Y"]);

    view.refresh().await.unwrap();

    let expected: TodaySet = vec!["X".to_string()].into_iter().collect();
    assert_eq!(view.today(), &expected);
    assert_eq!(stored_today(&view), expected);
}

#[tokio::test]
async fn buckets_follow_the_sort_method() {
    let mut view = view_with(vec![
        task("none", Priority::Medium, None),
        task("later", Priority::Low, Some("2025-01-01")),
        task("sooner", Priority::High, Some("2024-06-01")),
    ], &[]);
    view.refresh().await.unwrap();
    assert_eq!(names(&view.board().partition().unwrap().pending), vec!["sooner", "none", "later"]);

    let requests = view.backend().request_count();
    view.set_sort(SortMethod::Deadline);
    assert_eq!(names(&view.board().partition().unwrap().pending), vec!["sooner", "later", "none"]);
    view.set_sort(SortMethod::Name);
    assert_eq!(names(&view.board().partition().unwrap().pending), vec!["later", "none", "sooner"]);
    assert_eq!(view.backend().request_count(), requests);
}

#[tokio::test]
async fn board_keeps_server_positions() {
    let mut view = view_with(vec![
        task("low", Priority::Low, None),
        task("high", Priority::High, None),
    ], &[]);
    view.refresh().await.unwrap();

    let pending = &view.board().partition().unwrap().pending;
    assert_eq!(pending[0].index, TaskIndex::from(1));
    assert_eq!(pending[1].index, TaskIndex::from(0));
}

#[tokio::test]
async fn add_refreshes_and_clears_the_form() {
    let mut view = view_with(vec![], &[]);
    view.refresh().await.unwrap();

    let mut form = TaskDraft::new("  Write report ", Priority::High).with_details("for Monday");
    let added = view.add(&mut form).await.unwrap();

    assert_eq!(added.name(), "Write report");
    assert_eq!(form, TaskDraft::default());
    assert_eq!(view.tasks().len(), 1);
    assert_eq!(view.tasks()[0].details(), Some("for Monday"));
    assert_eq!(names(&view.board().partition().unwrap().pending), vec!["Write report"]);
}

#[tokio::test]
async fn add_without_name_sends_nothing() {
    let mut view = view_with(vec![task("A", Priority::Low, None)], &[]);
    view.refresh().await.unwrap();
    let requests = view.backend().request_count();

    let mut form = TaskDraft::new("", Priority::High);
    match view.add(&mut form).await {
        Err(err) => assert!(matches!(err, ViewError::EmptyName) && err.is_validation()),
        Ok(_) => panic!("a blank task has been added"),
    }

    let mut blank = TaskDraft::new("   ", Priority::High);
    assert!(view.add(&mut blank).await.is_err());
    assert_eq!(blank.name, "   ");

    assert_eq!(view.backend().request_count(), requests);
    assert_eq!(view.tasks().len(), 1);
}

#[tokio::test]
async fn renaming_keeps_today_membership() {
    let mut view = view_with(vec![task("X", Priority::Low, None), task("W", Priority::Low, None)], &["W", "X"]);
    view.refresh().await.unwrap();

    let mut draft = view.task_at(TaskIndex::from(0)).unwrap().to_draft();
    draft.name = "Z".to_string();
    view.update(TaskIndex::from(0), &draft).await.unwrap();

    assert!(view.today().contains("Z"));
    assert!(view.today().contains("X") == false);
    assert_eq!(view.today().iter().collect::<Vec<_>>(), vec!["W", "Z"]);
    // The board follows server order for equal priorities
    assert_eq!(names(&view.board().partition().unwrap().today), vec!["Z", "W"]);
    assert_eq!(view.backend().tasks()[0].name(), "Z");
}

#[tokio::test]
async fn update_rejects_stale_positions() {
    let mut view = view_with(vec![task("X", Priority::Low, None)], &[]);
    view.refresh().await.unwrap();
    let requests = view.backend().request_count();

    let draft = TaskDraft::new("Y", Priority::Low);
    match view.update(TaskIndex::from(1), &draft).await {
        Err(ViewError::IndexOutOfRange{ index, len }) => {
            assert_eq!(index, TaskIndex::from(1));
            assert_eq!(len, 1);
        },
        other => panic!("unexpected result {:?}", other),
    }
    assert!(matches!(view.update(TaskIndex::from(0), &TaskDraft::default()).await, Err(ViewError::EmptyName)));
    assert_eq!(view.backend().request_count(), requests);
}

#[tokio::test]
async fn update_keeps_completion() {
    let mut done = task("X", Priority::Low, Some("2024-06-01"));
    done.set_completed(true);
    let mut view = view_with(vec![done], &[]);
    view.refresh().await.unwrap();

    let mut draft = view.task_at(TaskIndex::from(0)).unwrap().to_draft();
    draft.deadline = None;
    draft.priority = Priority::High;
    view.update(TaskIndex::from(0), &draft).await.unwrap();

    let stored = &view.tasks()[0];
    assert!(stored.completed());
    assert_eq!(stored.deadline(), None);
    assert_eq!(stored.priority(), Priority::High);
}

#[tokio::test]
async fn completing_moves_the_task_without_refresh() {
    let mut view = view_with(vec![task("A", Priority::Low, None), task("B", Priority::High, None)], &["A"]);
    view.refresh().await.unwrap();
    let requests = view.backend().request_count();

    view.complete(TaskIndex::from(0)).await.unwrap();

    // Only the completion request has been sent
    assert_eq!(view.backend().request_count(), requests + 1);
    assert!(view.backend().tasks()[0].completed());
    assert!(view.tasks()[0].completed());
    assert!(view.today().contains("A") == false);
    assert!(stored_today(&view).contains("A") == false);

    let board = view.board().partition().unwrap();
    assert!(board.today.is_empty());
    assert_eq!(names(&board.pending), vec!["B"]);
    assert_eq!(names(&board.completed), vec!["A"]);
    assert!(board.completed[0].task.completed());
}

#[tokio::test]
async fn completing_off_board_falls_back_to_refresh() {
    let mut view = view_with(vec![task("A", Priority::Low, None)], &[]);
    view.refresh().await.unwrap();
    // The backend fails its next listing, so the board shows a banner
    view.backend_mut().set_malformed_listing(true);
    assert!(view.refresh().await.is_err());
    view.backend_mut().set_malformed_listing(false);

    view.complete(TaskIndex::from(0)).await.unwrap();

    let board = view.board().partition().unwrap();
    assert_eq!(names(&board.completed), vec!["A"]);
}

#[tokio::test]
async fn deletion_requires_confirmation() {
    let mut view = view_with(vec![task("A", Priority::Low, None), task("B", Priority::Low, None)], &["A", "B"]);
    view.refresh().await.unwrap();
    let requests = view.backend().request_count();

    assert_eq!(view.delete(TaskIndex::from(0), never).await.unwrap(), false);
    assert_eq!(view.backend().request_count(), requests);
    assert_eq!(view.tasks().len(), 2);

    assert_eq!(view.delete(TaskIndex::from(0), always).await.unwrap(), true);
    assert_eq!(view.tasks().len(), 1);
    assert_eq!(view.tasks()[0].name(), "B");
    assert!(view.today().contains("A") == false);
    assert!(view.today().contains("B"));
}

#[tokio::test]
async fn confirmation_sees_the_targeted_task() {
    let mut view = view_with(vec![task("A", Priority::Low, None), task("B", Priority::Low, None)], &[]);
    view.refresh().await.unwrap();

    let mut asked = Vec::new();
    let confirm = |t: &Task| { asked.push(t.name().to_string()); true };
    view.delete(TaskIndex::from(1), confirm).await.unwrap();
    assert_eq!(asked, vec!["B".to_string()]);
}

#[tokio::test]
async fn dragging_toggles_today_membership() {
    let mut view = view_with(vec![task("A", Priority::Low, None)], &[]);
    view.refresh().await.unwrap();
    let requests = view.backend().request_count();
    let a = TaskIndex::from(0);

    assert!(view.move_task(a, Bucket::Pending, Bucket::Today).await.unwrap());
    assert!(view.move_task(a, Bucket::Pending, Bucket::Today).await.unwrap() == false);
    assert!(view.move_task(a, Bucket::Today, Bucket::Today).await.unwrap() == false);
    assert_eq!(view.today().len(), 1);
    assert_eq!(stored_today(&view).len(), 1);
    assert_eq!(names(&view.board().partition().unwrap().today), vec!["A"]);

    assert!(view.move_task(a, Bucket::Today, Bucket::Pending).await.unwrap());
    assert!(view.today().is_empty());
    assert_eq!(names(&view.board().partition().unwrap().pending), vec!["A"]);

    // Moves never reach the server
    assert_eq!(view.backend().request_count(), requests);
}

#[tokio::test]
async fn completed_tasks_cannot_be_dragged() {
    let mut done = task("A", Priority::Low, None);
    done.set_completed(true);
    let mut view = view_with(vec![done], &[]);
    view.refresh().await.unwrap();

    assert!(view.move_task(TaskIndex::from(0), Bucket::Completed, Bucket::Today).await.unwrap() == false);
    // The source list given by the caller does not match where the task actually is
    assert!(view.move_task(TaskIndex::from(0), Bucket::Pending, Bucket::Today).await.unwrap() == false);
    assert!(view.today().is_empty());
    assert_eq!(stored_today(&view).len(), 0);

    view.refresh().await.unwrap();
    assert!(view.today().is_empty());
    assert_eq!(names(&view.board().partition().unwrap().completed), vec!["A"]);
}

#[tokio::test]
async fn moves_from_the_wrong_list_are_ignored() {
    let mut view = view_with(vec![task("A", Priority::Low, None), task("B", Priority::Low, None)], &["A"]);
    view.refresh().await.unwrap();

    assert!(view.move_task(TaskIndex::from(1), Bucket::Today, Bucket::Pending).await.unwrap() == false);
    assert!(view.move_task(TaskIndex::from(0), Bucket::Pending, Bucket::Today).await.unwrap() == false);
    assert_eq!(view.today().iter().collect::<Vec<_>>(), vec!["A"]);
}

#[tokio::test]
async fn completed_task_lands_where_a_refresh_puts_it() {
    let mut done = task("A", Priority::Low, None);
    done.set_completed(true);
    let mut view = view_with(vec![task("B", Priority::Low, None), done, task("C", Priority::Low, None)], &[]);
    view.refresh().await.unwrap();

    // "B" is before "A" on the server, although it is completed after it
    view.complete(TaskIndex::from(0)).await.unwrap();
    let relocated = view.board().clone();
    assert_eq!(names(&relocated.partition().unwrap().completed), vec!["B", "A"]);

    view.refresh().await.unwrap();
    assert_eq!(view.board(), &relocated);
}

#[tokio::test]
async fn events_are_dispatched() {
    let mut view = view_with(vec![], &[]);
    view.dispatch(ViewEvent::Refresh, never).await.unwrap();
    view.dispatch(ViewEvent::Add(TaskDraft::new("A", Priority::Low)), never).await.unwrap();
    view.dispatch(ViewEvent::Add(TaskDraft::new("B", Priority::High)), never).await.unwrap();
    view.dispatch(ViewEvent::SetSort(SortMethod::Name), never).await.unwrap();
    assert_eq!(view.sort_method(), SortMethod::Name);

    view.dispatch(ViewEvent::Move{ index: TaskIndex::from(1), from: Bucket::Pending, to: Bucket::Today }, never).await.unwrap();
    view.dispatch(ViewEvent::Complete(TaskIndex::from(0)), never).await.unwrap();
    view.dispatch(ViewEvent::Delete(TaskIndex::from(0)), never).await.unwrap();
    assert_eq!(view.tasks().len(), 2);

    view.dispatch(ViewEvent::Update{ index: TaskIndex::from(1), draft: TaskDraft::new("C", Priority::Medium) }, never).await.unwrap();
    let board = view.board().partition().unwrap();
    assert_eq!(names(&board.today), vec!["C"]);
    assert_eq!(names(&board.completed), vec!["A"]);
}

#[tokio::test]
async fn calendar_uses_cached_tasks() {
    let mut view = view_with(vec![
        task("a", Priority::Low, Some("2024-06-10")),
        task("b", Priority::High, Some("2024-06-10")),
        task("c", Priority::Medium, Some("2024-05-27")),
    ], &[]);
    view.refresh().await.unwrap();

    let grid = view.calendar(2024, 6).unwrap();
    let day = grid.day_of(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()).unwrap();
    assert_eq!(day.task_count, 2);
    // May 27th is shown as a leading day of June
    let leading = grid.day_of(NaiveDate::from_ymd_opt(2024, 5, 27).unwrap()).unwrap();
    assert!(leading.has_tasks() && leading.in_month == false);

    let due = view.tasks_on(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    assert_eq!(names(&due), vec!["b", "a"]);
    assert_eq!(due[0].index, TaskIndex::from(1));
}

#[tokio::test]
async fn corrupted_today_set_is_reset() {
    let _ = env_logger::builder().is_test(true).try_init();
    let storage = MemoryStorage::with_item(TODAY_TASKS_KEY, "{definitely not json");
    let mut view = ViewModel::new(MockBackend::with_tasks(vec![task("A", Priority::Low, None)]), storage);

    view.refresh().await.unwrap();
    assert!(view.today().is_empty());
    assert_eq!(view.store().peek(TODAY_TASKS_KEY), Some("[]"));
    assert!(matches!(view.board(), Board::Tasks(_)));
}
