use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::error::TaskError;
use super::types::{NewTask, Task, TaskPatch};
use crate::format::percent_of;
use crate::validation::{is_blank, too_long, MAX_NOTES_LEN, MAX_TEXT_LEN};

/// Days ahead that count as "due soon".
pub const DUE_SOON_DAYS: i64 = 14;

/// Progress figures for the planning timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_soon: usize,
    /// Completed as a percentage of total, clamped to `[0, 100]`.
    pub percent_complete: f64,
}

/// Computes timeline progress relative to `today`.
pub fn timeline_stats(tasks: &[Task], today: NaiveDate) -> TimelineStats {
    let horizon = today + Duration::days(DUE_SOON_DAYS);
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
    let due_soon = tasks
        .iter()
        .filter(|t| !t.completed && t.due_date.is_some_and(|d| d >= today && d <= horizon))
        .count();

    TimelineStats {
        total: tasks.len(),
        completed,
        overdue,
        due_soon,
        percent_complete: percent_of(completed as f64, tasks.len() as f64),
    }
}

/// Sorts tasks for the timeline: open tasks before completed ones, then by
/// due date (undated last), then by priority. Stable for equal tasks.
pub fn sort_tasks_by_due(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        let done_cmp = a.completed.cmp(&b.completed);
        if done_cmp != Ordering::Equal {
            return done_cmp;
        }
        let due_cmp = match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if due_cmp != Ordering::Equal {
            return due_cmp;
        }
        a.priority.sort_priority().cmp(&b.priority.sort_priority())
    });
}

/// Groups dated tasks by `(year, month)` of their due date. Undated tasks
/// are left out.
pub fn group_tasks_by_month(tasks: &[Task]) -> BTreeMap<(i32, u32), Vec<&Task>> {
    let mut grouped: BTreeMap<(i32, u32), Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_date {
            grouped.entry((due.year(), due.month())).or_default().push(task);
        }
    }
    grouped
}

/// Validates a task before creation.
pub fn validate_new_task(task: &NewTask) -> Result<(), TaskError> {
    if is_blank(&task.title) {
        return Err(TaskError::EmptyTitle);
    }
    if too_long(&task.title, MAX_TEXT_LEN) {
        return Err(TaskError::TitleTooLong);
    }
    if task
        .description
        .as_deref()
        .is_some_and(|d| too_long(d, MAX_NOTES_LEN))
    {
        return Err(TaskError::DescriptionTooLong);
    }
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_task_patch(patch: &TaskPatch) -> Result<(), TaskError> {
    if let Some(title) = &patch.title {
        if is_blank(title) {
            return Err(TaskError::EmptyTitle);
        }
        if too_long(title, MAX_TEXT_LEN) {
            return Err(TaskError::TitleTooLong);
        }
    }
    if patch
        .description
        .as_deref()
        .is_some_and(|d| too_long(d, MAX_NOTES_LEN))
    {
        return Err(TaskError::DescriptionTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskPriority;
    use uuid::Uuid;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn task(title: &str) -> Task {
        Task::new(Uuid::nil(), title)
    }

    #[test]
    fn test_timeline_stats() {
        let today = make_date(2025, 3, 1);
        let tasks = vec![
            task("Book venue").due(make_date(2025, 2, 1)).done(),
            task("Order cake").due(make_date(2025, 2, 20)),
            task("Send invites").due(make_date(2025, 3, 10)),
            task("Pick music").due(make_date(2025, 6, 1)),
            task("Think about favors"),
        ];
        let stats = timeline_stats(&tasks, today);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_soon, 1);
        assert_eq!(stats.percent_complete, 20.0);
    }

    #[test]
    fn test_timeline_stats_empty() {
        let stats = timeline_stats(&[], make_date(2025, 1, 1));
        assert_eq!(stats, TimelineStats::default());
    }

    #[test]
    fn test_sort_tasks_by_due() {
        let mut tasks = vec![
            task("Done").due(make_date(2025, 1, 1)).done(),
            task("Undated"),
            task("Late low").due(make_date(2025, 5, 1)).with_priority(TaskPriority::Low),
            task("Late high").due(make_date(2025, 5, 1)).with_priority(TaskPriority::High),
            task("Early").due(make_date(2025, 2, 1)),
        ];
        sort_tasks_by_due(&mut tasks);
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late high", "Late low", "Undated", "Done"]);
    }

    #[test]
    fn test_group_tasks_by_month() {
        let tasks = vec![
            task("A").due(make_date(2025, 2, 1)),
            task("B").due(make_date(2025, 2, 28)),
            task("C").due(make_date(2025, 4, 2)),
            task("D"),
        ];
        let grouped = group_tasks_by_month(&tasks);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&(2025, 2)].len(), 2);
        assert_eq!(grouped[&(2025, 4)].len(), 1);
    }

    #[test]
    fn test_validate_new_task() {
        let new = NewTask {
            title: "".to_string(),
            description: None,
            due_date: None,
            priority: TaskPriority::Medium,
            category: None,
        };
        assert_eq!(validate_new_task(&new), Err(TaskError::EmptyTitle));
        let new = NewTask {
            title: "x".repeat(201),
            ..new
        };
        assert_eq!(validate_new_task(&new), Err(TaskError::TitleTooLong));
    }
}
