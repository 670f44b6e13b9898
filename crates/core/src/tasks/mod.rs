mod error;
mod timeline;
mod types;

pub use error::TaskError;
pub use timeline::{
    group_tasks_by_month, sort_tasks_by_due, timeline_stats, validate_new_task,
    validate_task_patch, TimelineStats, DUE_SOON_DAYS,
};
pub use types::{NewTask, Task, TaskPatch, TaskPriority};
