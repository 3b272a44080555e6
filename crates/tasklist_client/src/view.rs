//! What the screen shows for a given [`ClientState`], independent of how it
//! is drawn.

use crate::controller::ClientState;
use std::cmp::Ordering;
use tasklist_core::model::Task;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRow {
    Display {
        id: u64,
        text: String,
        completed: bool,
        time_label: String,
        toggle_label: &'static str,
        edit_enabled: bool,
    },
    Editing {
        id: u64,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub empty_state_visible: bool,
    pub bulk_actions_visible: bool,
    pub remove_completed_enabled: bool,
    pub rows: Vec<TaskRow>,
}

impl ListView {
    pub fn build(state: &ClientState, now: OffsetDateTime, offset: UtcOffset) -> Self {
        let has_tasks = !state.tasks.is_empty();
        let rows = newest_first(&state.tasks)
            .into_iter()
            .map(|task| row_for(task, now, offset))
            .collect();

        Self {
            empty_state_visible: !has_tasks,
            bulk_actions_visible: has_tasks,
            remove_completed_enabled: has_tasks && state.completed_count() > 0,
            rows,
        }
    }

    pub fn now(state: &ClientState) -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self::build(state, OffsetDateTime::now_utc(), offset)
    }
}

fn row_for(task: &Task, now: OffsetDateTime, offset: UtcOffset) -> TaskRow {
    if task.is_editing {
        return TaskRow::Editing {
            id: task.id,
            text: task.text.clone(),
        };
    }

    let time_label = task
        .created_at
        .as_deref()
        .map(|created_at| format_creation_time(created_at, now, offset))
        .unwrap_or_default();

    TaskRow::Display {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        time_label,
        toggle_label: if task.completed { "Undo" } else { "Complete" },
        edit_enabled: !task.completed,
    }
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

/// Newest first by creation time. Tasks without a usable timestamp go last
/// and keep their relative order.
pub fn newest_first(tasks: &[Task]) -> Vec<&Task> {
    let mut keyed: Vec<(Option<OffsetDateTime>, &Task)> = tasks
        .iter()
        .map(|task| (task.created_at.as_deref().and_then(parse_timestamp), task))
        .collect();

    keyed.sort_by(|(left, _), (right, _)| match (left, right) {
        (Some(left), Some(right)) => right.cmp(left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, task)| task).collect()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Short label for when a task was created; empty when the timestamp does
/// not parse.
pub fn format_creation_time(created_at: &str, now: OffsetDateTime, offset: UtcOffset) -> String {
    let Some(created) = parse_timestamp(created_at) else {
        tracing::warn!(created_at, "invalid task timestamp");
        return String::new();
    };

    let minutes = (now - created).whole_minutes();
    let hours = minutes.div_euclid(60);
    let days = hours.div_euclid(24);

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "min")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
        created
            .to_offset(offset)
            .format(&format)
            .unwrap_or_default()
    }
}
