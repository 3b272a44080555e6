use crate::view::{ListView, TaskRow};
use tabled::builder::Builder;
use tabled::settings::Style;

pub const EMPTY_STATE: &str = "No tasks yet. Add one to get started!";

fn display_actions(toggle_label: &str, edit_enabled: bool) -> String {
    let edit = if edit_enabled { "edit" } else { "edit (disabled)" };
    format!("{} | {edit} | delete", toggle_label.to_lowercase())
}

pub fn render_list(view: &ListView) -> String {
    if view.empty_state_visible {
        return EMPTY_STATE.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Done", "Task", "Created", "Actions"]);

    for row in &view.rows {
        let record = match row {
            TaskRow::Display {
                id,
                text,
                completed,
                time_label,
                toggle_label,
                edit_enabled,
            } => [
                id.to_string(),
                if *completed { "x" } else { " " }.to_string(),
                text.clone(),
                time_label.clone(),
                display_actions(toggle_label, *edit_enabled),
            ],
            TaskRow::Editing { id, text } => [
                id.to_string(),
                " ".to_string(),
                format!("[{text}]"),
                "editing".to_string(),
                "save | cancel".to_string(),
            ],
        };
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    let mut output = table.to_string();
    if view.bulk_actions_visible {
        let clear_completed = if view.remove_completed_enabled {
            "clear-completed"
        } else {
            "clear-completed (nothing completed)"
        };
        output.push('\n');
        output.push_str(&format!("{clear_completed} | clear-all"));
    }
    output
}

pub fn render_json(view: &ListView) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = view
        .rows
        .iter()
        .map(|row| match row {
            TaskRow::Display {
                id,
                text,
                completed,
                time_label,
                ..
            } => serde_json::json!({
                "id": id,
                "text": text,
                "completed": completed,
                "editing": false,
                "created": time_label,
            }),
            TaskRow::Editing { id, text } => serde_json::json!({
                "id": id,
                "text": text,
                "completed": false,
                "editing": true,
            }),
        })
        .collect();

    serde_json::json!({
        "tasks": rows,
        "removeCompletedEnabled": view.remove_completed_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::{EMPTY_STATE, render_json, render_list};
    use crate::view::{ListView, TaskRow};

    fn view(rows: Vec<TaskRow>, remove_completed_enabled: bool) -> ListView {
        ListView {
            empty_state_visible: rows.is_empty(),
            bulk_actions_visible: !rows.is_empty(),
            remove_completed_enabled,
            rows,
        }
    }

    #[test]
    fn empty_list_renders_empty_state_only() {
        assert_eq!(render_list(&view(Vec::new(), false)), EMPTY_STATE);
    }

    #[test]
    fn table_lists_rows_and_bulk_actions() {
        let rendered = render_list(&view(
            vec![
                TaskRow::Display {
                    id: 3,
                    text: "Buy milk".to_string(),
                    completed: true,
                    time_label: "just now".to_string(),
                    toggle_label: "Undo",
                    edit_enabled: false,
                },
                TaskRow::Editing {
                    id: 1,
                    text: "Draft".to_string(),
                },
            ],
            true,
        ));

        assert!(rendered.contains("Buy milk"));
        assert!(rendered.contains("undo | edit (disabled) | delete"));
        assert!(rendered.contains("[Draft]"));
        assert!(rendered.contains("save | cancel"));
        assert!(rendered.ends_with("clear-completed | clear-all"));
    }

    #[test]
    fn json_marks_editing_rows() {
        let json = render_json(&view(
            vec![TaskRow::Editing {
                id: 1,
                text: "Draft".to_string(),
            }],
            false,
        ));

        assert_eq!(json["tasks"][0]["editing"], true);
        assert_eq!(json["removeCompletedEnabled"], false);
    }
}
