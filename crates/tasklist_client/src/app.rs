//! Top-level owner of the client state. Gestures go through the controller
//! and the result is committed only when the controller succeeds; anything
//! else becomes an alert.

use crate::controller::{self, ClientState};
use crate::error::ClientError;
use crate::gateway::TaskGateway;
use crate::prompt::Prompter;
use crate::view::ListView;

/// What happened to a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    /// The user declined a confirmation.
    Unchanged,
    /// The user was alerted and nothing changed.
    Rejected,
}

pub struct TodoApp {
    state: ClientState,
    gateway: Box<dyn TaskGateway>,
    prompter: Box<dyn Prompter>,
}

impl TodoApp {
    pub fn new(gateway: Box<dyn TaskGateway>, prompter: Box<dyn Prompter>) -> Self {
        Self {
            state: ClientState::default(),
            gateway,
            prompter,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn view(&self) -> ListView {
        ListView::now(&self.state)
    }

    fn commit(
        &mut self,
        result: Result<ClientState, ClientError>,
        failure: &str,
    ) -> Outcome {
        match result {
            Ok(next) => {
                self.state = next;
                Outcome::Changed
            }
            Err(err) => {
                tracing::warn!(error = %err, "{failure}");
                let message = match &err {
                    ClientError::Validation(_) | ClientError::UnknownTask(_) => err.to_string(),
                    _ => failure.to_string(),
                };
                self.prompter.alert(&message);
                Outcome::Rejected
            }
        }
    }

    /// Replaces the mirror with the stored collection. On failure the
    /// current mirror stays as it is.
    pub fn load(&mut self) -> Outcome {
        let result = controller::load(self.gateway.as_ref());
        self.commit(result, "Failed to load tasks. Please try again.")
    }

    pub fn add(&mut self, text: &str) -> Outcome {
        let result = controller::add_task(&self.state, self.gateway.as_ref(), text);
        self.commit(result, "Failed to add task. Please try again.")
    }

    pub fn toggle_complete(&mut self, id: u64) -> Outcome {
        let result = controller::toggle_complete(&self.state, self.gateway.as_ref(), id);
        self.commit(result, "Failed to update task. Please try again.")
    }

    pub fn start_edit(&mut self, id: u64) -> Outcome {
        let result = controller::start_edit(&self.state, id);
        self.commit(result, "Failed to edit task. Please try again.")
    }

    pub fn cancel_edit(&mut self, id: u64) -> Outcome {
        let result = controller::cancel_edit(&self.state, id);
        self.commit(result, "Failed to cancel editing. Please try again.")
    }

    pub fn save_edit(&mut self, id: u64, text: &str) -> Outcome {
        let result = controller::save_edit(&self.state, self.gateway.as_ref(), id, text);
        self.commit(result, "Failed to save task. Please try again.")
    }

    pub fn delete(&mut self, id: u64) -> Outcome {
        if self.state.find(id).is_none() {
            self.prompter.alert(&ClientError::UnknownTask(id).to_string());
            return Outcome::Rejected;
        }
        if !self
            .prompter
            .confirm("Are you sure you want to delete this task?")
        {
            return Outcome::Unchanged;
        }

        let result = controller::delete_task(&self.state, self.gateway.as_ref(), id);
        self.commit(result, "Failed to delete task. Please try again.")
    }

    pub fn remove_completed(&mut self) -> Outcome {
        let count = self.state.completed_count();
        if count == 0 {
            self.prompter.alert("No completed tasks to remove!");
            return Outcome::Rejected;
        }
        if !self.prompter.confirm(&format!(
            "Are you sure you want to remove {count} completed task(s)?"
        )) {
            return Outcome::Unchanged;
        }

        let result = controller::remove_completed(&self.state, self.gateway.as_ref());
        self.commit(result, "Failed to remove completed tasks. Please try again.")
    }

    pub fn remove_all(&mut self) -> Outcome {
        let count = self.state.tasks.len();
        if count == 0 {
            self.prompter.alert("No tasks to remove!");
            return Outcome::Rejected;
        }
        if !self.prompter.confirm(&format!(
            "Are you sure you want to remove all {count} task(s)? This action cannot be undone."
        )) {
            return Outcome::Unchanged;
        }

        let result = controller::remove_all(&self.state, self.gateway.as_ref());
        self.commit(result, "Failed to remove tasks. Please try again.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, TodoApp};
    use crate::error::ClientError;
    use crate::gateway::{LocalGateway, TaskGateway};
    use crate::prompt::Prompter;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use tasklist_core::model::{Task, TaskCollection, TaskPatch};
    use tasklist_core::storage::{KeyValueStore, MemoryKvStore};
    use tasklist_core::task_api::Ack;

    #[derive(Default)]
    struct Transcript {
        alerts: Vec<String>,
        confirms: Vec<String>,
    }

    struct ScriptedPrompter {
        answer: bool,
        transcript: Rc<RefCell<Transcript>>,
    }

    impl Prompter for ScriptedPrompter {
        fn alert(&self, message: &str) {
            self.transcript.borrow_mut().alerts.push(message.to_string());
        }

        fn confirm(&self, message: &str) -> bool {
            self.transcript
                .borrow_mut()
                .confirms
                .push(message.to_string());
            self.answer
        }
    }

    /// Shares one in-memory store between the app and the test.
    struct SharedGateway(Rc<LocalGateway>);

    impl TaskGateway for SharedGateway {
        fn list(&self) -> Result<TaskCollection, ClientError> {
            self.0.list()
        }

        fn create(&self, text: &str) -> Result<Task, ClientError> {
            self.0.create(text)
        }

        fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, ClientError> {
            self.0.update(id, patch)
        }

        fn delete(&self, id: u64) -> Result<Ack, ClientError> {
            self.0.delete(id)
        }

        fn bulk_replace(&self, tasks: &[Task]) -> Result<Ack, ClientError> {
            self.0.bulk_replace(tasks)
        }
    }

    struct Harness {
        app: TodoApp,
        store: Arc<MemoryKvStore>,
        backend: Rc<LocalGateway>,
        transcript: Rc<RefCell<Transcript>>,
    }

    fn harness(answer: bool, texts: &[&str]) -> Harness {
        let store = Arc::new(MemoryKvStore::new());
        let backend = Rc::new(LocalGateway::new(store.clone()));
        for text in texts {
            backend.create(text).unwrap();
        }
        let transcript = Rc::new(RefCell::new(Transcript::default()));
        let prompter = ScriptedPrompter {
            answer,
            transcript: transcript.clone(),
        };
        let mut app = TodoApp::new(
            Box::new(SharedGateway(backend.clone())),
            Box::new(prompter),
        );
        assert_eq!(app.load(), Outcome::Changed);

        Harness {
            app,
            store,
            backend,
            transcript,
        }
    }

    #[test]
    fn blank_add_alerts_with_validation_message() {
        let mut h = harness(true, &[]);

        assert_eq!(h.app.add("   "), Outcome::Rejected);

        assert_eq!(h.transcript.borrow().alerts, vec!["Please enter a task!"]);
        assert!(h.backend.list().unwrap().tasks.is_empty());
    }

    #[test]
    fn add_then_toggle_then_remove_completed() {
        let mut h = harness(true, &[]);

        h.app.add("Buy milk");
        h.app.add("Walk dog");
        h.app.toggle_complete(1);
        assert_eq!(h.app.remove_completed(), Outcome::Changed);

        let stored = h.backend.list().unwrap();
        assert_eq!(stored.tasks.len(), 1);
        assert_eq!(stored.tasks[0].text, "Walk dog");
        assert_eq!(stored.task_id_counter, 3);
        assert_eq!(
            h.transcript.borrow().confirms,
            vec!["Are you sure you want to remove 1 completed task(s)?"]
        );
    }

    #[test]
    fn remove_completed_with_nothing_completed_only_alerts() {
        let mut h = harness(true, &["A"]);

        assert_eq!(h.app.remove_completed(), Outcome::Rejected);

        let transcript = h.transcript.borrow();
        assert_eq!(transcript.alerts, vec!["No completed tasks to remove!"]);
        assert!(transcript.confirms.is_empty());
    }

    #[test]
    fn remove_all_on_empty_list_only_alerts() {
        let mut h = harness(true, &[]);

        assert_eq!(h.app.remove_all(), Outcome::Rejected);

        assert_eq!(h.transcript.borrow().alerts, vec!["No tasks to remove!"]);
    }

    #[test]
    fn declined_confirmation_keeps_everything() {
        let mut h = harness(false, &["A", "B"]);

        assert_eq!(h.app.remove_all(), Outcome::Unchanged);
        assert_eq!(h.app.delete(1), Outcome::Unchanged);

        assert_eq!(h.app.state().tasks.len(), 2);
        assert_eq!(h.backend.list().unwrap().tasks.len(), 2);
        assert_eq!(
            h.transcript.borrow().confirms,
            vec![
                "Are you sure you want to remove all 2 task(s)? This action cannot be undone.",
                "Are you sure you want to delete this task?",
            ]
        );
    }

    #[test]
    fn store_failure_alerts_and_keeps_mirror() {
        let mut h = harness(true, &["A"]);
        h.store.put("user_tasks", "not json").unwrap();

        assert_eq!(h.app.toggle_complete(1), Outcome::Rejected);

        assert!(!h.app.state().find(1).unwrap().completed);
        assert_eq!(
            h.transcript.borrow().alerts,
            vec!["Failed to update task. Please try again."]
        );
    }

    #[test]
    fn failed_load_keeps_empty_mirror() {
        let store = Arc::new(MemoryKvStore::new());
        store.put("user_tasks", "{").unwrap();
        let transcript = Rc::new(RefCell::new(Transcript::default()));
        let mut app = TodoApp::new(
            Box::new(LocalGateway::new(store)),
            Box::new(ScriptedPrompter {
                answer: true,
                transcript: transcript.clone(),
            }),
        );

        assert_eq!(app.load(), Outcome::Rejected);

        assert!(app.state().tasks.is_empty());
        assert!(app.view().empty_state_visible);
        assert_eq!(
            transcript.borrow().alerts,
            vec!["Failed to load tasks. Please try again."]
        );
    }

    #[test]
    fn unknown_task_alert_names_the_task() {
        let mut h = harness(true, &["A"]);

        assert_eq!(h.app.toggle_complete(7), Outcome::Rejected);
        assert_eq!(h.app.start_edit(8), Outcome::Rejected);

        assert_eq!(
            h.transcript.borrow().alerts,
            vec!["task 7 is not in the list", "task 8 is not in the list"]
        );
    }

    #[test]
    fn edit_flow_saves_trimmed_text() {
        let mut h = harness(true, &["Draft"]);

        h.app.start_edit(1);
        assert_eq!(h.app.state().editing_id(), Some(1));
        assert_eq!(h.app.save_edit(1, "  "), Outcome::Rejected);
        assert_eq!(h.app.state().editing_id(), Some(1));
        assert_eq!(h.app.save_edit(1, " Final "), Outcome::Changed);

        assert_eq!(h.app.state().editing_id(), None);
        assert_eq!(h.backend.list().unwrap().tasks[0].text, "Final");
        assert_eq!(h.transcript.borrow().alerts, vec!["Task cannot be empty!"]);
    }
}
