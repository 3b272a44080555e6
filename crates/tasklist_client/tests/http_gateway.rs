use tasklist_client::app::{Outcome, TodoApp};
use tasklist_client::error::ClientError;
use tasklist_client::gateway::{HttpGateway, TaskGateway};
use tasklist_client::prompt::Prompter;
use tasklist_core::config::{ServerConfig, StoreBackend};
use tasklist_core::model::TaskPatch;
use tasklist_server::build_app;

struct AlwaysYes;

impl Prompter for AlwaysYes {
    fn alert(&self, message: &str) {
        panic!("unexpected alert: {message}");
    }

    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Serves an in-memory task server on an ephemeral port for the rest of the
/// test process.
fn spawn_server() -> String {
    let config = ServerConfig {
        store: StoreBackend::Memory,
        ..ServerConfig::default()
    };
    let application = build_app(&config).unwrap();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, application).await.unwrap();
        });
    });

    format!("http://{address}")
}

#[test]
fn http_gateway_round_trips_through_server() {
    let gateway = HttpGateway::new(&spawn_server()).unwrap();

    let first = gateway.create("  Buy milk ").unwrap();
    let second = gateway.create("Walk dog").unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.text, "Buy milk");
    assert!(first.created_at.is_some());

    let updated = gateway.update(second.id, &TaskPatch::completed(true)).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.created_at, second.created_at);

    let collection = gateway.list().unwrap();
    assert_eq!(collection.tasks.len(), 2);
    assert_eq!(collection.task_id_counter, 3);

    assert!(gateway.delete(first.id).unwrap().success);
    assert!(gateway.bulk_replace(&[]).unwrap().success);
    let collection = gateway.list().unwrap();
    assert!(collection.tasks.is_empty());
    assert_eq!(collection.task_id_counter, 3);
}

#[test]
fn http_gateway_reports_server_errors() {
    let gateway = HttpGateway::new(&spawn_server()).unwrap();

    let err = gateway.delete(42).unwrap_err();
    assert_eq!(err, ClientError::request("404: Task not found"));

    let err = gateway.create("   ").unwrap_err();
    assert!(matches!(err, ClientError::Request(message) if message.starts_with("400: ")));
}

#[test]
fn http_gateway_reports_unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let gateway = HttpGateway::new(&format!("http://{address}")).unwrap();

    assert!(matches!(gateway.list(), Err(ClientError::Request(_))));
}

#[test]
fn app_over_http_keeps_mirror_in_sync() {
    let url = spawn_server();
    let mut app = TodoApp::new(
        Box::new(HttpGateway::new(&url).unwrap()),
        Box::new(AlwaysYes),
    );

    assert_eq!(app.load(), Outcome::Changed);
    assert_eq!(app.add("Buy milk"), Outcome::Changed);
    assert_eq!(app.add("Walk dog"), Outcome::Changed);
    assert_eq!(app.toggle_complete(1), Outcome::Changed);
    assert_eq!(app.remove_completed(), Outcome::Changed);

    let stored = HttpGateway::new(&url).unwrap().list().unwrap();
    assert_eq!(stored.tasks, app.state().tasks);
    assert_eq!(stored.tasks.len(), 1);
    assert_eq!(stored.tasks[0].text, "Walk dog");
}
