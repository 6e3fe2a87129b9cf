//! Controller lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the controller
//! through `HttpTodoService` over real HTTP. Validates that tickets, the
//! wire client and the server's responses line up end to end.

use std::net::SocketAddr;

use todo_controller::{
    AddStrategy, ControllerConfig, Dispatch, HttpTodoService, Resolution, TodoClient,
    TodoListController, TodoService,
};

fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn drive(
    c: &mut TodoListController,
    service: &impl TodoService,
    action: impl FnOnce(&mut TodoListController) -> Dispatch,
) -> Option<Resolution> {
    let dispatch = action(c);
    c.run(dispatch, service)
}

fn texts(c: &TodoListController) -> Vec<String> {
    c.items().iter().map(|e| e.text.clone()).collect()
}

#[test]
fn controller_lifecycle() {
    let addr = spawn_server();
    let service = HttpTodoService::new(TodoClient::new(&format!("http://{addr}")));
    let mut c = TodoListController::new(AddStrategy::Optimistic);

    // Step 1: load — empty.
    assert_eq!(drive(&mut c, &service, |c| c.load()), Some(Resolution::Applied));
    assert!(c.items().is_empty());

    // Step 2: add through the input box.
    c.set_input("Integration test");
    assert_eq!(drive(&mut c, &service, |c| c.submit()), Some(Resolution::Applied));
    assert_eq!(texts(&c), ["Integration test"]);
    assert!(!c.items()[0].is_provisional());
    assert_eq!(c.input(), "");

    // Step 3: a second add lands on top, matching the server's order.
    assert_eq!(drive(&mut c, &service, |c| c.add("second")), Some(Resolution::Applied));
    assert_eq!(texts(&c), ["second", "Integration test"]);
    drive(&mut c, &service, |c| c.load());
    assert_eq!(texts(&c), ["second", "Integration test"]);

    // Step 4: blank input never reaches the server.
    assert_eq!(drive(&mut c, &service, |c| c.add("   ")), None);
    assert_eq!(service.fetch_all().unwrap().len(), 2);

    // Step 5: edit through the prompt.
    let first = c.items()[1].id.confirmed().cloned().unwrap();
    assert!(c.begin_edit(&first).is_some());
    assert_eq!(
        drive(&mut c, &service, |c| c.finish_edit(Some("Updated"))),
        Some(Resolution::Applied)
    );
    assert_eq!(texts(&c), ["second", "Updated"]);

    // Step 6: remove.
    assert_eq!(drive(&mut c, &service, |c| c.remove(&first)), Some(Resolution::Applied));
    assert_eq!(texts(&c), ["second"]);

    // Step 7: the server forgets a todo the list still shows.
    let second = c.items()[0].id.confirmed().cloned().unwrap();
    service.delete(&second).unwrap();

    assert_eq!(drive(&mut c, &service, |c| c.edit(&second, "x")), Some(Resolution::Failed));
    assert_eq!(c.pending_error(), Some("Todo not found"));
    assert_eq!(texts(&c), ["second"]);

    // Delete failures are logged only.
    assert_eq!(drive(&mut c, &service, |c| c.remove(&second)), Some(Resolution::Failed));
    assert!(c.pending_error().is_none());
    assert_eq!(texts(&c), ["second"]);

    // Step 8: reload reconciles with the server.
    assert_eq!(drive(&mut c, &service, |c| c.load()), Some(Resolution::Applied));
    assert!(c.items().is_empty());
    assert!(c.pending_error().is_none());
}

#[test]
fn prefixed_routes_from_config() {
    let addr = spawn_server();
    let config = ControllerConfig {
        base_url: format!("http://{addr}"),
        api_prefix: "api".to_string(),
        add_strategy: AddStrategy::Confirmed,
        timeout_secs: Some(5),
    };
    config.validate().unwrap();
    let service = HttpTodoService::from_config(&config);
    let mut c = TodoListController::new(config.add_strategy);

    assert_eq!(drive(&mut c, &service, |c| c.add("via api")), Some(Resolution::Applied));
    assert_eq!(texts(&c), ["via api"]);
    assert_eq!(service.fetch_all().unwrap().len(), 1);
}

#[test]
fn unreachable_server_is_reported_without_losing_items() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let service = HttpTodoService::new(TodoClient::new(&format!("http://{closed}")));
    let mut c = TodoListController::new(AddStrategy::Optimistic);

    assert_eq!(drive(&mut c, &service, |c| c.load()), Some(Resolution::Failed));
    assert_eq!(c.pending_error(), Some("Failed to fetch todos"));

    assert_eq!(drive(&mut c, &service, |c| c.add("offline")), Some(Resolution::RolledBack));
    assert!(c.items().is_empty());
    assert_eq!(c.pending_error(), Some("Failed to add todo"));
    assert!(!c.is_adding());
}
