use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tasklist_core::{
    HttpSeedLoader, MemoryKeyValueStore, SeedConfig, SeedLoader, SeedUnavailable, Task, TaskStore,
    UuidIdGenerator, SEED_LIMIT,
};

/// Serves exactly one HTTP response on a loopback port.
fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut buf).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });
    (format!("http://{addr}/todos"), handle)
}

fn loader(endpoint: String) -> HttpSeedLoader {
    HttpSeedLoader::new(SeedConfig {
        endpoint,
        timeout: Duration::from_secs(5),
        ..SeedConfig::default()
    })
}

fn remote_body(count: u32) -> String {
    let records: Vec<String> = (1..=count)
        .map(|id| {
            format!(
                r#"{{"userId":1,"id":{id},"title":"remote {id}","completed":{}}}"#,
                id % 2 == 0
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

#[test]
fn default_config_targets_public_feed() {
    let config = SeedConfig::default();
    assert_eq!(config.endpoint, "https://jsonplaceholder.typicode.com/todos");
    assert_eq!(config.limit, SEED_LIMIT);
}

#[test]
fn success_response_takes_first_five_records() {
    let (endpoint, server) = serve_once("200 OK", remote_body(12));

    let tasks = loader(endpoint).load().unwrap();
    server.join().unwrap();

    assert_eq!(tasks.len(), SEED_LIMIT);
    assert_eq!(tasks[0], Task::new("1", "remote 1"));
    assert_eq!(tasks[1], Task::new("2", "remote 2").with_completed(true));
    assert_eq!(tasks[4].id, "5");
}

#[test]
fn non_success_status_is_unavailable() {
    let (endpoint, server) = serve_once("503 Service Unavailable", "[]".to_string());

    let err = loader(endpoint).load().unwrap_err();
    server.join().unwrap();

    assert_eq!(err, SeedUnavailable::Status(503));
}

#[test]
fn undecodable_body_is_unavailable() {
    let (endpoint, server) = serve_once("200 OK", "<html>oops</html>".to_string());

    let err = loader(endpoint).load().unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, SeedUnavailable::InvalidBody(_)));
}

#[test]
fn refused_connection_is_transport_failure() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = loader(format!("http://{addr}/todos")).load().unwrap_err();

    assert!(matches!(err, SeedUnavailable::Transport(_)));
}

#[test]
fn store_seeds_from_http_loader() {
    let (endpoint, server) = serve_once("200 OK", remote_body(3));
    let storage = MemoryKeyValueStore::new();

    let store = TaskStore::initialize(storage, UuidIdGenerator, loader(endpoint)).unwrap();
    server.join().unwrap();

    let ids: Vec<String> = store.list().into_iter().map(|task| task.id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}
