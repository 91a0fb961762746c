// tests/integration/connection_test.rs

//! End-to-end tests over real TCP connections.

use super::test_helpers::{TestServer, test_config};
use bytes::Bytes;
use keygate::core::protocol::RespFrame;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn bulk(s: &str) -> RespFrame {
    RespFrame::BulkString(Bytes::copy_from_slice(s.as_bytes()))
}

#[tokio::test]
async fn test_ping_and_quit_over_socket() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(
        client.call(&["PING"]).await,
        RespFrame::SimpleString("PONG".into())
    );
    assert_eq!(client.call(&["QUIT"]).await, RespFrame::SimpleString("OK".into()));
    assert!(client.read().await.is_none());
    server.shutdown().await;
}

#[tokio::test]
async fn test_inline_command() {
    let server = TestServer::start().await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream.write_all(b"\r\nECHO hi\r\n").await.unwrap();

    let mut buf = vec![0u8; 64];
    let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&buf[..n], b"$2\r\nhi\r\n");
    server.shutdown().await;
}

#[tokio::test]
async fn test_errors_keep_connection_open() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    match client.call(&["NOSUCH"]).await {
        RespFrame::Error(msg) => assert_eq!(msg, "ERR unknown command 'nosuch'"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(client.call(&["ECHO", "still"]).await, bulk("still"));
    server.shutdown().await;
}

#[tokio::test]
async fn test_deluser_closes_bound_connection() {
    let server = TestServer::start().await;
    let mut admin = server.connect().await;
    let mut victim = server.connect().await;

    assert_eq!(
        admin.call(&["ACL", "SETUSER", "tmp", "on", "pw", "+@all"]).await,
        RespFrame::SimpleString("OK".into())
    );
    assert_eq!(
        victim.call(&["AUTH", "tmp", "pw"]).await,
        RespFrame::SimpleString("OK".into())
    );
    assert_eq!(admin.call(&["ACL", "DELUSER", "tmp"]).await, RespFrame::Integer(1));

    assert_eq!(
        victim.read().await,
        Some(RespFrame::Error(
            "ERR connection closed: user 'tmp' was deleted".into()
        ))
    );
    assert!(victim.read().await.is_none());

    // The admin connection is untouched.
    assert_eq!(
        admin.call(&["PING"]).await,
        RespFrame::SimpleString("PONG".into())
    );
    server.shutdown().await;
}

#[tokio::test]
async fn test_subscribe_receives_published_messages() {
    let server = TestServer::start().await;
    let mut subscriber = server.connect().await;
    let mut publisher = server.connect().await;

    assert_eq!(
        subscriber.call(&["SUBSCRIBE", "news", "sport"]).await,
        RespFrame::Array(vec![bulk("subscribe"), bulk("news"), RespFrame::Integer(1)])
    );
    assert_eq!(
        subscriber.read().await,
        Some(RespFrame::Array(vec![
            bulk("subscribe"),
            bulk("sport"),
            RespFrame::Integer(2)
        ]))
    );

    assert_eq!(
        publisher.call(&["PUBLISH", "news", "hello"]).await,
        RespFrame::Integer(1)
    );
    assert_eq!(
        subscriber.read().await,
        Some(RespFrame::Array(vec![
            bulk("message"),
            bulk("news"),
            bulk("hello")
        ]))
    );
    server.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_notifies_clients() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    assert_eq!(
        client.call(&["PING"]).await,
        RespFrame::SimpleString("PONG".into())
    );

    server.shutdown().await;
    assert_eq!(
        client.read().await,
        Some(RespFrame::Error("SHUTDOWN Server is shutting down".into()))
    );
}

#[tokio::test]
async fn test_max_clients_rejects_extra_connections() {
    let mut config = test_config();
    config.max_clients = 1;
    let server = TestServer::with_config(config).await;

    let mut first = server.connect().await;
    assert_eq!(
        first.call(&["PING"]).await,
        RespFrame::SimpleString("PONG".into())
    );

    let mut second = server.connect().await;
    assert_eq!(
        second.read().await,
        Some(RespFrame::Error("ERR max number of clients reached".into()))
    );
    server.shutdown().await;
}

#[tokio::test]
async fn test_closed_connection_is_unregistered() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;
    client.call(&["PING"]).await;
    assert_eq!(server.state.clients.len(), 1);
    assert_eq!(server.state.stats.get_total_connections(), 1);

    client.call(&["QUIT"]).await;
    for _ in 0..50 {
        if server.state.clients.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(server.state.clients.is_empty());
    server.shutdown().await;
}
