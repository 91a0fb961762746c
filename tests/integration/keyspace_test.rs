// tests/integration/keyspace_test.rs

//! Integration tests for the keyspace and connection commands.

use super::test_helpers::TestContext;
use keygate::core::{KeyGateError, RespValue};

#[tokio::test]
async fn test_set_get_del_exists() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.set("a", "1").await.unwrap(), RespValue::ok());
    assert_eq!(ctx.get("a").await.unwrap(), RespValue::bulk("1"));
    assert_eq!(ctx.get("missing").await.unwrap(), RespValue::Null);

    ctx.set("b", "2").await.unwrap();
    assert_eq!(
        ctx.execute(&["EXISTS", "a", "b", "a", "c"]).await.unwrap(),
        RespValue::Integer(3)
    );
    assert_eq!(
        ctx.execute(&["DEL", "a", "c"]).await.unwrap(),
        RespValue::Integer(1)
    );
    assert_eq!(ctx.get("a").await.unwrap(), RespValue::Null);
}

#[tokio::test]
async fn test_set_nx_xx() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.execute(&["SET", "k", "v1", "XX"]).await.unwrap(),
        RespValue::Null
    );
    assert_eq!(
        ctx.execute(&["SET", "k", "v1", "NX"]).await.unwrap(),
        RespValue::ok()
    );
    assert_eq!(
        ctx.execute(&["SET", "k", "v2", "nx"]).await.unwrap(),
        RespValue::Null
    );
    assert_eq!(
        ctx.execute(&["SET", "k", "v3", "xx"]).await.unwrap(),
        RespValue::ok()
    );
    assert_eq!(ctx.get("k").await.unwrap(), RespValue::bulk("v3"));

    let err = ctx.execute(&["SET", "k", "v", "NX", "XX"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::SyntaxError);
}

#[tokio::test]
async fn test_mget_mixes_values_and_nulls() {
    let ctx = TestContext::new().await;
    ctx.set("x", "1").await.unwrap();
    assert_eq!(
        ctx.execute(&["MGET", "x", "y"]).await.unwrap(),
        RespValue::Array(vec![RespValue::bulk("1"), RespValue::Null])
    );
}

#[tokio::test]
async fn test_flushall_clears_everything() {
    let ctx = TestContext::new().await;
    ctx.set("x", "1").await.unwrap();
    ctx.set("y", "2").await.unwrap();
    assert_eq!(ctx.execute(&["FLUSHALL"]).await.unwrap(), RespValue::ok());
    assert!(ctx.state.db.is_empty());
}

#[tokio::test]
async fn test_ping_echo_quit() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.execute(&["PING"]).await.unwrap(),
        RespValue::SimpleString("PONG".into())
    );
    assert_eq!(
        ctx.execute(&["PING", "hello"]).await.unwrap(),
        RespValue::bulk("hello")
    );
    assert_eq!(
        ctx.execute(&["ECHO", "hi"]).await.unwrap(),
        RespValue::bulk("hi")
    );
    assert_eq!(ctx.execute(&["QUIT"]).await.unwrap(), RespValue::ok());
}

#[tokio::test]
async fn test_unknown_command_and_wrong_arity() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.execute(&["NOPE"]).await.unwrap_err(),
        KeyGateError::UnknownCommand("nope".into())
    );
    assert_eq!(
        ctx.execute(&["GET"]).await.unwrap_err(),
        KeyGateError::WrongArgumentCount("get".into())
    );
    assert_eq!(
        ctx.execute(&["ECHO", "a", "b"]).await.unwrap_err(),
        KeyGateError::WrongArgumentCount("echo".into())
    );
}

#[tokio::test]
async fn test_commands_are_counted() {
    let ctx = TestContext::new().await;
    ctx.execute(&["PING"]).await.unwrap();
    ctx.execute(&["PING"]).await.unwrap();
    assert_eq!(ctx.state.stats.get_total_commands(), 2);
}
