// tests/integration/auth_test.rs

//! Integration tests for AUTH and per-user command enforcement.

use super::test_helpers::{TestContext, test_config};
use keygate::core::acl::AclError;
use keygate::core::acl::password::sha256_hex;
use keygate::core::{KeyGateError, RespValue};

#[tokio::test]
async fn test_auth_plaintext_and_hashed_passwords_both_accepted() {
    let ctx = TestContext::new().await;
    let digest = format!("#{}", sha256_hex("hashed-secret"));
    ctx.setuser("alice", &["on", "plain-secret", &digest, "+@all"])
        .await
        .unwrap();

    ctx.open_session(2);
    assert_eq!(
        ctx.auth_as(2, "alice", "plain-secret").await.unwrap(),
        RespValue::ok()
    );
    assert_eq!(
        ctx.auth_as(2, "alice", "hashed-secret").await.unwrap(),
        RespValue::ok()
    );
}

#[tokio::test]
async fn test_auth_failures_collapse_to_wrongpass() {
    let ctx = TestContext::new().await;
    ctx.setuser("bob", &["on", "pw"]).await.unwrap();
    ctx.setuser("off-user", &["off", "pw"]).await.unwrap();
    ctx.open_session(2);

    for (user, password) in [("bob", "bad"), ("nobody", "pw"), ("off-user", "pw")] {
        let err = ctx.auth_as(2, user, password).await.unwrap_err();
        assert_eq!(err, KeyGateError::Acl(AclError::InvalidCredential));
        assert!(err.to_string().starts_with("WRONGPASS"));
    }
    assert_eq!(ctx.state.stats.get_auth_failures(), 3);
    assert_eq!(ctx.state.acl.binding_of(2).unwrap(), "default");
}

#[tokio::test]
async fn test_auth_single_argument_targets_default_user() {
    let mut config = test_config();
    config.acl.default_user = vec!["on".into(), "secret".into(), "+@all".into()];
    let ctx = TestContext::with_config(config).await;

    assert!(ctx.execute(&["AUTH", "wrong"]).await.is_err());
    assert_eq!(ctx.execute(&["AUTH", "secret"]).await.unwrap(), RespValue::ok());
}

#[tokio::test]
async fn test_auth_switches_identity() {
    let ctx = TestContext::new().await;
    ctx.setuser("u1", &["on", "p1", "+@all"]).await.unwrap();
    ctx.setuser("u2", &["on", "p2", "+@all"]).await.unwrap();
    ctx.open_session(2);

    ctx.auth_as(2, "u1", "p1").await.unwrap();
    assert_eq!(ctx.state.acl.binding_of(2).unwrap(), "u1");
    ctx.auth_as(2, "u2", "p2").await.unwrap();
    assert_eq!(ctx.state.acl.binding_of(2).unwrap(), "u2");
    assert_eq!(ctx.state.acl.connections_bound_to("u1"), 0);
    assert_eq!(ctx.state.acl.connections_bound_to("u2"), 1);
}

#[tokio::test]
async fn test_auth_wrong_arity() {
    let ctx = TestContext::new().await;
    let err = ctx.execute(&["AUTH", "a", "b", "c"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::WrongArity("auth".into())));
}

#[tokio::test]
async fn test_fresh_user_is_denied_everything() {
    let ctx = TestContext::new().await;
    ctx.setuser("fresh", &["on", "pw"]).await.unwrap();
    ctx.open_session(2);
    ctx.auth_as(2, "fresh", "pw").await.unwrap();

    let err = ctx.execute_as(2, &["PING"]).await.unwrap_err();
    assert_eq!(
        err,
        KeyGateError::Acl(AclError::CommandNotPermitted {
            user: "fresh".into(),
            command: "ping".into()
        })
    );
}

#[tokio::test]
async fn test_disabled_user_denied_after_binding() {
    let ctx = TestContext::new().await;
    ctx.setuser("sam", &["on", "pw", "+@all"]).await.unwrap();
    ctx.open_session(2);
    ctx.auth_as(2, "sam", "pw").await.unwrap();
    ctx.setuser("sam", &["off"]).await.unwrap();

    let err = ctx.execute_as(2, &["PING"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::UserDisabled("sam".into())));
}

#[tokio::test]
async fn test_read_only_user_key_enforcement() {
    let ctx = TestContext::new().await;
    ctx.set("foo:1", "v").await.unwrap();
    ctx.set("bar", "v").await.unwrap();
    ctx.setuser("bob", &["on", "pass1", "+@read", "+get", "-@write", "%R~foo:*"])
        .await
        .unwrap();
    ctx.open_session(2);
    ctx.auth_as(2, "bob", "pass1").await.unwrap();

    assert_eq!(
        ctx.execute_as(2, &["GET", "foo:1"]).await.unwrap(),
        RespValue::bulk("v")
    );
    let err = ctx.execute_as(2, &["GET", "bar"]).await.unwrap_err();
    assert_eq!(
        err,
        KeyGateError::Acl(AclError::KeyNotPermitted {
            user: "bob".into(),
            key: "bar".into()
        })
    );
    let err = ctx.execute_as(2, &["SET", "foo:1", "x"]).await.unwrap_err();
    assert!(matches!(
        err,
        KeyGateError::Acl(AclError::CategoryExcluded { .. })
    ));
    let err = ctx
        .execute_as(2, &["MGET", "foo:1", "bar"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'bar' key"));
}

#[tokio::test]
async fn test_explicit_command_beats_category_exclusion() {
    let ctx = TestContext::new().await;
    ctx.setuser("wes", &["on", "pw", "-@write", "+set", "~*"])
        .await
        .unwrap();
    ctx.open_session(2);
    ctx.auth_as(2, "wes", "pw").await.unwrap();

    assert_eq!(
        ctx.execute_as(2, &["SET", "k", "v"]).await.unwrap(),
        RespValue::ok()
    );
    let err = ctx.execute_as(2, &["DEL", "k"]).await.unwrap_err();
    assert!(matches!(
        err,
        KeyGateError::Acl(AclError::CategoryExcluded { .. })
    ));
}

#[tokio::test]
async fn test_channel_permissions_on_publish_and_subscribe() {
    let ctx = TestContext::new().await;
    ctx.setuser("pub", &["on", "pw", "+@pubsub", "&news.*", "-&news.secret"])
        .await
        .unwrap();
    ctx.open_session(2);
    ctx.auth_as(2, "pub", "pw").await.unwrap();

    assert_eq!(
        ctx.execute_as(2, &["PUBLISH", "news.sport", "hi"]).await.unwrap(),
        RespValue::Integer(0)
    );
    let err = ctx
        .execute_as(2, &["PUBLISH", "news.secret", "hi"])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        KeyGateError::Acl(AclError::ChannelNotPermitted { .. })
    ));
    let err = ctx
        .execute_as(2, &["SUBSCRIBE", "news.a", "weather"])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        KeyGateError::Acl(AclError::ChannelNotPermitted {
            user: "pub".into(),
            channel: "weather".into()
        })
    );
}

#[tokio::test]
async fn test_acl_disabled_skips_enforcement() {
    let mut config = test_config();
    config.acl.enabled = false;
    config.acl.default_user = vec!["on".into()];
    let ctx = TestContext::with_config(config).await;
    assert_eq!(ctx.set("k", "v").await.unwrap(), RespValue::ok());
}
