// tests/integration/acl_test.rs

//! Integration tests for the ACL command family.

use super::test_helpers::{PRIMARY_SESSION, TestContext, bulk_strings, test_config};
use keygate::core::acl::AclError;
use keygate::core::state::CloseReason;
use keygate::core::{KeyGateError, RespValue};
use tempfile::TempDir;

// ===== ACL SETUSER / LIST =====

#[tokio::test]
async fn test_setuser_then_list_renders_canonical_line() {
    let ctx = TestContext::new().await;
    let result = ctx
        .setuser("bob", &["on", "pass1", "+@read", "+get", "-@write", "%R~foo:*"])
        .await
        .unwrap();
    assert_eq!(result, RespValue::ok());

    let list = bulk_strings(&ctx.acl(&["LIST"]).await.unwrap());
    assert_eq!(list.len(), 2);
    assert_eq!(list[0], "default on +@all %RW~* +&*");
    assert_eq!(list[1], "bob on pass1 +@read -@write +get %R~foo:*");
}

#[tokio::test]
async fn test_setuser_is_idempotent() {
    let ctx = TestContext::new().await;
    let rules = ["on", ">secret", "+@read", "~app:*", "&news.*"];
    ctx.setuser("carol", &rules).await.unwrap();
    let first = ctx.acl(&["LIST"]).await.unwrap();
    ctx.setuser("carol", &rules).await.unwrap();
    let second = ctx.acl(&["LIST"]).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_setuser_with_bad_rule_changes_nothing() {
    let ctx = TestContext::new().await;
    ctx.setuser("dave", &["on", "+get"]).await.unwrap();
    let before = ctx.acl(&["GETUSER", "dave"]).await.unwrap();

    let err = ctx
        .setuser("dave", &["+set", "%X~bad"])
        .await
        .unwrap_err();
    assert!(matches!(err, KeyGateError::Acl(AclError::InvalidRule { .. })));
    assert_eq!(ctx.acl(&["GETUSER", "dave"]).await.unwrap(), before);
}

#[tokio::test]
async fn test_setuser_strict_rejects_unknown_command() {
    let mut config = test_config();
    config.acl.strict_rules = true;
    let ctx = TestContext::with_config(config).await;

    let err = ctx.setuser("erin", &["+nosuchcommand"]).await.unwrap_err();
    assert!(err.to_string().contains("unknown command"));
    assert!(ctx.setuser("erin", &["+get", "+@string", "+acl"]).await.is_ok());
}

// ===== ACL GETUSER =====

#[tokio::test]
async fn test_getuser_structure() {
    let ctx = TestContext::new().await;
    let rules = [
        "on", "pw", "+@read", "-@dangerous", "+get", "-flushall", "~k:*", "&ch",
    ];
    ctx.setuser("frank", &rules).await.unwrap();

    let detail = ctx.acl(&["GETUSER", "frank"]).await.unwrap();
    let RespValue::Array(fields) = detail else {
        panic!("expected array");
    };
    assert_eq!(fields.len(), 12);
    assert_eq!(fields[0], RespValue::bulk("flags"));
    assert_eq!(bulk_strings(&fields[1]), vec!["on"]);
    assert_eq!(fields[2], RespValue::bulk("passwords"));
    assert_eq!(bulk_strings(&fields[3]), vec!["pw"]);
    assert_eq!(bulk_strings(&fields[5]), vec!["+@read", "-@dangerous"]);
    assert_eq!(bulk_strings(&fields[7]), vec!["+get", "-flushall"]);
    assert_eq!(bulk_strings(&fields[9]), vec!["%RW~k:*"]);
    assert_eq!(bulk_strings(&fields[11]), vec!["+&ch"]);
}

#[tokio::test]
async fn test_getuser_unknown_is_null() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.acl(&["GETUSER", "ghost"]).await.unwrap(), RespValue::Null);
}

// ===== ACL USERS / WHOAMI / CAT / HELP =====

#[tokio::test]
async fn test_users_in_insertion_order() {
    let ctx = TestContext::new().await;
    ctx.setuser("zed", &[]).await.unwrap();
    ctx.setuser("amy", &[]).await.unwrap();
    let users = bulk_strings(&ctx.acl(&["USERS"]).await.unwrap());
    assert_eq!(users, vec!["default", "zed", "amy"]);
}

#[tokio::test]
async fn test_whoami_unauthenticated_is_default() {
    let ctx = TestContext::new().await;
    assert_eq!(
        ctx.acl(&["WHOAMI"]).await.unwrap(),
        RespValue::SimpleString("default".into())
    );
}

#[tokio::test]
async fn test_whoami_after_auth() {
    let ctx = TestContext::new().await;
    ctx.setuser("gina", &["on", "pw", "+@all"]).await.unwrap();
    ctx.open_session(2);
    ctx.auth_as(2, "gina", "pw").await.unwrap();
    assert_eq!(
        ctx.execute_as(2, &["ACL", "WHOAMI"]).await.unwrap(),
        RespValue::SimpleString("gina".into())
    );
    assert_eq!(
        ctx.acl(&["WHOAMI"]).await.unwrap(),
        RespValue::SimpleString("default".into())
    );
}

#[tokio::test]
async fn test_cat_lists_categories_and_commands() {
    let ctx = TestContext::new().await;
    let categories = bulk_strings(&ctx.acl(&["CAT"]).await.unwrap());
    for expected in ["read", "write", "admin", "dangerous", "pubsub", "connection"] {
        assert!(categories.contains(&expected.to_string()), "{expected}");
    }

    let read = bulk_strings(&ctx.acl(&["CAT", "READ"]).await.unwrap());
    assert!(read.contains(&"get".to_string()));
    assert!(read.contains(&"mget".to_string()));
    assert!(!read.contains(&"set".to_string()));

    let admin = bulk_strings(&ctx.acl(&["CAT", "admin"]).await.unwrap());
    assert!(admin.contains(&"acl|setuser".to_string()));
    assert!(!admin.contains(&"acl|whoami".to_string()));

    let err = ctx.acl(&["CAT", "nope"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::CategoryNotFound("nope".into())));
}

#[tokio::test]
async fn test_help_lists_every_subcommand() {
    let ctx = TestContext::new().await;
    let RespValue::Array(lines) = ctx.acl(&["HELP"]).await.unwrap() else {
        panic!("expected array");
    };
    let text: Vec<String> = lines
        .into_iter()
        .map(|l| match l {
            RespValue::SimpleString(s) => s,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    let subcommands = [
        "CAT", "DELUSER", "GETUSER", "LIST", "LOAD", "SAVE", "SETUSER", "USERS", "WHOAMI",
    ];
    for sub in subcommands {
        assert!(text.iter().any(|line| line.starts_with(sub)), "{sub}");
    }
    let getuser = text.iter().position(|line| line == "GETUSER").unwrap();
    assert_eq!(text[getuser + 1], "    Get the rules for a specific ACL user.");
}

#[tokio::test]
async fn test_unknown_subcommand_and_arity() {
    let ctx = TestContext::new().await;
    let err = ctx.acl(&["FROB"]).await.unwrap_err();
    assert!(matches!(err, KeyGateError::UnknownSubcommand { .. }));

    let err = ctx.acl(&["GETUSER"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::WrongArgumentCount("acl|getuser".into()));

    let err = ctx.execute(&["ACL"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::WrongArgumentCount("acl".into()));
}

// ===== ACL DELUSER =====

#[tokio::test]
async fn test_deluser_counts_and_kills_bound_connections() {
    let ctx = TestContext::new().await;
    ctx.setuser("hank", &["on", "pw", "+@all", "allkeys"]).await.unwrap();

    let mut kill_a = ctx.open_session(10);
    let mut kill_b = ctx.open_session(11);
    let mut kill_other = ctx.open_session(12);
    ctx.auth_as(10, "hank", "pw").await.unwrap();
    ctx.auth_as(11, "hank", "pw").await.unwrap();

    let deleted = ctx.acl(&["DELUSER", "hank", "nobody"]).await.unwrap();
    assert_eq!(deleted, RespValue::Integer(1));

    assert_eq!(kill_a.try_recv().unwrap(), CloseReason::UserDeleted("hank".into()));
    assert_eq!(kill_b.try_recv().unwrap(), CloseReason::UserDeleted("hank".into()));
    assert!(kill_other.try_recv().is_err());
    assert_eq!(ctx.state.stats.get_killed_connections(), 2);

    // The revoked sessions can no longer run anything, even before they close.
    let err = ctx.execute_as(10, &["PING"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::ConnectionRevoked(10)));
}

#[tokio::test]
async fn test_deluser_default_rejected() {
    let ctx = TestContext::new().await;
    ctx.setuser("ivy", &[]).await.unwrap();
    let err = ctx.acl(&["DELUSER", "ivy", "default"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::DefaultUserImmutable));
    assert!(ctx.state.acl.get_user("ivy").is_some());
}

// ===== ACL SAVE / LOAD =====

#[tokio::test]
async fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.acl");
    let mut config = test_config();
    config.acl_file = Some(path.to_string_lossy().into_owned());
    let ctx = TestContext::with_config(config.clone()).await;

    ctx.setuser("jack", &["on", ">pw", "+@read", "%W~out:*", "-&secret"])
        .await
        .unwrap();
    assert_eq!(ctx.acl(&["SAVE"]).await.unwrap(), RespValue::ok());
    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved.lines().count(), 2);
    assert!(saved.contains("jack on #"));

    // A fresh server picks the file up at startup.
    let restarted = TestContext::with_config(config).await;
    assert_eq!(
        restarted.acl(&["LIST"]).await.unwrap(),
        ctx.acl(&["LIST"]).await.unwrap()
    );
    restarted.open_session(5);
    assert_eq!(restarted.auth_as(5, "jack", "pw").await.unwrap(), RespValue::ok());
}

#[tokio::test]
async fn test_load_replaces_users_and_kills_orphans() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.acl");
    std::fs::write(&path, "default on +@all allkeys allchannels\nkate on pw +@read ~*\n").unwrap();
    let mut config = test_config();
    config.acl_file = Some(path.to_string_lossy().into_owned());
    let ctx = TestContext::with_config(config).await;

    ctx.setuser("leo", &["on", "pw", "+@all"]).await.unwrap();
    let mut kill = ctx.open_session(20);
    ctx.auth_as(20, "leo", "pw").await.unwrap();

    assert_eq!(ctx.acl(&["LOAD"]).await.unwrap(), RespValue::ok());
    assert_eq!(
        bulk_strings(&ctx.acl(&["USERS"]).await.unwrap()),
        vec!["default", "kate"]
    );
    assert_eq!(
        kill.try_recv().unwrap(),
        CloseReason::UserRemovedByLoad("leo".into())
    );
}

#[tokio::test]
async fn test_load_corrupt_file_is_all_or_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.acl");
    let mut config = test_config();
    config.acl_file = Some(path.to_string_lossy().into_owned());
    let ctx = TestContext::with_config(config).await;
    ctx.setuser("mia", &["on"]).await.unwrap();

    std::fs::write(&path, "nina on +@all\nomar on %Q~x\n").unwrap();
    let err = ctx.acl(&["LOAD"]).await.unwrap_err();
    assert!(matches!(
        err,
        KeyGateError::Acl(AclError::AclFileCorrupt { line: 2, .. })
    ));
    assert_eq!(
        bulk_strings(&ctx.acl(&["USERS"]).await.unwrap()),
        vec!["default", "mia"]
    );
}

#[tokio::test]
async fn test_save_without_acl_file_fails() {
    let ctx = TestContext::new().await;
    let err = ctx.acl(&["SAVE"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::AclFileNotConfigured));
    let err = ctx.acl(&["LOAD"]).await.unwrap_err();
    assert_eq!(err, KeyGateError::Acl(AclError::AclFileNotConfigured));
}

#[tokio::test]
async fn test_admin_subcommands_require_permission() {
    let ctx = TestContext::new().await;
    ctx.setuser("pat", &["on", "pw", "+@all", "-@admin"]).await.unwrap();
    ctx.open_session(30);
    ctx.auth_as(30, "pat", "pw").await.unwrap();

    let err = ctx.execute_as(30, &["ACL", "SETUSER", "x"]).await.unwrap_err();
    assert!(err.to_string().starts_with("NOPERM"));
    assert!(ctx.execute_as(30, &["ACL", "WHOAMI"]).await.is_ok());
    assert_eq!(ctx.state.stats.get_rejected_commands(), 1);
    assert_eq!(
        ctx.state.acl.binding_of(PRIMARY_SESSION).unwrap(),
        "default"
    );
}
