// tests/property/roundtrip_test.rs

//! Property-based tests for roundtrip operations through the command router.

use crate::test_helpers::TestContext;
use keygate::core::RespValue;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 50,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_set_get_roundtrip(
        key in "[a-zA-Z0-9_:]{1,64}",
        value in "[a-zA-Z0-9 ]{0,256}"
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ctx = TestContext::new().await;

            let set_result = ctx.set(&key, &value).await.unwrap();
            assert_eq!(set_result, RespValue::SimpleString("OK".into()));

            let get_result = ctx.get(&key).await.unwrap();
            match get_result {
                RespValue::BulkString(bs) => assert_eq!(String::from_utf8_lossy(&bs), value),
                other => panic!("GET should return BulkString, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_setuser_getuser_list_roundtrip(
        password in "pw[a-z0-9]{1,10}",
        key_prefix in "[a-z]{1,8}",
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let ctx = TestContext::new().await;
            let key_rule = format!("%R~{key_prefix}:*");
            let rules = ["on", password.as_str(), "+@read", key_rule.as_str()];
            ctx.setuser("prop", &rules).await.unwrap();

            let list = ctx.acl(&["LIST"]).await.unwrap();
            let RespValue::Array(lines) = list else {
                panic!("ACL LIST should return an array");
            };
            let expected = format!("prop on {password} +@read {key_rule}");
            assert_eq!(lines[1], RespValue::bulk(expected));

            let _kill_rx = ctx.open_session(2);
            // A granted read works, a write outside the read pattern does not.
            assert!(ctx.auth_as(2, "prop", &password).await.is_ok());
            let key = format!("{key_prefix}:x");
            assert!(ctx.execute_as(2, &["GET", key.as_str()]).await.is_ok());
            assert!(ctx.execute_as(2, &["SET", key.as_str(), "v"]).await.is_err());
        });
    }
}
