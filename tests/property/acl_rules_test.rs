// tests/property/acl_rules_test.rs

//! Property-based tests for rule parsing, rendering and evaluation.

use bytes::Bytes;
use keygate::core::acl::enforcer::authorize;
use keygate::core::acl::file::parse_acl_file;
use keygate::core::acl::rules::apply_rules;
use keygate::core::acl::serializer::render_user_rule;
use keygate::core::acl::{AclError, AclUser, CATEGORY_INDEX, Invocation, KeyAccess, RuleOptions};
use proptest::prelude::*;

const COMMANDS: &[&str] = &["get", "set", "mget", "del", "ping", "publish", "acl|whoami"];
const CATEGORIES: &[&str] = &["read", "write", "fast", "slow", "admin", "pubsub", "all"];
const TOKEN_PREFIXES: &[&str] = &["~", "%R~", "%W~", "&", "-&", "+@", "-@", "+", "-", "p"];
const WHITESPACE: &[&str] = &[" ", "\n", "\t", "\r"];

/// Any single well-formed rule token.
fn rule_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("on".to_string()),
        Just("off".to_string()),
        Just("allkeys".to_string()),
        Just("allchannels".to_string()),
        Just("resetkeys".to_string()),
        "[a-z0-9]{1,8}".prop_map(|pw| format!(">{pw}")),
        "[a-z0-9]{1,8}".prop_map(|pw| format!("p{pw}")),
        prop::sample::select(CATEGORIES).prop_map(|c| format!("+@{c}")),
        prop::sample::select(CATEGORIES).prop_map(|c| format!("-@{c}")),
        prop::sample::select(COMMANDS).prop_map(|c| format!("+{c}")),
        prop::sample::select(COMMANDS).prop_map(|c| format!("-{c}")),
        "[a-z]{1,5}\\*?".prop_map(|k| format!("~{k}")),
        "[a-z]{1,5}\\*?".prop_map(|k| format!("%R~{k}")),
        "[a-z]{1,5}\\*?".prop_map(|k| format!("%W~{k}")),
        "[a-z.]{1,6}\\*?".prop_map(|c| format!("&{c}")),
        "[a-z.]{1,6}\\*?".prop_map(|c| format!("-&{c}")),
    ]
}

/// A rule token with whitespace inside its name or pattern.
fn whitespace_token() -> impl Strategy<Value = String> {
    (
        prop::sample::select(TOKEN_PREFIXES),
        "[a-z*]{1,4}",
        prop::sample::select(WHITESPACE),
        "[a-z*]{0,4}",
    )
        .prop_map(|(prefix, head, space, tail)| format!("{prefix}{head}{space}{tail}"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_rendered_rule_line_reparses_to_equivalent_user(
        tokens in prop::collection::vec(rule_token(), 0..20)
    ) {
        let options = RuleOptions::default();
        let user = apply_rules(&AclUser::new("prop"), &tokens, &options).unwrap();

        let line = render_user_rule(&user);
        let parsed = parse_acl_file(&line, &options).unwrap();
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(&parsed[0], &user);
        prop_assert_eq!(render_user_rule(&parsed[0]), line);
    }

    #[test]
    fn test_applying_rules_twice_changes_nothing(
        tokens in prop::collection::vec(rule_token(), 0..20)
    ) {
        let options = RuleOptions::default();
        let once = apply_rules(&AclUser::new("prop"), &tokens, &options).unwrap();
        let twice = apply_rules(&once, &tokens, &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_excluded_command_is_always_denied(
        tokens in prop::collection::vec(rule_token(), 0..20),
        command in prop::sample::select(COMMANDS),
    ) {
        let options = RuleOptions::default();
        let mut rules = tokens.clone();
        rules.push(format!("-{command}"));
        rules.extend(tokens);
        let user = apply_rules(&AclUser::new("prop"), &rules, &options).unwrap();

        let invocation = Invocation::new(command, CATEGORY_INDEX.categories_of(command));
        prop_assert!(!authorize(&user, &invocation).is_allowed());
    }

    #[test]
    fn test_excluded_channel_is_always_denied(
        tokens in prop::collection::vec(rule_token(), 0..20),
        channel in "[a-z.]{1,8}",
    ) {
        let options = RuleOptions::default();
        let mut rules = tokens;
        rules.extend(["on".to_string(), "+@all".to_string(), "allchannels".to_string()]);
        rules.push(format!("-&{channel}"));
        let user = apply_rules(&AclUser::new("prop"), &rules, &options).unwrap();

        let channels = vec![Bytes::from(channel)];
        let invocation = Invocation::new("publish", CATEGORY_INDEX.categories_of("publish"))
            .with_channels(&channels);
        prop_assert!(!authorize(&user, &invocation).is_allowed());
    }

    #[test]
    fn test_read_only_key_pattern_never_grants_writes(
        key in "[a-z]{1,8}",
    ) {
        let options = RuleOptions::default();
        let user = apply_rules(&AclUser::new("prop"), &["on", "+@all", "%R~*"], &options).unwrap();
        let keys = vec![Bytes::from(key)];

        let read = Invocation::new("get", CATEGORY_INDEX.categories_of("get"))
            .with_keys(&keys, KeyAccess::Read);
        let write = Invocation::new("set", CATEGORY_INDEX.categories_of("set"))
            .with_keys(&keys, KeyAccess::Write);
        prop_assert!(authorize(&user, &read).is_allowed());
        prop_assert!(!authorize(&user, &write).is_allowed());
    }

    #[test]
    fn test_tokens_with_whitespace_are_rejected(
        tokens in prop::collection::vec(rule_token(), 0..10),
        bad in whitespace_token(),
    ) {
        let options = RuleOptions::default();
        let before = apply_rules(&AclUser::new("prop"), &tokens, &options).unwrap();
        let mut rules = tokens;
        rules.push(bad);
        let is_invalid_rule = matches!(
            apply_rules(&AclUser::new("prop"), &rules, &options),
            Err(AclError::InvalidRule { .. })
        );
        prop_assert!(is_invalid_rule);

        let parsed = parse_acl_file(&render_user_rule(&before), &options).unwrap();
        prop_assert_eq!(parsed.len(), 1);
    }
}
