// src/core/acl/file.rs

//! The ACL file: one rule line per user, in the format `ACL LIST` renders.
//! Blank lines are ignored.

use super::error::AclError;
use super::rules::{RuleOptions, apply_rules, validate_username};
use super::serializer::render_user_rule;
use super::user::AclUser;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Parses the contents of an ACL file. Any bad line fails the whole file.
pub fn parse_acl_file(contents: &str, options: &RuleOptions) -> Result<Vec<AclUser>, AclError> {
    let mut users = Vec::new();
    let mut seen = HashSet::new();
    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(username) = tokens.next() else {
            continue;
        };
        let corrupt = |reason: String| AclError::AclFileCorrupt {
            line: line_no,
            reason,
        };
        validate_username(username).map_err(|e| corrupt(e.to_string()))?;
        if !seen.insert(username.to_string()) {
            return Err(corrupt(format!("duplicate user '{username}'")));
        }
        let rules: Vec<&str> = tokens.collect();
        let user = apply_rules(&AclUser::new(username), &rules, options)
            .map_err(|e| corrupt(e.to_string()))?;
        users.push(user);
    }
    Ok(users)
}

/// Renders users into ACL file contents.
pub fn render_acl_file(users: &[AclUser]) -> String {
    let mut contents = String::new();
    for user in users {
        contents.push_str(&render_user_rule(user));
        contents.push('\n');
    }
    contents
}

/// Reads and parses the ACL file at `path`.
pub async fn load_acl_file(path: &str, options: &RuleOptions) -> Result<Vec<AclUser>, AclError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AclError::AclFileIo(format!("failed to read '{path}': {e}")))?;
    parse_acl_file(&contents, options)
}

/// Writes the users to `path` through a temporary file and an atomic rename.
pub async fn save_acl_file(path: &str, users: &[AclUser]) -> Result<(), AclError> {
    let contents = render_acl_file(users);
    let path = path.to_string();
    let user_count = users.len();

    let save_result = tokio::task::spawn_blocking(move || -> Result<(), AclError> {
        let temp_path_str = format!("{}.tmp-acl-save-{}", path, rand::random::<u32>());
        let temp_path = Path::new(&temp_path_str);

        std::fs::write(temp_path, contents)
            .map_err(|e| AclError::AclFileIo(format!("failed to write temp ACL file: {e}")))?;

        if let Err(e) = std::fs::rename(temp_path, &path) {
            let _ = std::fs::remove_file(temp_path);
            return Err(AclError::AclFileIo(format!(
                "failed to atomically rename ACL file: {e}"
            )));
        }

        info!("ACL rules for {} users saved to '{}'", user_count, path);
        Ok(())
    })
    .await;

    match save_result {
        Ok(result) => result,
        Err(join_err) => Err(AclError::AclFileIo(format!(
            "ACL SAVE task panicked: {join_err}"
        ))),
    }
}
