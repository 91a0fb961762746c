// src/core/acl/category.rs

//! The category/command index: a read-only map from ACL category to the
//! command tokens tagged with it, built once from the static command table.

use crate::core::commands::command_spec::{COMMAND_TABLE, CommandSpec};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// The process-wide index over `COMMAND_TABLE`.
    pub static ref CATEGORY_INDEX: CategoryIndex = CategoryIndex::from_table(COMMAND_TABLE);
}

#[derive(Debug, Default)]
pub struct CategoryIndex {
    /// Category name to command tokens, both in discovery order.
    commands_by_category: IndexMap<String, Vec<String>>,
    categories_by_command: HashMap<String, Vec<String>>,
    /// Names of commands that only exist through their subcommands.
    parents: HashSet<String>,
}

impl CategoryIndex {
    /// Walks every top-level command and its subcommands. A command with
    /// subcommands contributes only `parent|child` tokens.
    pub fn from_table(table: &[CommandSpec]) -> Self {
        let mut index = Self::default();
        for spec in table {
            if spec.subcommands.is_empty() {
                index.record(spec.name.to_string(), spec.categories);
            } else {
                index.parents.insert(spec.name.to_string());
                for sub in spec.subcommands {
                    index.record(format!("{}|{}", spec.name, sub.name), sub.categories);
                }
            }
        }
        index
    }

    fn record(&mut self, token: String, categories: &[&str]) {
        for category in categories {
            self.commands_by_category
                .entry(category.to_string())
                .or_default()
                .push(token.clone());
        }
        self.categories_by_command.insert(
            token,
            categories.iter().map(|c| c.to_string()).collect(),
        );
    }

    /// The categories of a command token. Empty for unknown tokens.
    pub fn categories_of(&self, token: &str) -> &[String] {
        self.categories_by_command
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The command tokens tagged with `category`, matched case-insensitively.
    pub fn commands_of(&self, category: &str) -> Option<&[String]> {
        self.commands_by_category
            .get(category.to_ascii_lowercase().as_str())
            .map(Vec::as_slice)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.commands_by_category.keys().map(String::as_str)
    }

    pub fn is_known_category(&self, category: &str) -> bool {
        self.commands_by_category
            .contains_key(category.to_ascii_lowercase().as_str())
    }

    /// True for any full token and for the parent name of a subcommand group.
    pub fn is_known_command(&self, token: &str) -> bool {
        let token = token.to_ascii_lowercase();
        self.categories_by_command.contains_key(&token) || self.parents.contains(&token)
    }
}
