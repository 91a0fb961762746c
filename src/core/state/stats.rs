// src/core/state/stats.rs

//! Server-wide counters.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct StatsState {
    total_connections: AtomicU64,
    total_commands: AtomicU64,
    /// Commands refused by the ACL check.
    rejected_commands: AtomicU64,
    auth_failures: AtomicU64,
    /// Connections closed because their user was deleted.
    killed_connections: AtomicU64,
}

impl StatsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    pub fn increment_total_commands(&self) {
        self.total_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_commands(&self) -> u64 {
        self.total_commands.load(Ordering::Relaxed)
    }

    pub fn increment_rejected_commands(&self) {
        self.rejected_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_rejected_commands(&self) -> u64 {
        self.rejected_commands.load(Ordering::Relaxed)
    }

    pub fn increment_auth_failures(&self) {
        self.auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_auth_failures(&self) -> u64 {
        self.auth_failures.load(Ordering::Relaxed)
    }

    pub fn add_killed_connections(&self, count: u64) {
        self.killed_connections.fetch_add(count, Ordering::Relaxed);
    }

    pub fn get_killed_connections(&self) -> u64 {
        self.killed_connections.load(Ordering::Relaxed)
    }
}
