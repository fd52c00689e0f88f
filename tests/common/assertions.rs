//! Common assertion helpers for binary output validation

#![allow(dead_code)]

use predicates::prelude::*;

pub fn invalid_base() -> impl Predicate<str> {
    predicates::str::contains("Invalid base directory path")
}

pub fn listed(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!(" {name}\n"))
}

pub fn has_repositories_header() -> impl Predicate<str> {
    predicates::str::contains("Repositories in")
}

pub fn has_branch_info(branch: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Branch: {branch}"))
}

pub fn has_last_commit(message: &str) -> impl Predicate<str> {
    predicates::str::contains("Last commit:").and(predicates::str::contains(message.to_string()))
}
