//! Shared test utilities for repo-deck integration tests
//!
//! `repository` builds base folders full of repositories, `fakes` provides
//! recording stand-ins for every collaborator seam and `assertions` holds
//! output predicates for the binary tests.

pub mod assertions;
pub mod fakes;
pub mod repository;
