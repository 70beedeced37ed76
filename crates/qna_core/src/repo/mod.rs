//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence collaborator used by the deletion use-case.
//! - Isolate SQLite query details from domain and service code.
//!
//! # Invariants
//! - Rows are soft-deleted through flag updates; nothing is hard-deleted.
//! - A deletion's flag updates and history rows commit together.

pub mod question_repo;
