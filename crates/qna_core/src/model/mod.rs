//! Question/answer domain model.
//!
//! # Responsibility
//! - Define the question aggregate, its answers and deletion audit records.
//! - Enforce ownership and lifecycle rules without touching storage.
//!
//! # Invariants
//! - Deletion is represented by soft-delete flags, never by removal.
//! - Every successful deletion yields one audit entry per deleted entity.

pub mod answer;
pub mod answers;
pub mod delete_history;
pub mod identity;
pub mod question;
