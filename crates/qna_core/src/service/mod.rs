//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls around domain operations.
//! - Keep callers decoupled from storage details.

pub mod question_service;
