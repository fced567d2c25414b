//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate normalization and repository calls into use-case APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod record_store;
