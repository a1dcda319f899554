//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and DTO mapping into use-case level APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod person_service;
