//! Core use-case services.
//!
//! # Responsibility
//! - Wrap repository calls into the `Outcome` envelope outer layers return.
//! - Keep outer interfaces decoupled from storage details.

pub mod department_service;
pub mod employee_service;
pub mod outcome;
