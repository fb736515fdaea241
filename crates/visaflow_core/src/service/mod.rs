//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository mutations and query views for the dashboard.
//! - Keep the view layer decoupled from storage details.

pub mod agency_service;
