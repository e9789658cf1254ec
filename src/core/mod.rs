//! core
//!
//! Core domain types and configuration for Cordkit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Snowflake
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid ids from reaching routes or registries
//! - Schemas are strict and self-describing

pub mod config;
pub mod types;
