//! Cordkit - client-side execution core for a chat service REST API
//!
//! Cordkit issues deferred operations against the remote API, turns raw
//! responses into exactly-once success or failure outcomes, and keeps
//! identity-keyed registries of the entities those operations return.
//!
//! # Architecture
//!
//! - [`core`] - Identity type and configuration
//! - [`entity`] - The `Entity` contract and id-only equality
//! - [`entities`] - Concrete entity kinds (users, webhooks, applications, ...)
//! - [`registry`] - Thread-safe, snapshot-returning entity registries
//! - [`lazy`] - Once-initialized shared companions
//! - [`rest`] - Routes, the deferred operation primitive, requesters
//! - [`builder`] - Payload to entity conversion
//! - [`ingest`] - Registry write path for the event pipeline
//! - [`session`] - The owning session
//! - [`client`] - Client-account features
//!
//! # Correctness Invariants
//!
//! 1. Two entities of one kind are equal iff their ids are equal
//! 2. Every queued operation completes exactly once
//! 3. Registry views are snapshots; callers cannot mutate a registry
//! 4. A lazily created companion is constructed at most once per owner
//!
//! # Example
//!
//! ```ignore
//! use cordkit::session::Session;
//!
//! let session = Session::builder(token).build()?;
//! let client = session.as_client()?;
//!
//! for app in client.applications().complete().await? {
//!     println!("{app}");
//! }
//! ```

pub mod builder;
pub mod client;
pub mod core;
pub mod entities;
pub mod entity;
pub mod ingest;
pub mod lazy;
pub mod registry;
pub mod rest;
pub mod session;
