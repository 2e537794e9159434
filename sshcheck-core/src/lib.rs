//! # sshcheck core
//!
//! Probes fleets of near-identical hosts, grouped by team, for working SSH
//! credentials and keeps a live registry of which (team, host) pairs are
//! currently accessible.
//!
//! ## Overview
//!
//! - [`targets`]: credential list and per-team host template loading
//! - [`probe`]: single-attempt credential testers (live ssh or demo)
//! - [`orchestration`]: per-team fan-out and the continuous scan loop
//! - [`registry`]: the upsert-and-expire credential store and its HTTP client
//! - [`scoring`]: pwnboard box-access callbacks
//! - [`api`]: route constants and wire payloads shared with the server
//!
//! ## Example
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use sshcheck_core::{
//!     orchestration::{ProbeOrchestrator, ScanLoop, TeamSelection},
//!     probe::DemoCredentialTester,
//!     registry::RegistryClient,
//!     targets::HostTemplate,
//!     types::CredentialPair,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! async fn scan() -> sshcheck_core::Result<()> {
//!     let registry = Arc::new(RegistryClient::new(
//!         "http://127.0.0.1:5000",
//!         Duration::from_secs(5),
//!     )?);
//!     let orchestrator = ProbeOrchestrator::new(
//!         Arc::new(DemoCredentialTester::new(Duration::from_secs(1))),
//!         registry,
//!     );
//!     let scan = ScanLoop::new(
//!         orchestrator,
//!         TeamSelection::Range(2),
//!         vec![HostTemplate::new("10.X.1.1")],
//!         vec![CredentialPair::new("root", "toor")],
//!     )
//!     .with_max_passes(Some(1));
//!
//!     let report = scan.run(CancellationToken::new()).await;
//!     println!("{} credentials confirmed", report.succeeded);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Route constants and wire payloads shared by the registry service and its
/// clients
pub mod api;
/// Error types
pub mod error;
/// Team pass fan-out and the continuous scan loop
pub mod orchestration;
/// Credential testers
pub mod probe;
/// Credential registry store and HTTP client
pub mod registry;
/// Scoring service callbacks
pub mod scoring;
/// Credential and host template inputs
pub mod targets;
/// Core data model
pub mod types;

pub use error::{CoreError, Result};
