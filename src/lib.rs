//! focus-check
//!
//! An interactive client for a Bayesian concentration-risk inference
//! service. A declarative question catalog drives a live evidence form;
//! the collected evidence is submitted to the service and the returned
//! classification, score, advice, and what-if improvements are mapped to
//! deterministic visual states.
//!
//! # Architecture
//!
//! ```text
//! Schema ──▶ EvidenceStore ──▶ DiagnoseRequest ──▶ DiagnosisClient ──▶ inference service
//!                                                        │
//!                              DiagnosisScreen ◀─────────┘
//!                              (Idle/Loading/Success/Failed)
//! ```
//!
//! The inference engine itself (Bayesian network, sensitivity analysis,
//! feedback learning) lives server-side and is opaque to this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod evidence;
pub mod presenter;
pub mod schema;
pub mod wire;
