// Copyright (c) 2025 Omer
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # nslabel - Namespace label operator for Kubernetes
//!
//! `nslabel` lets users declare the labels they want on a Namespace through a
//! `NamespaceLabel` custom resource living in that Namespace. The operator
//! applies those labels, records which ones it owns, and removes exactly those
//! when the resource is deleted. Labels written by anyone else are never
//! touched.
//!
//! ## Modules
//!
//! - [`crd`] - `NamespaceLabel` custom resource definition
//! - [`reconcilers`] - Partitioning, merging, cleanup and the reconciliation pass
//! - [`controller`] - kube-runtime controller wiring and requeue policy
//! - [`client`] - Kubernetes API seam used by the reconciler
//! - [`context`] - Shared context passed to every pass
//! - [`config`] - Command line and environment configuration
//! - [`webhook`] - Validating admission webhook
//! - [`server`] - Metrics, health and admission HTTP server
//!
//! ## Example
//!
//! ```rust,no_run
//! use nslabel::crd::{NamespaceLabel, NamespaceLabelSpec};
//! use std::collections::BTreeMap;
//!
//! let mut labels = BTreeMap::new();
//! labels.insert("team".to_string(), "payments".to_string());
//!
//! let nslabel = NamespaceLabel::new("payments", NamespaceLabelSpec { labels });
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod crd;
pub mod errors;
pub mod labels;
pub mod metrics;
pub mod reconcilers;
pub mod server;
pub mod webhook;

#[cfg(test)]
mod crd_tests;
