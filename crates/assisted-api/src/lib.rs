//! OpenShift Assisted Installer API client
//!
//! Two operations against the cluster-management API, each authenticated by
//! a fresh bearer token from Red Hat SSO:
//!
//! 1. download a cluster's credentials artifact to a local path, rewriting
//!    the file only when the fetched content actually differs (`changed`
//!    reports whether the file was touched), and
//! 2. apply a JSON patch to a cluster's install configuration.
//!
//! The operations are siblings: both go through the shared transport and
//! the auth crate, neither depends on the other.

mod client;
mod download;
mod error;
mod install_config;

pub use client::{API_BASE, Client, DownloadRequest, Outcome, PatchRequest};
pub use error::{Error, Result};
