//! Bird species recommendation service.
//!
//! Serves species suggestions over HTTP from precomputed clustering
//! artifacts: per-user observation histories, per-cluster species
//! profiles, seasonal activity windows, and two cluster-level matrices.
//! The engine itself is pure and synchronous; all I/O lives in the
//! artifact loader and the API layer.

pub mod api;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
