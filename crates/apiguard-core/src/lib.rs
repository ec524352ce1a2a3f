//! Core types and configuration for apiguard.
//!
//! This crate provides the data structures shared by every apiguard crate:
//! - [`ast`] - Arena-backed syntax tree the host parser lowers into
//! - [`types`] - Call events, guard contexts, anchors, and chain records
//! - [`config`] - Configuration loading from `.apiguard/apiguard.json`
//! - [`hash`] - Deterministic finding identifiers (base62 of xxhash64)

pub mod ast;
pub mod config;
pub mod hash;
pub mod types;
