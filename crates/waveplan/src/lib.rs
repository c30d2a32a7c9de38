//! Waveplan - dependency analysis for GSD plan documents.
//!
//! This crate provides both a CLI application and a library that loads the
//! plan documents of one phase, builds their dependency graph, detects
//! circular dependencies and computes a wave execution schedule.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod analysis;
pub mod domain;
pub mod error;
pub mod graph;
pub mod loader;

// Application context and configuration
pub mod app;
pub mod config;

// Public CLI module (needed by binary)
pub mod cli;

// Rendering of analysis results
pub mod output;
