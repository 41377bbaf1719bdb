//! RepoScout — desktop client for an open-source repository
//! recommendation service.
//!
//! This library crate exposes all modules for use by the binaries and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod pages;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
