//! Skein - crawl issue dependency graphs across tracking services.
//!
//! This crate provides the collaborators around the [`skein_graph`] crawling
//! core: host API clients for GitHub and GitLab, regex-based reference
//! mining over comment text, token configuration, and the CLI with its
//! rendering surfaces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod hosts;
pub mod mining;
pub mod output;

pub use error::{Error, Result};
