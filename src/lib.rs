//! namedsql - SQL files as Spring Data named queries
//!
//! namedsql is a CLI tool and library that finds `@Query` annotations whose
//! `name`/`countName` reference `.sql` resources, reads those files, and merges
//! their contents into the `META-INF/*-named-queries.properties` files the
//! data-access framework loads at runtime. Missing or unreadable resources are
//! reported together in one pass.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands, reporting, exit status)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, resolution and merge pipeline
//! - `issues`: Issue type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
