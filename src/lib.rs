//! # Curtain - theatre production records
//!
//! A command-line utility and library for keeping track of a theatre's
//! productions: the plays and their authors, directors, actors and roles,
//! theatres and their halls, and the rehearsals and performances that tie
//! them together.
//!
//! ## Features
//!
//! - **Listings**: sortable, searchable listings of every entity, with joined
//!   display columns (a role shows its play, a rehearsal its hall and theatre)
//! - **Validated editing**: typed records checked before they reach the store
//! - **Associations**: casts, rehearsal attendance and authorship replaced as
//!   whole sets inside one transaction
//! - **Statistics**: dashboard metrics filtered by period, director and theatre
//! - **Export**: CSV, JSON and Excel listings and an analytics report
//!
//! ## Usage
//!
//! ```rust,no_run
//! use curtain::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
