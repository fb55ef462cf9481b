//! Application services around the data layer: configuration, validation,
//! forms, export, terminal views, user messages and the background worker.

pub mod config;
pub mod data_storage;
pub mod export;
pub mod form;
pub mod formatter;
pub mod messages;
pub mod state;
pub mod validators;
pub mod view;
pub mod worker;
