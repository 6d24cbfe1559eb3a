//! notes-core - Core library for Notes
//!
//! This crate contains the shared note model, store backends, anonymous auth
//! client, sensor filters, and screen logic used by the Notes interfaces
//! (mobile shell and CLI).

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod screens;
pub mod sensors;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId};
pub use store::NoteStore;
