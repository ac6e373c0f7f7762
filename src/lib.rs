//! Library crate for contact-tui.
//!
//! This crate exposes the building blocks of the contact form TUI:
//! - Application state, event loop and config files (`app`)
//! - Contact form model and validation (`form`)
//! - Modal dialog lifecycle, markup loading and focus (`modal`)
//! - Google Form submission relay (`relay`)
//! - UI rendering (`ui`)
//!
//! It is used by the `contact-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod error;
pub mod form;
pub mod logging;
pub mod modal;
pub mod relay;
pub mod ui;

pub use error::{ContactError, Result};
