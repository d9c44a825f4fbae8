//! Document parsing utilities
//!
//! This module contains the single-pass passes that turn decoded content
//! into structure: classification, sectioning, and the table and image
//! associators.

pub(crate) mod formatting;
pub(crate) mod heading;
pub(crate) mod image;
pub(crate) mod list;
pub(crate) mod numbering;
pub(crate) mod sections;
pub(crate) mod table;
