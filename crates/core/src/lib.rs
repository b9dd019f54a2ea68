//! Batdeck domain logic.
//!
//! Catalogue construction (discovery + declared entries), path resolution,
//! script execution and whole-document content access. Nothing here knows
//! about HTTP; the `api` crate wires these pieces to the transport.

pub mod catalog_config;
pub mod codepage;
pub mod content;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod paths;
pub mod registry;
pub mod reveal;
pub mod scripting;
