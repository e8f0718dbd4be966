//! Request DTOs for the entries and comments tables.
//!
//! The row structs themselves ([`biograph_core::entry::Entry`] and
//! [`biograph_core::comment::Comment`]) live in `biograph-core` so the
//! client workspace can share them; repositories map rows by column name.

pub mod comment;
pub mod entry;
