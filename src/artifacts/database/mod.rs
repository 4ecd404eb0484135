//! Values read back out of the object store
//!
//! A `DatabaseEntry` is what a tree says about one path: which object sits
//! there and with what mode. Path-keyed maps of these back diff, status and
//! switch.

pub mod database_entry;
