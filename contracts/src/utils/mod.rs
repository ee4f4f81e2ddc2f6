//! Common utilities shared by the proxy and access modules.
pub mod context;
pub mod events;
pub mod structs;
