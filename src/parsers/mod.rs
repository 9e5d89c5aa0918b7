//! Input formats that can drive a [`crate::tree::DepTree`].

pub mod edge_list;

pub use edge_list::EdgeListParser;
