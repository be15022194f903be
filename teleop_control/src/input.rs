//! Input mapping root.

pub mod mapper;
