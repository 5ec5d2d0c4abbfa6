//! Flutter-facing bridge crate for TaskTrack core.

pub mod api;
