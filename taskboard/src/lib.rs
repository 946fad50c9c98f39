//! Taskboard: kanban board state engine.
//!
//! The [`tasks::TaskStore`] owns canonical task state, the
//! [`board::Board`] keeps per-column drag order in step with it, and the
//! drag controller turns pointer events into status changes and deletions.

pub mod board;
pub mod commands;
pub mod config;
pub mod persist;
pub mod tasks;
pub mod ui;
