//! Backend bridge: command queue types and the worker thread hosting the session.

pub mod commands;
pub mod runtime;
