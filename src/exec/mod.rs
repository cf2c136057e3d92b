// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ActionInvoker` trait and the production
//!   `CommandInvoker`; tests swap in a fake implementation.
//! - [`task_runner`] spawns one command, streams and captures its output.
//! - [`dir`] maps a project's remote descriptor to its working directory.

pub mod backend;
pub mod dir;
pub mod task_runner;

pub use backend::{ActionInvoker, CommandInvoker, InvokeFuture};
pub use dir::{DirResolver, RemoteDirResolver};
