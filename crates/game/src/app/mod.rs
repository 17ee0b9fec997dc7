mod art;
mod bootstrap;
mod config;
mod drag;
mod entity;
mod genetics;
mod loop_runner;
mod motion;
mod puzzle;
mod scenes;
mod session;
mod state;

pub(crate) use bootstrap::{build_app, BootstrapError};
pub(crate) use loop_runner::run;
