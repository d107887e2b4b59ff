//! Command handlers

pub mod bootstrap;
