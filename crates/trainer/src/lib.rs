pub mod app;
pub mod command;
pub mod modal;
pub mod navigator;
pub mod tasks;
pub mod terminal;
