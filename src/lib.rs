pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod ingest;
pub mod render;
pub mod reveal;
pub mod screens;
pub mod service;
