//! Application framework based on an explicit component [container](container::ComponentContainer).
//!
//! Traditional applications start in the `main()` function and explicitly initialize and pass
//! around various domain/application services. Here, all application components are registered in
//! a single container at startup, and depend on each other only through the abstractions stored in
//! it. This requires an entrypoint which takes the populated container and runs the actual business
//! logic of the application. This crate provides such entrypoint in the form of
//! [Application](application::Application), which also configures additional supporting
//! infrastructure, e.g. logging.

pub mod application;
pub mod config;
pub mod container;
pub mod future;
pub mod runner;
