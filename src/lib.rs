// Library surface shared by the binary and the headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod countdown;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod sentences;
pub mod session;
pub mod ui;
