// The binaries (spellbee, list_words), the integration tests and the
// criterion benches all build on this module tree.

pub mod app;
pub mod config;
pub mod event;
pub mod logging;
pub mod session;
pub mod speech;
pub mod ui;
pub mod words;
