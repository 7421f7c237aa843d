//! sun-fe: the sun web console shell.
//!
//! The library holds what the console runs on (session state, route table,
//! response guard, API client). The `sun-fe` binary serves the built bundle
//! and proxies API calls to the backend.

pub mod app;
pub mod cli;
pub mod client;
pub mod colors;
pub mod config;
pub mod console;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod navigation;
pub mod notify;
pub mod routes;
pub mod session;
pub mod state;
pub mod util;
