//! IPC listener that accepts commands over a Unix socket.
//!
//! Browser glue, scripts, and test harnesses connect to the socket and send
//! newline-delimited JSON commands.

pub mod listener;
