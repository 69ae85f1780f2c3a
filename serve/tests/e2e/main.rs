//! End-to-end tests: real server on 127.0.0.1:0, driven over HTTP with reqwest.

mod chat;
mod common;
mod gateway_client;
mod health;
