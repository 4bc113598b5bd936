pub mod config;

pub(crate) mod constants;

pub mod error;

pub mod application;

pub mod session;

pub mod transport;

pub mod utils;
