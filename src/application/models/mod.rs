pub mod connection;

pub mod post;

pub mod user;
