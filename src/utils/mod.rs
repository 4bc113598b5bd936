pub mod logger;

pub mod urls;
