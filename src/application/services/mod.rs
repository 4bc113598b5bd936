pub mod access_policy;

pub mod assembler;

pub mod crawler;

pub mod pagination;

pub mod profile_service;
