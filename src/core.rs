pub mod cache;
pub mod collection;
pub mod descriptor_parser;
pub mod descriptor_reader;
pub mod descriptor_writer;
pub mod discovery;
pub mod game;
pub mod installer;
pub mod lock_policy;
pub mod mod_service;
pub mod progress;
pub mod source_resolver;
