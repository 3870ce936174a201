pub mod constants;
pub mod error;
pub mod game;
pub mod mod_dto;
pub mod paths;
