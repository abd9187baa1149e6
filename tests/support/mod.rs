#![allow(dead_code)]

pub mod config_env;
pub mod mock_backend;
