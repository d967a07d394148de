//! Configuration management for secure-keygen
//!
//! Handles:
//! - Where key files go and how they are written
//! - Loading PBES2 protection settings from JSON

mod storage;

pub use storage::{
    default_key_file_name, default_key_path, get_ssh_dir, load_protection_config,
    public_key_path, save_key_files,
};
