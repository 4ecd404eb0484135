#![allow(dead_code)]

pub mod command;
pub mod file;

/// Read a file below the repository as a string, panicking with the path
pub fn read_to_string(path: &std::path::Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
}
