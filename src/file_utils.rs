//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use dirs;
use std::path::PathBuf;

use crate::error::{ia_err, MarkLogicError};

/// Generates the absolute file path of the path provided based on the underlying platform
///
/// # Arguments
///
/// * `file_path`: The file path that needs to be corrected
///
/// # Returns
///
/// The absolute file path to be used based on the platform being used, or an
/// error if the path starts with `~` and there is no home directory
///
pub(crate) fn expand_user_home(file_path: &str) -> Result<String, MarkLogicError> {
    if file_path.starts_with("~/") || file_path.starts_with("~\\") {
        match dirs::home_dir() {
            Some(home_dir) => {
                let full_path = home_dir.join(PathBuf::from(correct_path(&file_path[2..])));
                Ok(format!("{}", full_path.display()))
            }
            None => ia_err!("cannot expand '{}': no home directory", file_path),
        }
    } else {
        Ok(String::from(file_path))
    }
}

/// Read a whole file into a string, expanding a leading `~` first.
pub(crate) fn file_to_string(file_path: &str) -> Result<String, MarkLogicError> {
    let path = expand_user_home(file_path)?;
    match std::fs::read_to_string(&path) {
        Ok(s) => Ok(s),
        Err(e) => Err(MarkLogicError::new(
            crate::error::MarkLogicErrorCode::IoError,
            &format!("error reading file '{}': {}", path, e),
        )),
    }
}

// Use the platform's path separator.
fn correct_path(file_path: &str) -> String {
    if cfg!(target_os = "windows") {
        file_path.replace('/', "\\")
    } else {
        String::from(file_path)
    }
}
