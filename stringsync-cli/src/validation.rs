use std::path::Path;

/// Validate file path exists and is a regular file
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// The target may be missing, but it must not be a directory
pub fn validate_target_path(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Target path cannot be empty".to_string());
    }
    if Path::new(path).is_dir() {
        return Err(format!("Target path is a directory: {}", path));
    }
    Ok(())
}

/// Validate the batch output directory exists or can be created
pub fn validate_output_dir(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if path_obj.exists() {
        if !path_obj.is_dir() {
            return Err(format!("Output path is not a directory: {}", path));
        }
        return Ok(());
    }

    std::fs::create_dir_all(path_obj)
        .map_err(|e| format!("Cannot create output directory '{}': {}", path, e))
}

pub fn validate_batch_size(batch_size: usize) -> Result<(), String> {
    if batch_size == 0 {
        return Err("Batch size must be at least 1".to_string());
    }
    Ok(())
}
