pub mod handlers;

use uuid::Uuid;

use crate::scoring::extract::file_extension;

/// Random object key that keeps the original file's extension.
pub fn unique_object_name(original_name: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), file_extension(original_name))
}
