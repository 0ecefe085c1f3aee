use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// Name of the multipart field that carries uploaded files.
pub const FILES_FIELD: &str = "files";

/// One file part from a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// A fully drained multipart body: file parts in arrival order plus text fields.
#[derive(Debug, Default)]
pub struct FormUpload {
    pub files: Vec<FilePart>,
    pub fields: HashMap<String, String>,
}

impl FormUpload {
    /// Reads every part. Parts named [`FILES_FIELD`] become files; other named parts are text.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormUpload::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILES_FIELD {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                form.files.push(FilePart {
                    file_name,
                    content_type,
                    data,
                });
            } else if !name.is_empty() {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Fails with a validation error when the body carried no files.
    pub fn require_files(&self) -> Result<(), AppError> {
        if self.files.is_empty() {
            return Err(AppError::Validation(format!(
                "No files provided in '{FILES_FIELD}' field"
            )));
        }
        Ok(())
    }

    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}
