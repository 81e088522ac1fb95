//! Form and multipart body support

use crate::Error;

/// Uploaded file data
#[derive(Debug, Clone, Default)]
pub struct FormFile {
    /// Original filename
    pub filename: String,

    /// Content type (MIME type)
    pub content_type: String,

    /// File data
    pub data: Vec<u8>,
}

impl FormFile {
    pub fn new(filename: String, content_type: String, data: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            data,
        }
    }

    /// File size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get file extension
    pub fn extension(&self) -> Option<&str> {
        self.filename.rsplit('.').next()
    }

    /// Write the file content to disk
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), Error> {
        std::fs::write(path, &self.data)
            .map_err(|e| Error::Internal(format!("Failed to save file: {}", e)))
    }
}

/// One part of a multipart form: a text field or an uploaded file
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub value: Option<String>,
    pub file: Option<FormFile>,
}

/// Multipart form data parser
pub struct MultipartParser {
    boundary: String,
}

impl MultipartParser {
    /// Create a new multipart parser from a Content-Type header value,
    /// e.g. `multipart/form-data; boundary=----WebKitFormBoundary`
    pub fn from_content_type(content_type: &str) -> Result<Self, Error> {
        let boundary = content_type
            .split(';')
            .find_map(|part| {
                let part = part.trim();
                part.strip_prefix("boundary=")
                    .map(|b| b.trim_matches('"').to_string())
            })
            .ok_or_else(|| Error::BadRequest("Missing boundary in Content-Type".to_string()))?;

        Ok(Self { boundary })
    }

    /// Parse multipart form data.
    ///
    /// `max_text_bytes` caps the cumulative in-memory size of non-file parts;
    /// exceeding it fails the parse with `PayloadTooLarge`.
    pub fn parse(&self, body: &[u8], max_text_bytes: usize) -> Result<Vec<FormField>, Error> {
        let mut fields = Vec::new();
        let boundary_marker = format!("--{}", self.boundary);
        let body_str = String::from_utf8_lossy(body);

        let mut text_bytes = 0usize;
        for part in body_str.split(boundary_marker.as_str()).skip(1) {
            let trimmed = part.trim();
            if trimmed == "--" || trimmed.is_empty() {
                continue;
            }

            if let Some(field) = self.parse_part(part)? {
                if let Some(value) = &field.value {
                    text_bytes += value.len();
                    if text_bytes > max_text_bytes {
                        return Err(Error::PayloadTooLarge(format!(
                            "Multipart text fields exceed {} bytes",
                            max_text_bytes
                        )));
                    }
                }
                fields.push(field);
            }
        }

        Ok(fields)
    }

    fn parse_part(&self, part: &str) -> Result<Option<FormField>, Error> {
        // Each part begins with the line break that follows the boundary.
        let part = part
            .strip_prefix("\r\n")
            .or_else(|| part.strip_prefix('\n'))
            .unwrap_or(part);
        let lines: Vec<&str> = part.lines().collect();
        if lines.is_empty() {
            return Ok(None);
        }

        let mut name = None;
        let mut filename = None;
        let mut content_type = None;
        let mut content_start = 0;

        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                content_start = i + 1;
                break;
            }

            if line.starts_with("Content-Disposition:") {
                for attr in line.split(';') {
                    let attr = attr.trim();
                    if let Some(v) = attr.strip_prefix("name=") {
                        name = Some(v.trim_matches('"').to_string());
                    } else if let Some(v) = attr.strip_prefix("filename=") {
                        filename = Some(v.trim_matches('"').to_string());
                    }
                }
            } else if let Some(v) = line.strip_prefix("Content-Type:") {
                content_type = Some(v.trim().to_string());
            }
        }

        let name = name.ok_or_else(|| Error::BadRequest("Missing field name".to_string()))?;
        let content = lines[content_start..].join("\n").trim().to_string();

        if let Some(filename) = filename {
            let file = FormFile::new(
                filename,
                content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
                content.into_bytes(),
            );
            Ok(Some(FormField {
                name,
                value: None,
                file: Some(file),
            }))
        } else {
            Ok(Some(FormField {
                name,
                value: Some(content),
                file: None,
            }))
        }
    }
}
