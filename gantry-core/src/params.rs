//! Unified request parameters.
//!
//! [`Parameters`] joins the URL query string, url-encoded form values and
//! multipart text fields into one ordered multi-map, with uploaded files
//! kept alongside. Query values always come first; body values are appended
//! in their own order. A malformed body degrades to query-only parameters;
//! it never fails the request.

use crate::form::{FormFile, MultipartParser};
use crate::http::HttpRequest;
use crate::logging::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory cap for non-file multipart parts (32 MiB)
pub const MAX_MULTIPART_MEMORY: usize = 32 << 20;

/// A unified view of the request parameters:
/// URL query string, form values and file uploads.
#[derive(Debug, Default)]
pub struct Parameters {
    values: Vec<(String, String)>,
    files: HashMap<String, Vec<FormFile>>,
    /// Temp files materialized for path-backed bindings, deleted on Drop.
    tmp_files: Vec<PathBuf>,
}

impl Parameters {
    /// Parse the unified parameters out of a request.
    ///
    /// The query string is always parsed. The body is parsed according to
    /// the declared content type: url-encoded forms and multipart forms are
    /// merged after the query values; anything else is ignored.
    pub fn parse(req: &HttpRequest) -> Self {
        let mut values: Vec<(String, String)> = match serde_urlencoded::from_str(&req.query) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "Error parsing query string");
                Vec::new()
            }
        };
        let mut files: HashMap<String, Vec<FormFile>> = HashMap::new();

        match req.content_type() {
            Some("application/x-www-form-urlencoded") => {
                match serde_urlencoded::from_bytes::<Vec<(String, String)>>(&req.body) {
                    Ok(form) => values.extend(form),
                    Err(err) => warn!(error = %err, "Error parsing request body"),
                }
            }
            Some("multipart/form-data") => {
                let parsed = req
                    .header("content-type")
                    .ok_or_else(|| crate::Error::BadRequest("Missing Content-Type".to_string()))
                    .and_then(MultipartParser::from_content_type)
                    .and_then(|parser| parser.parse(&req.body, MAX_MULTIPART_MEMORY));
                match parsed {
                    Ok(fields) => {
                        for field in fields {
                            if let Some(value) = field.value {
                                values.push((field.name, value));
                            } else if let Some(file) = field.file {
                                files.entry(field.name).or_default().push(file);
                            }
                        }
                    }
                    Err(err) => warn!(error = %err, "Error parsing multipart body"),
                }
            }
            _ => {}
        }

        Self {
            values,
            files,
            tmp_files: Vec::new(),
        }
    }

    /// All values for a name, in merge order (query first, then body)
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value for a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a value or a file was submitted under this name
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some() || self.files.contains_key(name)
    }

    /// The full ordered multi-map
    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    /// Uploaded files for a field name
    pub fn files(&self, name: &str) -> &[FormFile] {
        self.files.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First uploaded file for a field name
    pub fn file(&self, name: &str) -> Option<&FormFile> {
        self.files(name).first()
    }

    /// Bind a named parameter to a typed representation.
    ///
    /// Binding is total: a missing or unconvertible value yields the type's
    /// zero value, never an error.
    pub fn bind<T: crate::bind::FromParams>(&mut self, name: &str) -> T {
        T::bind(self, name)
    }

    /// Bind dotted-path parameters (`booking.check_in`) into a struct.
    ///
    /// Leaves are tried as strings first; if the target rejects that shape,
    /// a second pass coerces numeric and boolean leaves. Any remaining
    /// mismatch falls back to the struct's default.
    pub fn bind_struct<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let tree = self.value_tree(name, false);
        match serde_json::from_value(tree) {
            Ok(bound) => bound,
            Err(_) => {
                let coerced = self.value_tree(name, true);
                match serde_json::from_value(coerced) {
                    Ok(bound) => bound,
                    Err(err) => {
                        warn!(name, error = %err, "Struct binding failed, using default");
                        T::default()
                    }
                }
            }
        }
    }

    fn value_tree(&self, name: &str, coerce: bool) -> Value {
        let prefix = format!("{}.", name);
        let mut root = serde_json::Map::new();
        for (key, raw) in &self.values {
            let Some(path) = key.strip_prefix(&prefix) else {
                continue;
            };
            let leaf = if coerce { coerce_value(raw) } else { Value::String(raw.clone()) };
            let segments: Vec<&str> = path.split('.').collect();
            insert_path(&mut root, &segments, leaf);
        }
        Value::Object(root)
    }

    /// Track a temp file created for a binding; owned and deleted on Drop.
    pub(crate) fn track_tmp_file(&mut self, path: PathBuf) {
        self.tmp_files.push(path);
    }

    #[cfg(test)]
    pub(crate) fn tmp_file_count(&self) -> usize {
        self.tmp_files.len()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            values: pairs,
            files: HashMap::new(),
            tmp_files: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn add_file(&mut self, name: &str, file: FormFile) {
        self.files.entry(name.to_string()).or_default().push(file);
    }
}

fn insert_path(map: &mut serde_json::Map<String, Value>, segments: &[&str], leaf: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), leaf);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, leaf);
            }
        }
    }
}

fn coerce_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

impl Drop for Parameters {
    fn drop(&mut self) {
        for path in self.tmp_files.drain(..) {
            if let Err(err) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %err, "Failed to remove temp file");
            } else {
                debug!(path = %path.display(), "Removed temp file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urlencoded_request(query: &str, body: &str) -> HttpRequest {
        HttpRequest::new("POST", "/hotels")
            .with_query(query)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body.as_bytes().to_vec())
    }

    #[test]
    fn test_merge_order_query_then_body() {
        let req = urlencoded_request("a=1", "a=2&b=3");
        let params = Parameters::parse(&req);

        assert_eq!(params.all("a"), vec!["1", "2"]);
        assert_eq!(params.all("b"), vec!["3"]);
        assert_eq!(params.get("a"), Some("1"));
    }

    #[test]
    fn test_malformed_body_degrades_to_query_only() {
        let req = HttpRequest::new("POST", "/")
            .with_query("a=1")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(vec![0xff, 0xfe, 0xfd]);
        let params = Parameters::parse(&req);

        assert_eq!(params.all("a"), vec!["1"]);
        assert_eq!(params.values().len(), 1);
    }

    #[test]
    fn test_body_ignored_without_form_content_type() {
        let req = HttpRequest::new("POST", "/")
            .with_query("a=1")
            .with_body(b"b=2".to_vec());
        let params = Parameters::parse(&req);

        assert!(params.get("b").is_none());
    }

    #[test]
    fn test_multipart_fields_and_files() {
        let body = "--XX\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\
            \r\n\
            Lakeside\r\n\
            --XX\r\n\
            Content-Disposition: form-data; name=\"photo\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\
            \r\n\
            PNGDATA\r\n\
            --XX--\r\n";
        let req = HttpRequest::new("POST", "/upload")
            .with_query("kind=hotel")
            .with_header("Content-Type", "multipart/form-data; boundary=XX")
            .with_body(body.as_bytes().to_vec());
        let params = Parameters::parse(&req);

        assert_eq!(params.get("kind"), Some("hotel"));
        assert_eq!(params.get("title"), Some("Lakeside"));
        assert_eq!(params.files("photo").len(), 1);
        assert_eq!(params.file("photo").unwrap().filename, "a.png");
    }

    #[test]
    fn test_bind_struct_dotted_paths() {
        #[derive(serde::Deserialize, Default, PartialEq, Debug)]
        struct Booking {
            check_in: String,
            nights: u32,
        }

        let params = Parameters::from_pairs(vec![
            ("booking.check_in".to_string(), "2024-01-01".to_string()),
            ("booking.nights".to_string(), "3".to_string()),
        ]);
        let booking: Booking = params.bind_struct("booking");

        assert_eq!(
            booking,
            Booking {
                check_in: "2024-01-01".to_string(),
                nights: 3,
            }
        );
    }

    #[test]
    fn test_bind_struct_missing_defaults() {
        #[derive(serde::Deserialize, Default, PartialEq, Debug)]
        struct Booking {
            check_in: String,
        }

        let params = Parameters::from_pairs(vec![]);
        let booking: Booking = params.bind_struct("booking");
        assert_eq!(booking, Booking::default());
    }

    #[test]
    fn test_drop_removes_tmp_files() {
        let path = std::env::temp_dir().join("gantry-params-drop-test");
        std::fs::write(&path, b"x").unwrap();
        {
            let mut params = Parameters::from_pairs(vec![]);
            params.track_tmp_file(path.clone());
        }
        assert!(!path.exists());
    }
}
