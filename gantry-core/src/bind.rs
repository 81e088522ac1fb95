//! Typed parameter binding.
//!
//! [`FromParams`] converts a named raw parameter into a typed value for
//! controller consumption. Binding is total by contract: a missing or
//! unconvertible parameter yields the type's zero value so that a bad form
//! submission can never crash a request.
//!
//! File uploads bind to several shapes:
//! - `Vec<u8>` reads the upload content in memory, no temp file
//! - [`FormFile`] hands over the full upload handle
//! - `PathBuf` materializes the upload into a temp file owned by the
//!   request's [`Parameters`] and deleted when the request ends

use crate::form::FormFile;
use crate::logging::warn;
use crate::params::Parameters;
use std::path::PathBuf;

/// Conversion from a named request parameter to a typed value.
pub trait FromParams: Sized {
    /// Bind the parameter `name`. Never fails; returns the zero value of
    /// the type when the parameter is missing or unconvertible.
    fn bind(params: &mut Parameters, name: &str) -> Self;
}

impl FromParams for String {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        params.get(name).unwrap_or_default().to_string()
    }
}

impl FromParams for bool {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        matches!(params.get(name), Some("true") | Some("1") | Some("on"))
    }
}

macro_rules! impl_from_params_numeric {
    ($($ty:ty),*) => {
        $(
            impl FromParams for $ty {
                fn bind(params: &mut Parameters, name: &str) -> Self {
                    params
                        .get(name)
                        .and_then(|raw| raw.trim().parse().ok())
                        .unwrap_or_default()
                }
            }
        )*
    };
}

impl_from_params_numeric!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl<T: FromParams> FromParams for Option<T> {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        if params.contains(name) {
            Some(T::bind(params, name))
        } else {
            None
        }
    }
}

impl FromParams for Vec<String> {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        params.all(name).into_iter().map(str::to_string).collect()
    }
}

/// Upload content (or raw value bytes) read fully in memory.
impl FromParams for Vec<u8> {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        if let Some(file) = params.file(name) {
            return file.data.clone();
        }
        params
            .get(name)
            .map(|v| v.as_bytes().to_vec())
            .unwrap_or_default()
    }
}

impl FromParams for FormFile {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        params.file(name).cloned().unwrap_or_default()
    }
}

/// Binding an upload to a path forces a temp file write; the temp file is
/// owned by the request's `Parameters` and removed when the request ends.
impl FromParams for PathBuf {
    fn bind(params: &mut Parameters, name: &str) -> Self {
        let Some(file) = params.file(name) else {
            return PathBuf::new();
        };
        let path = std::env::temp_dir().join(format!("gantry-upload-{}", uuid::Uuid::new_v4()));
        let data = file.data.clone();
        match std::fs::write(&path, &data) {
            Ok(()) => {
                params.track_tmp_file(path.clone());
                path
            }
            Err(err) => {
                warn!(name, error = %err, "Failed to materialize upload to temp file");
                PathBuf::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::from_pairs(vec![
            ("name".to_string(), "Tokaj".to_string()),
            ("nights".to_string(), "3".to_string()),
            ("smoking".to_string(), "on".to_string()),
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("price".to_string(), "not-a-number".to_string()),
        ])
    }

    #[test]
    fn test_bind_scalars() {
        let mut p = params();
        let name: String = p.bind("name");
        let nights: u32 = p.bind("nights");
        let smoking: bool = p.bind("smoking");
        assert_eq!(name, "Tokaj");
        assert_eq!(nights, 3);
        assert!(smoking);
    }

    #[test]
    fn test_missing_binds_to_zero_value() {
        let mut p = params();
        let missing: String = p.bind("nope");
        let missing_n: i64 = p.bind("nope");
        let missing_b: bool = p.bind("nope");
        assert_eq!(missing, "");
        assert_eq!(missing_n, 0);
        assert!(!missing_b);
    }

    #[test]
    fn test_unconvertible_binds_to_zero_value() {
        let mut p = params();
        let price: f64 = p.bind("price");
        assert_eq!(price, 0.0);
    }

    #[test]
    fn test_bind_option_and_vec() {
        let mut p = params();
        let name: Option<String> = p.bind("name");
        let missing: Option<String> = p.bind("nope");
        let tags: Vec<String> = p.bind("tag");
        assert_eq!(name.as_deref(), Some("Tokaj"));
        assert_eq!(missing, None);
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_bind_file_in_memory_without_temp_write() {
        let mut p = params();
        p.add_file("photo", FormFile::new("a.png".into(), "image/png".into(), vec![1, 2, 3]));

        let bytes: Vec<u8> = p.bind("photo");
        let file: FormFile = p.bind("photo");
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(file.filename, "a.png");
        assert_eq!(p.tmp_file_count(), 0);
    }

    #[test]
    fn test_bind_path_materializes_and_tracks_temp_file() {
        let mut p = params();
        p.add_file("photo", FormFile::new("a.png".into(), "image/png".into(), vec![9, 9]));

        let path: PathBuf = p.bind("photo");
        assert!(path.exists());
        assert_eq!(p.tmp_file_count(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), vec![9, 9]);

        let missing: PathBuf = p.bind("nope");
        assert_eq!(missing, PathBuf::new());
        drop(p);
        assert!(!path.exists());
    }
}
