//! Metadata document access.
//!
//! Every lookup states whether a key is required or what it defaults to, and
//! wire sentinels (`-1`, `0`, `""`) are mapped to `Option` only here.

use serde_json::{Map, Value};

use crate::headers::BackupType;
use crate::metadata::types::PackageState;
use crate::types::BackupError;

pub const JSON_METADATA: &str = "@meta@";
pub const JSON_METADATA_VERSION: &str = "version";
pub const JSON_METADATA_TOKEN: &str = "token";
pub const JSON_METADATA_SALT: &str = "salt";
pub const JSON_METADATA_TIME: &str = "time";
pub const JSON_METADATA_SDK_INT: &str = "sdk_int";
pub const JSON_METADATA_INCREMENTAL: &str = "incremental";
pub const JSON_METADATA_NAME: &str = "name";
pub const JSON_METADATA_D2D_BACKUP: &str = "d2d_backup";

pub const JSON_PACKAGE_TIME: &str = "time";
pub const JSON_PACKAGE_BACKUP_TYPE: &str = "backup_type";
pub const JSON_PACKAGE_STATE: &str = "state";
pub const JSON_PACKAGE_SIZE: &str = "size";
pub const JSON_PACKAGE_APP_NAME: &str = "name";
pub const JSON_PACKAGE_SYSTEM: &str = "system";
pub const JSON_PACKAGE_SYSTEM_LAUNCHER: &str = "system_launcher";
pub const JSON_PACKAGE_VERSION: &str = "version";
pub const JSON_PACKAGE_INSTALLER: &str = "installer";
pub const JSON_PACKAGE_SPLITS: &str = "splits";
pub const JSON_PACKAGE_SPLIT_NAME: &str = "name";
pub const JSON_PACKAGE_SHA256: &str = "sha256";
pub const JSON_PACKAGE_SIGNATURES: &str = "signatures";

/// Borrowed view of one JSON object, labelled for error messages.
#[derive(Debug, Clone, Copy)]
pub struct Obj<'a> {
    map: &'a Map<String, Value>,
    label: &'a str,
}

impl<'a> Obj<'a> {
    pub fn new(value: &'a Value, label: &'a str) -> Result<Self, BackupError> {
        match value {
            Value::Object(map) => Ok(Self { map, label }),
            other => Err(BackupError::InvalidMetadata(format!(
                "{}: expected object, found {}",
                label,
                kind(other)
            ))),
        }
    }

    pub fn label(&self) -> &'a str {
        self.label
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    fn missing(&self, key: &str) -> BackupError {
        BackupError::InvalidMetadata(format!("{}: missing field '{}'", self.label, key))
    }

    fn wrong(&self, key: &str, want: &str, v: &Value) -> BackupError {
        BackupError::InvalidMetadata(format!(
            "{}: field '{}' expected {}, found {}",
            self.label, key, want, kind(v)
        ))
    }

    pub fn require_object(&self, key: &str) -> Result<Obj<'a>, BackupError> {
        let v = self.get(key).ok_or_else(|| self.missing(key))?;
        match v {
            Value::Object(map) => Ok(Obj { map, label: self.label }),
            other => Err(self.wrong(key, "object", other)),
        }
    }

    pub fn require_i64(&self, key: &str) -> Result<i64, BackupError> {
        let v = self.get(key).ok_or_else(|| self.missing(key))?;
        v.as_i64().ok_or_else(|| self.wrong(key, "integer", v))
    }

    pub fn require_str(&self, key: &str) -> Result<&'a str, BackupError> {
        let v = self.get(key).ok_or_else(|| self.missing(key))?;
        v.as_str().ok_or_else(|| self.wrong(key, "string", v))
    }

    /// Absent or non-integer values yield `default`.
    pub fn opt_i64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    /// Absent or non-string values yield `default`.
    pub fn opt_str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Absent or non-boolean values yield `default`.
    pub fn opt_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// `None` when absent or not an array.
    pub fn opt_array(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a String> {
        self.map.keys()
    }

    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.get(key)
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---- wire sentinels ----

/// Negative size means "unknown"; zero is a real size.
#[inline]
pub fn size_from_wire(v: i64) -> Option<i64> {
    (v >= 0).then_some(v)
}

/// Version code `0` means "not recorded".
#[inline]
pub fn version_from_wire(v: i64) -> Option<i64> {
    (v != 0).then_some(v)
}

/// Empty string means "not recorded".
#[inline]
pub fn string_from_wire(v: &str) -> Option<String> {
    (!v.is_empty()).then(|| v.to_owned())
}

#[inline]
pub fn state_from_wire(v: &str) -> PackageState {
    PackageState::from_name(v)
}

#[inline]
pub fn backup_type_from_wire(v: &str) -> Option<BackupType> {
    BackupType::from_name(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_and_optional_lookups() {
        let v = json!({"a": 1, "b": "x", "c": true, "n": null, "s": "str"});
        let o = Obj::new(&v, "test").unwrap();

        assert_eq!(o.require_i64("a").unwrap(), 1);
        assert_eq!(o.require_str("b").unwrap(), "x");
        assert!(matches!(o.require_i64("missing"), Err(BackupError::InvalidMetadata(_))));
        assert!(matches!(o.require_i64("s"), Err(BackupError::InvalidMetadata(_))));
        assert!(matches!(o.require_i64("n"), Err(BackupError::InvalidMetadata(_))));

        assert_eq!(o.opt_i64_or("missing", -1), -1);
        assert_eq!(o.opt_i64_or("s", -1), -1);
        assert_eq!(o.opt_str_or("n", ""), "");
        assert!(o.opt_bool_or("c", false));
        assert!(o.opt_array("a").is_none());
    }

    #[test]
    fn non_object_is_invalid() {
        let v = json!([1, 2]);
        let err = Obj::new(&v, "root").unwrap_err();
        assert_eq!(err.to_string(), "invalid metadata: root: expected object, found array");
    }

    #[test]
    fn sentinels() {
        assert_eq!(size_from_wire(-1), None);
        assert_eq!(size_from_wire(-42), None);
        assert_eq!(size_from_wire(0), Some(0));
        assert_eq!(version_from_wire(0), None);
        assert_eq!(version_from_wire(7), Some(7));
        assert_eq!(string_from_wire(""), None);
        assert_eq!(string_from_wire("x").as_deref(), Some("x"));
        assert_eq!(state_from_wire(""), PackageState::ApkAndData);
        assert_eq!(state_from_wire("SOMETHING_NEW"), PackageState::UnknownError);
        assert_eq!(backup_type_from_wire("FULL"), Some(BackupType::Full));
        assert_eq!(backup_type_from_wire("kv"), None);
    }
}
