use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        Error::Decode(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        Error::Decode(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

pub fn from_value_with_path<T: DeserializeOwned>(json: &serde_json::Value) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(json).map_err(|err| {
        let path = err.path().to_string();
        Error::Decode(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

/// Read a file and deserialize it, naming the file on failure.
pub fn from_file_with_path<T: DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let bytes = std::fs::read(path)?;
    from_slice_with_path(&bytes).map_err(|err| match err {
        Error::Decode(msg) => Error::Decode(format!("{}: {msg}", path.display())),
        other => other,
    })
}
