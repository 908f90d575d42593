//! The starter configuration shipped inside the binary.

use std::io::ErrorKind;
use std::path::Path;

use crate::ConfigError;

/// Where the configuration is looked for when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

pub const TEMPLATE: &str = include_str!("../resources/config.template.yml");

/// Write [`TEMPLATE`] to `path` unless something is already there.
///
/// Returns `false` when `path` already exists; its content is left alone.
pub fn write_template(path: &Path) -> Result<bool, ConfigError> {
    let write_error = |e: std::io::Error| ConfigError::WriteError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let mut file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_error(e)),
    };
    std::io::Write::write_all(&mut file, TEMPLATE.as_bytes()).map_err(write_error)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceConfig;

    #[test]
    fn template_is_valid() {
        let config = ServiceConfig::from_yaml_str(TEMPLATE).unwrap();
        assert!(!config.endpoints.is_empty());
        for endpoint in &config.endpoints {
            assert!(endpoint.validate().is_ok(), "{endpoint:?}");
        }
        assert!(config.default_payload.is_some());
    }

    #[test]
    fn writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.yml");

        assert!(write_template(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TEMPLATE);

        std::fs::write(&path, "listeningPort: 9000\n").unwrap();
        assert!(!write_template(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "listeningPort: 9000\n"
        );
    }
}
