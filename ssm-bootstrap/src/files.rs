use std::collections::BTreeMap;
use std::fs::{File, FileTimes, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use chrono::{DateTime, Utc};

const FILE_MODE: u32 = 0o644;

fn open_target(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options.open(path)
}

/// Write a parameter value as the entire file body, then stamp both access
/// and modification time with the parameter's last-modified timestamp so
/// consumers can detect upstream changes by stat-ing the file.
///
/// The file is truncated in place; parent directories must already exist.
pub fn write_config_file(path: &Path, value: &str, last_modified: DateTime<Utc>) -> io::Result<()> {
    let mut file = open_target(path)?;
    file.write_all(value.as_bytes())?;

    let times = FileTimes::new()
        .set_accessed(last_modified.into())
        .set_modified(last_modified.into());
    file.set_times(times)
}

/// Write one `NAME="VALUE"` line per pair, sorted by name. Values are written
/// verbatim with no escaping; a value containing a double quote or newline
/// produces a line shell-sourcing tools cannot parse.
pub fn write_env_file(path: &Path, envs: &BTreeMap<String, String>) -> io::Result<()> {
    let mut file = open_target(path)?;

    for (name, value) in envs {
        file.write_all(format!("{}=\"{}\"\n", name, value).as_bytes())?;
    }

    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use std::time::SystemTime;
    use tempfile::tempdir;

    #[test]
    fn test_write_config_file_content_and_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        let last_modified = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        write_config_file(&path, "historical content", last_modified).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "historical content");
        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(modified, SystemTime::from(last_modified));
    }

    #[test]
    fn test_write_config_file_empty_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        write_config_file(&path, "", Utc::now()).unwrap();

        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_write_config_file_truncates_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "something much longer than the new value").unwrap();

        write_config_file(&path, "short", Utc::now()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_write_config_file_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent").join("config");

        assert!(write_config_file(&path, "content", Utc::now()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_config_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        write_config_file(&path, "content", Utc::now()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_write_env_file_sorted_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.env");

        let envs = BTreeMap::from([
            ("DB_PORT".to_string(), "5432".to_string()),
            ("DB_HOST".to_string(), "localhost".to_string()),
            ("DB_PASSWORD".to_string(), "secret".to_string()),
        ]);

        write_env_file(&path, &envs).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "DB_HOST=\"localhost\"\nDB_PASSWORD=\"secret\"\nDB_PORT=\"5432\"\n"
        );
    }

    #[test]
    fn test_write_env_file_empty_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.env");

        write_env_file(&path, &BTreeMap::new()).unwrap();

        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_write_env_file_values_are_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.env");

        let envs = BTreeMap::from([
            ("SPACES".to_string(), "value with spaces".to_string()),
            ("NEWLINES".to_string(), "line1\nline2".to_string()),
        ]);

        write_env_file(&path, &envs).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "NEWLINES=\"line1\nline2\"\nSPACES=\"value with spaces\"\n"
        );
    }

    #[test]
    fn test_write_env_file_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.env");
        fs::write(&path, "OLD=\"stale\"\n").unwrap();

        let envs = BTreeMap::from([("FRESH".to_string(), "new".to_string())]);
        write_env_file(&path, &envs).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "FRESH=\"new\"\n");
    }
}
