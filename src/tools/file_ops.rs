//! File operations on a single resolved path

use std::{
    fmt,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use crate::error::{Result, SirError};

/// Supported file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Create or truncate a file with the given content (`create` / `write`)
    Write,
    Read,
    Append,
    Delete,
    Mkdir,
    /// List a directory (`list` / `ls`)
    List,
}

impl FileOperation {
    /// Names accepted on the command line
    pub const NAMES: &'static [&'static str] =
        &["create", "read", "write", "append", "delete", "mkdir", "list"];
}

impl FromStr for FileOperation {
    type Err = SirError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" | "write" => Ok(Self::Write),
            "read" => Ok(Self::Read),
            "append" => Ok(Self::Append),
            "delete" => Ok(Self::Delete),
            "mkdir" => Ok(Self::Mkdir),
            "list" | "ls" => Ok(Self::List),
            _ => Err(SirError::InvalidInput(format!("Unknown operation: {s}"))),
        }
    }
}

/// What a completed operation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written(PathBuf),
    Read { path: PathBuf, content: String },
    Appended(PathBuf),
    Deleted(PathBuf),
    DirCreated(PathBuf),
    Listed { path: PathBuf, entries: Vec<String> },
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written(path) => write!(f, "File created: {}", path.display()),
            Self::Read { path, .. } => write!(f, "Content of {}", path.display()),
            Self::Appended(path) => write!(f, "Content appended to: {}", path.display()),
            Self::Deleted(path) => write!(f, "File deleted: {}", path.display()),
            Self::DirCreated(path) => write!(f, "Directory created: {}", path.display()),
            Self::Listed { path, .. } => write!(f, "Contents of {}", path.display()),
        }
    }
}

/// Resolve a path against the current directory and normalize `.`/`..`
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

fn file_error(path: &Path, err: &std::io::Error) -> SirError {
    SirError::File(format!("{}: {err}", path.display()))
}

/// Run one file operation on `path`; `content` defaults to empty
///
/// # Errors
///
/// Returns [`SirError::File`] when the underlying filesystem call fails
pub async fn run(operation: FileOperation, path: &Path, content: Option<&str>) -> Result<FileOutcome> {
    let path = resolve_path(path)?;
    let content = content.unwrap_or_default();
    debug!(?operation, path = %path.display(), "file operation");

    match operation {
        FileOperation::Write => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| file_error(parent, &e))?;
            }
            fs::write(&path, content)
                .await
                .map_err(|e| file_error(&path, &e))?;
            Ok(FileOutcome::Written(path))
        }
        FileOperation::Read => {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| file_error(&path, &e))?;
            Ok(FileOutcome::Read { path, content })
        }
        FileOperation::Append => {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
                .map_err(|e| file_error(&path, &e))?;
            file.write_all(content.as_bytes())
                .await
                .map_err(|e| file_error(&path, &e))?;
            file.flush().await.map_err(|e| file_error(&path, &e))?;
            Ok(FileOutcome::Appended(path))
        }
        FileOperation::Delete => {
            fs::remove_file(&path)
                .await
                .map_err(|e| file_error(&path, &e))?;
            Ok(FileOutcome::Deleted(path))
        }
        FileOperation::Mkdir => {
            fs::create_dir_all(&path)
                .await
                .map_err(|e| file_error(&path, &e))?;
            Ok(FileOutcome::DirCreated(path))
        }
        FileOperation::List => {
            let mut dir = fs::read_dir(&path)
                .await
                .map_err(|e| file_error(&path, &e))?;
            let mut entries = Vec::new();
            while let Some(entry) = dir.next_entry().await.map_err(|e| file_error(&path, &e))? {
                entries.push(entry.file_name().to_string_lossy().into_owned());
            }
            entries.sort();
            Ok(FileOutcome::Listed { path, entries })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_operations() {
        assert_eq!("CREATE".parse::<FileOperation>().unwrap(), FileOperation::Write);
        assert_eq!("ls".parse::<FileOperation>().unwrap(), FileOperation::List);
        assert!(matches!(
            "rename".parse::<FileOperation>(),
            Err(SirError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_path_normalizes() {
        let resolved = resolve_path(Path::new("/tmp/a/./b/../c.txt")).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/a/c.txt"));
        assert!(resolve_path(Path::new("relative.txt")).unwrap().is_absolute());
    }

    #[tokio::test]
    async fn test_write_read_append_delete() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("nested/deeper/notes.txt");

        let outcome = run(FileOperation::Write, &file, Some("hello")).await.unwrap();
        assert_eq!(outcome, FileOutcome::Written(file.clone()));

        run(FileOperation::Append, &file, Some(" world")).await.unwrap();

        match run(FileOperation::Read, &file, None).await.unwrap() {
            FileOutcome::Read { content, .. } => assert_eq!(content, "hello world"),
            other => panic!("unexpected outcome: {other:?}"),
        }

        // write truncates
        run(FileOperation::Write, &file, None).await.unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "");

        run(FileOperation::Delete, &file, None).await.unwrap();
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_mkdir_and_list() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("a/b");

        run(FileOperation::Mkdir, &sub, None).await.unwrap();
        run(FileOperation::Write, &sub.join("z.txt"), Some("z")).await.unwrap();
        run(FileOperation::Write, &sub.join("y.txt"), Some("y")).await.unwrap();

        match run(FileOperation::List, &sub, None).await.unwrap() {
            FileOutcome::Listed { entries, .. } => assert_eq!(entries, vec!["y.txt", "z.txt"]),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_missing_file_is_file_error() {
        let dir = TempDir::new().unwrap();
        let err = run(FileOperation::Read, &dir.path().join("missing.txt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SirError::File(ref msg) if msg.contains("missing.txt")));
    }
}
