//! Saved typing offsets, one `"path" offset` line per file.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use derive_more::From;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, From, Error)]
pub enum ResumeError {
    #[error("No location for the resume file")]
    NoDirectory,

    #[error("Failed to access the resume file: {0}")]
    Io(io::Error),

    #[error("Malformed resume entry on line {line}: {content}")]
    #[from(skip)]
    Malformed { line: usize, content: String },
}

/// One saved offset
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    offset: usize,
}

impl Entry {
    fn parse(line: usize, content: &str) -> Result<Self, ResumeError> {
        let malformed = || ResumeError::Malformed {
            line,
            content: content.to_string(),
        };

        let rest = content.strip_prefix('"').ok_or_else(malformed)?;
        let (key, offset) = rest.rsplit_once('"').ok_or_else(malformed)?;
        let offset = offset.trim().parse().map_err(|_| malformed())?;

        Ok(Self {
            key: key.to_string(),
            offset,
        })
    }

    fn line(&self) -> String {
        format!("\"{}\" {}", self.key, self.offset)
    }
}

/// A resume file on disk
#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

impl ResumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved offset of a file, if any
    pub fn lookup(&self, file: &Path) -> Result<Option<usize>, ResumeError> {
        let key = resume_key(file)?;
        Ok(self
            .read_entries()?
            .into_iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.offset))
    }

    /// Save the offset of a file, replacing an earlier one
    pub fn save(&self, file: &Path, offset: usize) -> Result<(), ResumeError> {
        let key = resume_key(file)?;
        let mut entries = self.read_entries()?;

        match entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.offset = offset,
            None => entries.push(Entry { key, offset }),
        }

        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), offset, "saved resume offset");
        Ok(())
    }

    /// Every well-formed entry. Malformed lines are dropped and vanish on the next save.
    fn read_entries(&self) -> Result<Vec<Entry>, ResumeError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut entries = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Entry::parse(index + 1, line) {
                Ok(entry) => entries.push(entry),
                Err(error) => warn!(path = %self.path.display(), %error, "ignoring resume entry"),
            }
        }

        Ok(entries)
    }

    /// Rewrite the whole file through a temporary sibling
    fn write_entries(&self, entries: &[Entry]) -> Result<(), ResumeError> {
        let parent = self.path.parent().ok_or(ResumeError::NoDirectory)?;
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        for entry in entries {
            content.push_str(&entry.line());
            content.push('\n');
        }

        let temporary = self.path.with_extension("tmp");
        fs::write(&temporary, content)?;
        fs::rename(&temporary, &self.path)?;
        Ok(())
    }
}

/// The key a file is saved under: its absolute, lexically normalised path
pub fn resume_key(file: &Path) -> io::Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(normalize(file, &cwd).to_string_lossy().into_owned())
}

/// Make `path` absolute against `cwd` and resolve `.`, `..` and repeated separators
pub fn normalize(path: &Path, cwd: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let cwd = Path::new("/home/me");

        assert_eq!(normalize(Path::new("/a/./b//c/../d"), cwd), PathBuf::from("/a/b/d"));
        assert_eq!(normalize(Path::new("src/../lib.rs"), cwd), PathBuf::from("/home/me/lib.rs"));
        assert_eq!(normalize(Path::new("../../../x"), cwd), PathBuf::from("/x"));
    }

    #[test]
    fn test_lookup_missing_file_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resume"));

        assert_eq!(store.lookup(Path::new("/src/main.rs")).unwrap(), None);
    }

    #[test]
    fn test_save_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("state").join("resume"));

        store.save(Path::new("/src/main.rs"), 120).unwrap();
        store.save(Path::new("/src/lib.rs"), 7).unwrap();

        assert_eq!(store.lookup(Path::new("/src/main.rs")).unwrap(), Some(120));
        assert_eq!(store.lookup(Path::new("/src/./lib.rs")).unwrap(), Some(7));
    }

    #[test]
    fn test_save_rewrites_existing_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resume"));

        store.save(Path::new("/a.c"), 1).unwrap();
        store.save(Path::new("/b.c"), 2).unwrap();
        store.save(Path::new("/a.c"), 30).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "\"/a.c\" 30\n\"/b.c\" 2\n");
    }

    #[test]
    fn test_quotes_inside_path() {
        let entry = Entry::parse(1, "\"/odd\"name.c\" 42").unwrap();
        assert_eq!(entry.key, "/odd\"name.c");
        assert_eq!(entry.offset, 42);
    }

    #[test]
    fn test_malformed_entry() {
        let error = Entry::parse(2, "/b.c four").unwrap_err();
        assert!(matches!(error, ResumeError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resume"));
        fs::write(store.path(), "\"/a.c\" 3\n/b.c four\n").unwrap();

        assert_eq!(store.lookup(Path::new("/a.c")).unwrap(), Some(3));
        assert_eq!(store.lookup(Path::new("/b.c")).unwrap(), None);
    }

    #[test]
    fn test_save_repairs_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resume"));
        fs::write(store.path(), "garbage line\n").unwrap();

        store.save(Path::new("/a.c"), 5).unwrap();

        assert_eq!(store.lookup(Path::new("/a.c")).unwrap(), Some(5));
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "\"/a.c\" 5\n");
    }
}
