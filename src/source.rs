//! Loads [`Document`]s from the documents directory. Any file whose contents
//! open with a front matter fence is a document; everything else (images,
//! drafts without front matter, dotfiles) is skipped.

use crate::document::Document;
use crate::frontmatter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const EXTENSIONS: &[&str] = &["md", "markdown", "html"];

/// Walks `source_directory` and returns its documents in path order. A missing
/// directory yields no documents.
pub fn load_documents(source_directory: &Path) -> Result<Vec<Document>> {
    if !source_directory.is_dir() {
        log::warn!(
            "Documents directory '{}' does not exist",
            source_directory.display()
        );
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    let walker = WalkDir::new(source_directory)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for result in walker {
        let entry = result?;
        if !entry.file_type().is_file() || !has_document_extension(entry.path()) {
            continue;
        }
        // strip_prefix shouldn't fail since `source_directory` is always an
        // ancestor of the entry
        let relative_path = entry
            .path()
            .strip_prefix(source_directory)
            .unwrap_or_else(|_| entry.path());
        if let Some(document) = load_document(entry.path(), relative_path)? {
            documents.push(document);
        }
    }

    log::info!(
        "Loaded {} documents from '{}'",
        documents.len(),
        source_directory.display()
    );
    Ok(documents)
}

fn load_document(path: &Path, relative_path: &Path) -> Result<Option<Document>> {
    let annotate = |err: Error| {
        Error::Annotated(format!("parsing document `{}`", relative_path.display()), Box::new(err))
    };

    let contents = fs::read_to_string(path).map_err(|err| {
        annotate(Error::Io {
            path: path.to_owned(),
            err,
        })
    })?;
    let split = match frontmatter::split(&contents).map_err(|e| annotate(e.into()))? {
        Some(split) => split,
        None => {
            log::debug!("Skipping `{}`: no front matter", relative_path.display());
            return Ok(None);
        }
    };
    let data = frontmatter::parse_mapping(split.yaml).map_err(|e| annotate(e.into()))?;
    let id = relative_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Ok(Some(Document::new(id, data)))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Represents the result of a document-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a document's front matter is malformed.
    Frontmatter(frontmatter::Error),

    /// Returned when a document can't be read.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Frontmatter(err) => err.fmt(f),
            Error::Io { path, err } => {
                write!(f, "Reading '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Frontmatter(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<frontmatter::Error> for Error {
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tag;

    fn write(dir: &Path, relative_path: &str, contents: &str) {
        let path = dir.join(relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_load_documents() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.md", "---\ntitle: B\ntags: [go]\n---\nbody");
        write(dir.path(), "a.md", "---\ntitle: A\ntags: [go, rust]\n---\nbody");
        write(dir.path(), "2021/c.html", "---\n---\n<p>untagged</p>");
        write(dir.path(), "notes.md", "no front matter here");
        write(dir.path(), "image.png", "---\ntags: [png]\n---\n");
        write(dir.path(), ".drafts/d.md", "---\ntags: [draft]\n---\n");

        let documents = load_documents(dir.path())?;
        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(vec!["2021/c.html", "a.md", "b.md"], ids);

        let tags = tag::collect(&documents);
        assert_eq!(
            vec!["go", "rust"],
            tags.iter().map(|t| t.as_str()).collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_load_documents_missing_directory() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_documents(&dir.path().join("_posts"))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_documents_malformed_frontmatter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.md", "---\ntags: [go\n---\n");
        match load_documents(dir.path()) {
            Err(Error::Annotated(annotation, _)) => {
                assert!(annotation.contains("bad.md"), "annotation: {}", annotation)
            }
            other => panic!("wanted an annotated error; found {:?}", other),
        }
    }
}
