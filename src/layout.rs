//! Defines the [`LayoutResolver`] seam through which the builder confirms that
//! a shared layout exists, and [`FsLayouts`], which resolves layouts from a
//! directory on disk.

use crate::frontmatter;
use serde_yaml::Mapping;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A shared template owned by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// The layout's file name, e.g., `tag.html`.
    pub name: String,

    /// Where the layout was found.
    pub path: PathBuf,

    /// Variables declared in the layout's own front matter. Empty if the
    /// layout has none.
    pub data: Mapping,

    /// The template source following the front matter.
    pub body: Arc<str>,
}

impl Layout {
    /// Reads a layout from `path`, splitting off its optional front matter.
    pub fn load(path: &Path) -> Result<Layout> {
        let contents = fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        Layout::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Layout> {
        let annotate = |err| Error::Frontmatter {
            path: path.to_owned(),
            err,
        };
        let (data, body) = match frontmatter::split(contents).map_err(annotate)? {
            Some(split) => (
                frontmatter::parse_mapping(split.yaml).map_err(annotate)?,
                split.body,
            ),
            None => (Mapping::new(), contents),
        };
        Ok(Layout {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_owned(),
            data,
            body: Arc::from(body),
        })
    }
}

/// Looks up layouts by name. Implementations must be shareable across the
/// generator's worker threads.
pub trait LayoutResolver {
    /// Returns the layout called `name` in `layout_dir`, or `None` if there is
    /// no such layout.
    fn resolve(&self, layout_dir: &Path, name: &str) -> Result<Option<Layout>>;
}

/// Resolves layouts as files in the layout directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLayouts;

impl LayoutResolver for FsLayouts {
    fn resolve(&self, layout_dir: &Path, name: &str) -> Result<Option<Layout>> {
        let path = layout_dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        Layout::load(&path).map(Some)
    }
}

/// The result of a fallible layout operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading a layout that exists.
#[derive(Debug)]
pub enum Error {
    /// Returned when the layout file can't be read.
    Io { path: PathBuf, err: io::Error },

    /// Returned when the layout's front matter is malformed.
    Frontmatter {
        path: PathBuf,
        err: frontmatter::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Reading layout '{}': {}", path.display(), err)
            }
            Error::Frontmatter { path, err } => {
                write!(f, "Parsing layout '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::Frontmatter { path: _, err } => Some(err),
        }
    }
}
