//! Exports [`Writer`], the host side of generation: it templates the built
//! [`PageDescriptor`]s with `gtmpl` and writes them under the output directory.

use crate::page::PageDescriptor;
use gtmpl::{Template, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Responsible for templating tag pages and writing them to disk. This is the
/// host side of generation: the descriptors have already been built and
/// checked for collisions.
pub struct Writer<'a> {
    /// The directory in which the pages are written. A page with output path
    /// `tag/ruby/index.html` lands at
    /// `{output_directory}/tag/ruby/index.html`.
    pub output_directory: &'a Path,

    /// The site's base URL. When set, each page's own URL is made available
    /// to the template as `url`.
    pub site_url: Option<&'a Url>,
}

impl Writer<'_> {
    /// Takes a single [`PageDescriptor`], templates it, and writes it to disk.
    fn write_page(&self, page: &PageDescriptor, template: &Template) -> Result<()> {
        let mut value = Value::from(page);
        if let (Value::Object(obj), Some(site_url)) = (&mut value, self.site_url) {
            if let Some(url) = page.url(site_url) {
                obj.insert("url".to_owned(), Value::String(url.to_string()));
            }
        }
        let file_path = self.output_directory.join(page.output_path());
        template.execute(
            &mut std::fs::File::create(&file_path)?,
            &gtmpl::Context::from(value)?,
        )?;
        log::debug!("Wrote '{}'", file_path.display());
        Ok(())
    }

    /// Templates each page with its layout and writes it to disk. Each layout
    /// is parsed once, from the body the page already carries; layout files
    /// are not read again.
    pub fn write_pages(&self, pages: &[PageDescriptor]) -> Result<()> {
        let mut templates: HashMap<&Path, Template> = HashMap::new();
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        for page in pages {
            let layout_path = page.layout_path();
            if !templates.contains_key(layout_path) {
                templates.insert(layout_path, parse_template(layout_path, page.layout_body())?);
            }
            if let Some(dir) = self.output_directory.join(page.output_path()).parent() {
                if seen_dirs.insert(dir.to_owned()) {
                    std::fs::create_dir_all(dir)?;
                }
            }
            self.write_page(page, &templates[layout_path])?;
        }
        log::info!(
            "Wrote {} tag pages to '{}'",
            pages.len(),
            self.output_directory.display()
        );
        Ok(())
    }
}

// Parses a layout body into a template. `path` is only used for errors.
// gtmpl takes the body as-is; some unterminated actions (e.g. `{{ .x ` with a
// trailing space) make gtmpl 0.6 spin instead of failing.
fn parse_template(path: &Path, body: &str) -> Result<Template> {
    let mut template = Template::default();
    template
        .parse(body)
        .map_err(|err| Error::ParseTemplate {
            path: path.to_owned(),
            err,
        })?;
    Ok(template)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when a layout's body isn't a valid template.
    ParseTemplate { path: PathBuf, err: String },

    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template '{}': {}", path.display(), err)
            }
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ParseTemplate { .. } => None,
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
