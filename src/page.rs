//! Defines [`PageDescriptor`], the fully-specified tag page handed back to the
//! host for rendering.

use crate::tag::Tag;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// The variables injected into a page's template.
pub type Variables = BTreeMap<String, Value>;

/// One generated tag listing page. Descriptors are built by
/// [`crate::builder::TagPageBuilder`] and never change afterwards; rendering
/// and writing them is the host's job.
#[derive(Clone, Debug, PartialEq)]
pub struct PageDescriptor {
    pub(crate) tag: Tag,
    pub(crate) site_root: PathBuf,
    pub(crate) output_path: PathBuf,
    pub(crate) template_name: String,
    pub(crate) layout_path: PathBuf,
    pub(crate) layout_body: Arc<str>,
    pub(crate) variables: Variables,
}

impl PageDescriptor {
    /// The tag this page lists.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// The site source directory the page belongs to.
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// The output file relative to the site's output directory, e.g.,
    /// `tag/ruby/index.html`.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// The name of the shared layout, e.g., `tag.html`.
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Where the layout was resolved from.
    pub fn layout_path(&self) -> &Path {
        &self.layout_path
    }

    /// The layout's template source, without its front matter. Pages built
    /// in the same pass share one copy.
    pub fn layout_body(&self) -> &str {
        &self.layout_body
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Returns the page's public URL under the site's `base` URL, e.g.,
    /// `https://example.org/tag/ruby/`. Path segments are percent-encoded, so
    /// tags like `c#` stay in the path. Returns `None` if `base` can't carry a
    /// path (e.g., a `mailto:` URL).
    pub fn url(&self, base: &Url) -> Option<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            if let Some(dir) = self.output_path.parent() {
                for component in dir.components() {
                    segments.push(&component.as_os_str().to_string_lossy());
                }
            }
            segments.push("");
        }
        Some(url)
    }
}
