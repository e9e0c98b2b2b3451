//! Defines [`TagPageBuilder`], which turns a single [`Tag`] into a
//! [`PageDescriptor`], and [`PathPolicy`], which decides how a tag becomes an
//! output path segment.

use crate::layout::{self, Layout, LayoutResolver};
use crate::page::{PageDescriptor, Variables};
use crate::tag::Tag;
use serde::Deserialize;
use serde_yaml::Value;
use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// The directory under which tag pages are written.
pub const TAG_DIRECTORY: &str = "tag";

/// The shared layout for tag pages.
pub const TAG_LAYOUT: &str = "tag.html";

/// The file name of every tag page.
pub const INDEX_FILE: &str = "index.html";

/// Prepended to the tag to form the page title.
pub const TITLE_PREFIX: &str = "Tag: ";

/// How a tag is turned into an output path segment.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    /// The tag is used as-is: no case folding and no whitespace replacement.
    Verbatim,

    /// The tag is slugified (`Ruby on Rails` becomes `ruby-on-rails`). This is
    /// lossy, so distinct tags can end up sharing a page; the generator
    /// reports that as a [`crate::generate::Error::PathCollision`].
    Slugify,
}

impl Default for PathPolicy {
    fn default() -> Self {
        PathPolicy::Verbatim
    }
}

impl PathPolicy {
    pub fn segment<'t>(&self, tag: &'t Tag) -> Cow<'t, str> {
        match self {
            PathPolicy::Verbatim => Cow::Borrowed(tag.as_str()),
            PathPolicy::Slugify => Cow::Owned(slug::slugify(tag.as_str())),
        }
    }
}

/// Builds [`PageDescriptor`]s for tags. The builder holds no per-build state,
/// so one builder can serve any number of tags and threads.
#[derive(Clone, Debug)]
pub struct TagPageBuilder<R> {
    resolver: R,
    tag_directory: String,
    template_name: String,
    path_policy: PathPolicy,
}

impl<R: LayoutResolver> TagPageBuilder<R> {
    /// Constructs a builder that writes pages to `tag/{tag}/index.html` using
    /// the `tag.html` layout as resolved by `resolver`.
    pub fn new(resolver: R) -> TagPageBuilder<R> {
        TagPageBuilder {
            resolver,
            tag_directory: TAG_DIRECTORY.to_owned(),
            template_name: TAG_LAYOUT.to_owned(),
            path_policy: PathPolicy::default(),
        }
    }

    pub fn with_tag_directory(mut self, tag_directory: impl Into<String>) -> Self {
        self.tag_directory = tag_directory.into();
        self
    }

    pub fn with_template_name(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = template_name.into();
        self
    }

    pub fn with_path_policy(mut self, path_policy: PathPolicy) -> Self {
        self.path_policy = path_policy;
        self
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Derives the output path for `tag`, e.g., `tag/ruby/index.html`.
    /// Fails if the tag's segment is empty or would leave the tag directory
    /// (an absolute path or a `..` component).
    pub fn output_path(&self, tag: &Tag) -> Result<PathBuf> {
        let segment = self.path_policy.segment(tag);
        let segment_path = Path::new(segment.as_ref());
        let contained = segment_path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        let has_name = segment_path
            .components()
            .any(|c| matches!(c, Component::Normal(_)));
        if !contained || !has_name {
            return Err(Error::InvalidSegment {
                tag: tag.clone(),
                segment: segment.into_owned(),
            });
        }
        Ok(Path::new(&self.tag_directory)
            .join(segment_path)
            .join(INDEX_FILE))
    }

    /// Builds the page for `tag`. The layout is looked up in `layout_dir`,
    /// which is taken relative to `site_root` unless it is absolute. Fails
    /// with [`Error::LayoutMissing`] if there is no such layout; no page is
    /// produced in that case. Nothing is written to disk.
    pub fn build(
        &self,
        tag: &Tag,
        site_root: &Path,
        layout_dir: &Path,
    ) -> Result<PageDescriptor> {
        let layout = self.resolve_layout(site_root, layout_dir)?;
        self.build_with_layout(tag, site_root, &layout)
    }

    /// Looks up the shared layout once so that it can be reused across tags
    /// with [`TagPageBuilder::build_with_layout`].
    pub fn resolve_layout(&self, site_root: &Path, layout_dir: &Path) -> Result<Layout> {
        let layout_dir = site_root.join(layout_dir);
        self.resolver
            .resolve(&layout_dir, &self.template_name)?
            .ok_or_else(|| Error::LayoutMissing {
                name: self.template_name.clone(),
                layout_dir,
            })
    }

    /// Builds the page for `tag` from an already resolved layout.
    pub fn build_with_layout(
        &self,
        tag: &Tag,
        site_root: &Path,
        layout: &Layout,
    ) -> Result<PageDescriptor> {
        let output_path = self.output_path(tag)?;

        // Layout front matter first so that `tag` and `title` always win.
        let mut variables: Variables = layout
            .data
            .iter()
            .filter_map(|(key, value)| match key {
                Value::String(key) => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect();
        variables.insert("tag".to_owned(), Value::String(tag.as_str().to_owned()));
        variables.insert(
            "title".to_owned(),
            Value::String(format!("{}{}", TITLE_PREFIX, tag)),
        );

        log::debug!("Built page `{}` for tag `{}`", output_path.display(), tag);
        Ok(PageDescriptor {
            tag: tag.clone(),
            site_root: site_root.to_owned(),
            output_path,
            template_name: self.template_name.clone(),
            layout_path: layout.path.clone(),
            layout_body: Arc::clone(&layout.body),
            variables,
        })
    }
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building a tag page.
#[derive(Debug)]
pub enum Error {
    /// Returned when the shared layout doesn't exist in the layout directory.
    LayoutMissing { name: String, layout_dir: PathBuf },

    /// Returned when the layout exists but can't be read.
    Layout(layout::Error),

    /// Returned when a tag can't be represented as a path segment inside the
    /// tag directory.
    InvalidSegment { tag: Tag, segment: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::LayoutMissing { name, layout_dir } => write!(
                f,
                "Layout `{}` not found in '{}'",
                name,
                layout_dir.display()
            ),
            Error::Layout(err) => err.fmt(f),
            Error::InvalidSegment { tag, segment } => write!(
                f,
                "Tag `{}` can't be used as path segment `{}`",
                tag, segment
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::LayoutMissing { .. } => None,
            Error::Layout(err) => Some(err),
            Error::InvalidSegment { .. } => None,
        }
    }
}

impl From<layout::Error> for Error {
    /// Converts a [`layout::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when resolving layouts.
    fn from(err: layout::Error) -> Error {
        Error::Layout(err)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::layout::FsLayouts;
    use std::fs;
    use tempfile::TempDir;
    use url::Url;

    /// Creates a site directory with `_layouts/{name}` containing `contents`.
    pub(crate) fn site_with_layout(name: &str, contents: &str) -> TempDir {
        let site = tempfile::tempdir().unwrap();
        fs::create_dir(site.path().join("_layouts")).unwrap();
        fs::write(site.path().join("_layouts").join(name), contents).unwrap();
        site
    }

    fn tag(name: &str) -> Tag {
        Tag::new(name).unwrap()
    }

    #[test]
    fn test_build() -> Result<()> {
        let site = site_with_layout(TAG_LAYOUT, "{{ .title }}");
        let page = TagPageBuilder::new(FsLayouts).build(
            &tag("ruby"),
            site.path(),
            Path::new("_layouts"),
        )?;

        assert_eq!(Path::new("tag/ruby/index.html"), page.output_path());
        assert_eq!("tag.html", page.template_name());
        assert_eq!(Some(&Value::from("ruby")), page.variable("tag"));
        assert_eq!(Some(&Value::from("Tag: ruby")), page.variable("title"));
        assert_eq!(site.path(), page.site_root());
        assert_eq!(
            site.path().join("_layouts").join("tag.html"),
            page.layout_path()
        );
        Ok(())
    }

    #[test]
    fn test_build_uses_tag_verbatim() -> Result<()> {
        let site = site_with_layout(TAG_LAYOUT, "");
        let page = TagPageBuilder::new(FsLayouts).build(
            &tag("Ruby on Rails"),
            site.path(),
            Path::new("_layouts"),
        )?;
        assert_eq!(Path::new("tag/Ruby on Rails/index.html"), page.output_path());
        assert_eq!(
            Some(&Value::from("Tag: Ruby on Rails")),
            page.variable("title")
        );
        Ok(())
    }

    #[test]
    fn test_build_layout_missing() {
        let site = tempfile::tempdir().unwrap();
        let result = TagPageBuilder::new(FsLayouts).build(
            &tag("ruby"),
            site.path(),
            Path::new("_layouts"),
        );
        match result {
            Err(Error::LayoutMissing { name, layout_dir }) => {
                assert_eq!("tag.html", name);
                assert_eq!(site.path().join("_layouts"), layout_dir);
            }
            other => panic!("wanted LayoutMissing; found {:?}", other),
        }
    }

    #[test]
    fn test_build_with_absolute_layout_dir() -> Result<()> {
        let layouts = site_with_layout(TAG_LAYOUT, "");
        let site = tempfile::tempdir().unwrap();
        let page = TagPageBuilder::new(FsLayouts).build(
            &tag("go"),
            site.path(),
            &layouts.path().join("_layouts"),
        )?;
        assert_eq!(Path::new("tag/go/index.html"), page.output_path());
        Ok(())
    }

    #[test]
    fn test_build_merges_layout_variables() -> Result<()> {
        let site = site_with_layout(
            TAG_LAYOUT,
            "---\nlayout: default\ntitle: overridden\nsidebar: true\n---\n",
        );
        let page = TagPageBuilder::new(FsLayouts).build(
            &tag("go"),
            site.path(),
            Path::new("_layouts"),
        )?;
        assert_eq!(Some(&Value::from("default")), page.variable("layout"));
        assert_eq!(Some(&Value::Bool(true)), page.variable("sidebar"));
        assert_eq!(Some(&Value::from("Tag: go")), page.variable("title"));
        Ok(())
    }

    #[test]
    fn test_build_alternate_layout() -> Result<()> {
        let site = site_with_layout("by_tag.html", "");
        let builder = TagPageBuilder::new(FsLayouts)
            .with_tag_directory("tags")
            .with_template_name("by_tag.html")
            .with_path_policy(PathPolicy::Slugify);
        let page = builder.build(&tag("Ruby on Rails"), site.path(), Path::new("_layouts"))?;
        assert_eq!(Path::new("tags/ruby-on-rails/index.html"), page.output_path());
        assert_eq!("by_tag.html", page.template_name());
        assert_eq!(Some(&Value::from("Ruby on Rails")), page.variable("tag"));
        Ok(())
    }

    #[test]
    fn test_output_path_rejects_escaping_tags() {
        let builder = TagPageBuilder::new(FsLayouts);
        for name in &["..", "../etc", "/etc", "a/../../b", "."] {
            assert!(
                matches!(
                    builder.output_path(&tag(name)),
                    Err(Error::InvalidSegment { .. })
                ),
                "`{}` should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_output_path_rejects_empty_slug() {
        let builder = TagPageBuilder::new(FsLayouts).with_path_policy(PathPolicy::Slugify);
        assert!(matches!(
            builder.output_path(&tag("!!!")),
            Err(Error::InvalidSegment { .. })
        ));
    }

    #[test]
    fn test_url() -> Result<()> {
        let site = site_with_layout(TAG_LAYOUT, "");
        let builder = TagPageBuilder::new(FsLayouts);
        let page = builder.build(&tag("c#"), site.path(), Path::new("_layouts"))?;

        let base = Url::parse("https://example.org/blog").unwrap();
        assert_eq!(
            "https://example.org/blog/tag/c%23/",
            page.url(&base).unwrap().as_str()
        );
        let base = Url::parse("https://example.org/").unwrap();
        assert_eq!(
            "https://example.org/tag/c%23/",
            page.url(&base).unwrap().as_str()
        );
        let base = Url::parse("mailto:someone@example.org").unwrap();
        assert_eq!(None, page.url(&base));
        Ok(())
    }
}
