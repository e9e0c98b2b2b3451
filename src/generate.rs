//! Exports [`Generator`], which stitches together the steps of tag page
//! generation: collecting tags from documents ([`crate::tag::collect`]),
//! building one page per tag ([`TagPageBuilder::build_with_layout`]), and
//! checking that no two tags were mapped onto the same output file. The shared
//! layout is resolved once per build, and only if there is at least one tag.
//!
//! Pages are independent of one another, so with more than one thread the tags
//! are handed to a pool of workers. All workers are joined before the
//! collision check runs.

use crate::builder::{self, TagPageBuilder};
use crate::document::Document;
use crate::layout::{Layout, LayoutResolver};
use crate::page::PageDescriptor;
use crate::tag::{self, Tag, TagSet};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Generates tag pages for a site.
pub struct Generator<R> {
    builder: TagPageBuilder<R>,
    site_root: PathBuf,
    layout_dir: PathBuf,
    threads: usize,
}

impl<R: LayoutResolver + Sync> Generator<R> {
    /// Constructs a single-threaded generator. `layout_dir` is relative to
    /// `site_root` unless it is absolute.
    pub fn new(
        builder: TagPageBuilder<R>,
        site_root: impl Into<PathBuf>,
        layout_dir: impl Into<PathBuf>,
    ) -> Generator<R> {
        Generator {
            builder,
            site_root: site_root.into(),
            layout_dir: layout_dir.into(),
            threads: 1,
        }
    }

    /// Sets the number of worker threads. Zero is treated as one.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Builds one page per distinct tag in `documents`. The pages are ordered
    /// by tag. Fails if the layout is missing or if two tags share an output
    /// path.
    pub fn generate(&self, documents: &[Document]) -> Result<Vec<PageDescriptor>> {
        let tags = tag::collect(documents);
        if tags.is_empty() {
            log::info!("No tags found in {} documents", documents.len());
            return Ok(Vec::new());
        }
        let layout = self
            .builder
            .resolve_layout(&self.site_root, &self.layout_dir)?;
        let mut pages = match self.threads.min(tags.len()) {
            0 | 1 => self.build_sequential(&tags, &layout)?,
            threads => self.build_parallel(&tags, &layout, threads)?,
        };
        pages.sort_by(|a, b| a.tag().cmp(b.tag()));
        check_collisions(&pages)?;
        log::info!(
            "Generated {} tag pages from {} documents",
            pages.len(),
            documents.len()
        );
        Ok(pages)
    }

    fn build(&self, tag: &Tag, layout: &Layout) -> builder::Result<PageDescriptor> {
        self.builder.build_with_layout(tag, &self.site_root, layout)
    }

    fn build_sequential(&self, tags: &TagSet, layout: &Layout) -> Result<Vec<PageDescriptor>> {
        tags.iter()
            .map(|tag| self.build(tag, layout).map_err(Error::from))
            .collect()
    }

    fn build_parallel(
        &self,
        tags: &TagSet,
        layout: &Layout,
        threads: usize,
    ) -> Result<Vec<PageDescriptor>> {
        use crossbeam_channel::unbounded;
        use std::thread;

        let (tx, rx) = unbounded::<&Tag>();
        for tag in tags {
            // `rx` is still alive, so the channel can't be disconnected.
            let _ = tx.send(tag);
        }
        drop(tx);

        log::debug!("Building {} tag pages on {} threads", tags.len(), threads);
        let results: Vec<builder::Result<Vec<PageDescriptor>>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..threads)
                .map(|_| {
                    let rx = rx.clone();
                    scope.spawn(move || -> builder::Result<Vec<PageDescriptor>> {
                        let mut v = Vec::new();
                        for tag in rx {
                            v.push(self.build(tag, layout)?);
                        }
                        Ok(v)
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| match worker.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut pages = Vec::with_capacity(tags.len());
        for result in results {
            pages.extend(result?);
        }
        Ok(pages)
    }
}

/// Fails on the first output path claimed by two different tags. `pages` is
/// expected in tag order so the reported pair is stable.
fn check_collisions(pages: &[PageDescriptor]) -> Result<()> {
    let mut seen: HashMap<&Path, &Tag> = HashMap::with_capacity(pages.len());
    for page in pages {
        if let Some(first) = seen.insert(page.output_path(), page.tag()) {
            return Err(Error::PathCollision {
                path: page.output_path().to_owned(),
                first: first.clone(),
                second: page.tag().clone(),
            });
        }
    }
    Ok(())
}

/// The result of a fallible generate operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for generating tag pages.
#[derive(Debug)]
pub enum Error {
    /// Returned when a page can't be built, most notably when the shared
    /// layout is missing ([`builder::Error::LayoutMissing`]).
    Build(builder::Error),

    /// Returned when two distinct tags would be written to the same file.
    PathCollision {
        path: PathBuf,
        first: Tag,
        second: Tag,
    },
}

impl Error {
    /// Reports whether this is a missing-layout failure. Hosts that treat tag
    /// pages as optional can skip generation in that case.
    pub fn is_layout_missing(&self) -> bool {
        matches!(self, Error::Build(builder::Error::LayoutMissing { .. }))
    }
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Build(err) => err.fmt(f),
            Error::PathCollision {
                path,
                first,
                second,
            } => write!(
                f,
                "Tags `{}` and `{}` both map to '{}'",
                first,
                second,
                path.display()
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Build(err) => Some(err),
            Error::PathCollision { .. } => None,
        }
    }
}

impl From<builder::Error> for Error {
    /// Converts [`builder::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: builder::Error) -> Error {
        Error::Build(err)
    }
}
