//! The library code for `tagpages`, which gives every tag used on a static
//! site its own listing page. The work breaks down into two steps:
//!
//! 1. Collecting the distinct tags of all documents ([`crate::tag::collect`])
//! 2. Building one page descriptor per tag ([`crate::builder`])
//!
//! [`crate::generate::Generator`] runs both steps and rejects builds in which
//! two tags would be written to the same file. The result is a list of
//! [`crate::page::PageDescriptor`]s: an output path, a layout name, and the
//! variables (`tag` and `title`) to render it with.
//!
//! The library never writes files. The remaining modules ([`crate::config`],
//! [`crate::source`], and [`crate::write`]) are a small host that loads
//! documents from disk and renders descriptors with [`gtmpl`]; they are what
//! the `tagpages` binary runs.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod builder;
pub mod config;
pub mod document;
pub mod frontmatter;
pub mod generate;
pub mod layout;
pub mod page;
pub mod source;
pub mod tag;
pub mod value;
pub mod write;
