//! Markdown to HTML conversion with an optional, synthesized table of
//! contents.
//!
//! A document that contains a `[TOC]` marker gets a nested list of links to
//! its headings alongside the usual HTML body; the body's headings carry the
//! matching anchor ids.
//!
//! ```
//! let out = tocmark::to_html("[TOC]\n# Intro\n## Details\n");
//! assert!(out.toc.contains("<a href=\"#toc_1\">Details</a>"));
//! assert!(out.body.contains("<h2 id=\"toc_1\">Details</h2>"));
//! ```

pub mod config;
pub mod markdown;
pub mod page;

pub use markdown::{Rendered, to_html, to_html_with};
