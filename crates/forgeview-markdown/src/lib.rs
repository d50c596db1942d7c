//! Post-processing for rendered markdown.
//!
//! [`references::ReferenceRewriter`] turns textual issue references such as
//! `#42` into links. [`html`] provides the text-node segmentation it relies on
//! so that markup, existing links and code blocks pass through untouched.

pub mod html;
pub mod references;

pub use references::{ReferenceMatch, ReferenceRewriter, Rewritten, scan_references};
