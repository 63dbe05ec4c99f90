//! Output generation for the static site.
//!
//! # Submodules
//!
//! - [`html`]: Renders a [`crate::models::PageContext`] into an HTML document
//! - [`site`]: Writes the rendered document to the output path
//!
//! # Output Structure
//!
//! ```text
//! <output dir>/
//! └── index.html   # overwritten on every successful run
//! ```

pub mod html;
pub mod site;
