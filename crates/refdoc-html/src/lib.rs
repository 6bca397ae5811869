//! HTML rendering and static site emission for refdoc.
//!
//! [`StaticSiteBuilder`] loads the documented set, builds the site tree and
//! writes one HTML page per tree node. Page bodies come from a
//! [`ContentRenderer`]; the page shell, navigation sidebar and footer come
//! from [`template`].
//!
//! # Example
//!
//! ```ignore
//! use refdoc_html::{BuildConfig, StaticSiteBuilder};
//! use refdoc_model::JsonSource;
//!
//! let report = StaticSiteBuilder::new(BuildConfig::default())
//!     .with_source(JsonSource::new("build/Shapes.json"))
//!     .build(Path::new("site"))?;
//! ```

mod builder;
mod content;
mod printer;
pub mod template;

pub use builder::{BuildConfig, BuildError, BuildReport, RenderedPage, StaticSiteBuilder};
pub use content::{ContentRenderer, HtmlContent};
pub use printer::{HiddenAttributes, TypePrinter, render_resolved};
