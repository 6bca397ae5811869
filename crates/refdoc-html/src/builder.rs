//! Static site builder.
//!
//! A build runs in two phases. First the documented set is loaded, the
//! site tree built and every page rendered in memory; any failure here
//! leaves the output directory untouched. Then the pages are written into
//! a staging directory inside the output directory and moved into place.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use refdoc_config::Config;
use refdoc_model::{Documentation, MetadataError, MetadataSource};
use refdoc_site::{
    Classifier, ExternalLinks, LinkResolver, Navigation, SiteError, SiteTree, breadcrumbs,
};

use crate::content::{ContentRenderer, HtmlContent};
use crate::printer::{HiddenAttributes, TypePrinter};
use crate::template::{
    DEFAULT_CSS, PageData, STYLESHEET, render_footer, render_navigation, render_page,
};

/// Configuration for static site building.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Site title.
    pub title: String,
    /// Page file extension, without the dot.
    pub file_extension: String,
    /// Write pages on the rayon thread pool.
    pub parallel_writes: bool,
    /// External link settings.
    pub external_links: ExternalLinks,
    /// Attributes hidden from syntax blocks.
    pub hidden_attributes: HiddenAttributes,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl BuildConfig {
    /// Build settings from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.site.title.clone(),
            file_extension: config.site.file_extension.clone(),
            parallel_writes: config.site.parallel_writes,
            external_links: ExternalLinks::from(&config.links),
            hidden_attributes: HiddenAttributes::new(config.render.hidden_attributes.iter().cloned()),
        }
    }
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No metadata sources were configured.
    #[error("No artifacts to document")]
    NoSources,
    /// Loading the documented set failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// The site model is inconsistent.
    #[error(transparent)]
    Site(#[from] SiteError),
    /// Writing output failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Outcome of a check or build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages in the site, root included.
    pub pages: usize,
    /// Documented namespaces.
    pub namespaces: usize,
    /// Documented types.
    pub types: usize,
    /// Directory the site was written to; `None` for checks.
    pub output_dir: Option<PathBuf>,
}

/// A rendered page ready to be written.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// File name inside the output directory.
    pub file_name: String,
    /// Complete HTML document.
    pub html: String,
}

/// Builds a static documentation site from metadata sources.
pub struct StaticSiteBuilder {
    config: BuildConfig,
    sources: Vec<Box<dyn MetadataSource>>,
    generated_at: Option<DateTime<Utc>>,
}

impl StaticSiteBuilder {
    /// Create a builder with no sources.
    ///
    /// The footer timestamp is captured when a build starts unless
    /// [`StaticSiteBuilder::with_timestamp`] pins it.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            generated_at: None,
        }
    }

    /// Add a metadata source.
    #[must_use]
    pub fn with_source(mut self, source: impl MetadataSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Add several metadata sources.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Box<dyn MetadataSource>>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Fix the generation time shown in the footer.
    ///
    /// Defaults to the time the build starts.
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Load sources and build the site tree without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if no sources are configured, loading fails or two
    /// pages collide.
    pub fn check(&self) -> Result<BuildReport, BuildError> {
        let doc = self.load()?;
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier)?;
        Ok(report(&tree, None))
    }

    /// Build the site into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, tree building or writing fails. Errors
    /// before the write phase leave `output_dir` untouched.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, BuildError> {
        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let doc = self.load()?;
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier)?;

        let pages = self.render(&doc, &tree, generated_at);
        tracing::info!(pages = pages.len(), "Rendered pages");

        self.write(output_dir, &pages)?;
        tracing::info!(output = %output_dir.display(), "Site written");

        Ok(report(&tree, Some(output_dir.to_path_buf())))
    }

    /// Render every page of a documented set in tree order.
    ///
    /// # Errors
    ///
    /// Returns an error if two pages collide.
    pub fn render_documentation(&self, doc: &Documentation) -> Result<Vec<RenderedPage>, BuildError> {
        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let classifier = Classifier::new(doc);
        let tree = SiteTree::build(&classifier)?;
        Ok(self.render(doc, &tree, generated_at))
    }

    fn load(&self) -> Result<Documentation, BuildError> {
        if self.sources.is_empty() {
            return Err(BuildError::NoSources);
        }
        Ok(Documentation::load(&self.sources)?)
    }

    fn render(&self, doc: &Documentation, tree: &SiteTree<'_>, generated_at: DateTime<Utc>) -> Vec<RenderedPage> {
        let extension = self.config.file_extension.as_str();
        let resolver = LinkResolver::new(doc, self.config.external_links.clone(), extension);
        let content = HtmlContent::new(TypePrinter::new(&resolver, &self.config.hidden_attributes));

        let navigation = render_navigation(&Navigation::from_tree(tree, extension), &self.config.title);
        let footer = render_footer(&self.config.title, generated_at);

        tree.walk()
            .iter()
            .map(|visit| {
                let node = visit.node;
                let body = content.render(node);
                let crumbs = breadcrumbs(&visit.ancestors, extension);
                let html = render_page(&PageData {
                    title: &node.label,
                    site_title: &self.config.title,
                    html_content: &body,
                    breadcrumbs: &crumbs,
                    navigation: &navigation,
                    footer: &footer,
                });
                let file_name = node.slug.file_name(extension);
                tracing::debug!(page = %file_name, "Rendered page");
                RenderedPage { file_name, html }
            })
            .collect()
    }

    fn write(&self, output_dir: &Path, pages: &[RenderedPage]) -> Result<(), BuildError> {
        fs::create_dir_all(output_dir).map_err(BuildError::io(output_dir))?;
        let staging = tempfile::Builder::new()
            .prefix(".refdoc-staging-")
            .tempdir_in(output_dir)
            .map_err(BuildError::io(output_dir))?;

        let write_page = |page: &RenderedPage| {
            let path = staging.path().join(&page.file_name);
            fs::write(&path, &page.html).map_err(BuildError::io(path))
        };
        if self.config.parallel_writes {
            pages.par_iter().try_for_each(write_page)?;
        } else {
            pages.iter().try_for_each(write_page)?;
        }

        for page in pages {
            let target = output_dir.join(&page.file_name);
            fs::rename(staging.path().join(&page.file_name), &target).map_err(BuildError::io(target))?;
        }

        let stylesheet = output_dir.join(STYLESHEET);
        if !stylesheet.exists() {
            fs::write(&stylesheet, DEFAULT_CSS).map_err(BuildError::io(stylesheet))?;
        }
        Ok(())
    }
}

fn report(tree: &SiteTree<'_>, output_dir: Option<PathBuf>) -> BuildReport {
    BuildReport {
        pages: tree.len(),
        namespaces: tree.namespace_count(),
        types: tree.type_count(),
        output_dir,
    }
}
