//! Site model errors.

/// Error building the site model.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Two entities computed the same page identity.
    #[error("Naming collision: '{slug}' is claimed by {first} and {second}")]
    NamingCollision {
        /// Contested slug.
        slug: String,
        /// Entity that claimed the slug first.
        first: String,
        /// Entity that claimed it again.
        second: String,
    },
    /// Two page identities differ only in case and would share a file on
    /// case-insensitive filesystems.
    #[error("Naming collision: '{first_slug}' ({first}) and '{second_slug}' ({second}) differ only in case")]
    CaseCollision {
        /// Slug claimed first.
        first_slug: String,
        /// Entity that claimed it.
        first: String,
        /// Slug claimed second.
        second_slug: String,
        /// Entity that claimed it.
        second: String,
    },
}
