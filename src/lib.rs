//! # notion-atlas
//!
//! A read-only index and resolver for static Notion workspace exports. Your
//! unpacked export is the data source: the root `index.html` and the on-disk
//! directory shape become a navigation tree, slugs and unique-id fragments
//! resolve to concrete files, and dataset exports are paired with their
//! complete variants — all without modifying the export.
//!
//! # Architecture: Parse, Resolve, Load
//!
//! Everything is a pure function of the on-disk export. A request flows
//! through three stages:
//!
//! ```text
//! 1. Parse     index.html + directories  →  Workspace tree
//! 2. Resolve   slug / id fragment        →  NavNode or file path
//! 3. Load      file path                 →  PageContent / CsvPair
//! ```
//!
//! There is no persistent state: every top-level call re-derives from disk,
//! with an optional process-lifetime [`cache::WorkspaceCache`] as a pure
//! optimization. All failures are returned as values — a serving layer maps
//! [`resolve::ResolveError::is_not_found`] to its 404/500 split.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the root index and directory layout, produces the [`types::Workspace`] tree |
//! | [`resolve`] | Slug lookup over the tree, unique-id fragment matching over the disk, breadcrumbs |
//! | [`page`] | Markdown loading: display title + local image references |
//! | [`dataset`] | CSV pair discovery (`_all` sibling) and delimited parsing |
//! | [`naming`] | `Title <hex-id>` entry-name codec and slug derivation |
//! | [`images`] | Document-relative image refs → root-relative paths, MIME lookup |
//! | [`paths`] | Data-root containment: lexical normalization, escape rejection |
//! | [`config`] | `preview.toml` loading, validation, stock config generation |
//! | [`cache`] | Explicit process-lifetime workspace cache with invalidation |
//! | [`types`] | Shared types serialized to consumers (`Workspace`, `NavNode`, `CsvPair`, `PageContent`) |
//! | [`output`] | CLI output formatting — tree listing and check summary |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Index
//!
//! The export tool encodes everything in names: `Title <32-hex-id>.md` for
//! pages, a same-stem directory for nested sub-pages, a `_all.csv` sibling
//! for the complete dataset variant. [`naming`] is the single place that
//! interprets this convention; everything else goes through it.
//!
//! ## Two-Pass Resolution
//!
//! Slugs are derived from titles and are only unique per sibling set, and
//! datasets or orphaned files may not be reachable through the tree at all.
//! So resolution is tree-first (depth-first, first match wins) with a
//! disk-walk fallback keyed on unique-id fragments of at least eight
//! characters. Both passes are deterministic; neither guarantees uniqueness,
//! and both are documented first-match-wins contracts.
//!
//! ## Availability over Completeness
//!
//! A malformed entry below the root is skipped with a warning and the rest
//! of the tree still builds; a page without a heading gets a placeholder
//! title; a dataset missing its sibling serves the present variant for both
//! sides. Only a missing root index is fatal — without it nothing can be
//! resolved.
//!
//! ## Containment Before Every Read
//!
//! File paths inside nodes are root-relative strings and are lexically
//! re-validated against the data root before each access. A path that would
//! escape is treated exactly like a missing file — the caller learns
//! nothing about the filesystem outside the export.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod images;
pub mod naming;
pub mod output;
pub mod page;
pub mod paths;
pub mod resolve;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
