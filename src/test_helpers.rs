//! Shared test utilities for the notion-atlas test suite.
//!
//! Builds synthetic exports in temp directories — no checked-in fixtures,
//! every test constructs exactly the disk shape it needs — plus lookup
//! helpers that panic with a listing of what was available.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = std_export();
//! let ws = scan::scan(tmp.path()).unwrap();
//! let node = find_node(&ws.tree, "Getting Started");
//! assert!(node.file_path.is_some());
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::{NavNode, Workspace};

// =========================================================================
// Fixture building
// =========================================================================

pub fn tempdir() -> TempDir {
    TempDir::new().unwrap()
}

/// Deterministic 32-hex unique id for fixture entry `n`. The `feed0042`
/// stamp keeps fixture ids from colliding with the literal fragments tests
/// probe with.
pub fn uid(n: u8) -> String {
    format!("{:032x}", 0xfeed_0042_u128 * 0x1_0000_0000 + n as u128)
}

/// Percent-encode spaces the way the export writes hrefs.
pub fn encode(name: &str) -> String {
    name.replace(' ', "%20")
}

/// Write a root `index.html` with the given `<title>` and anchor list.
pub fn write_index(root: &Path, title: &str, anchors: &[(&str, &str)]) {
    let mut body = String::new();
    for (label, href) in anchors {
        body.push_str(&format!("<p><a href=\"{href}\">{label}</a></p>\n"));
    }
    let html = format!(
        "<!DOCTYPE html><html><head><title>{title}</title></head><body>\n{body}</body></html>\n"
    );
    fs::write(root.join("index.html"), html).unwrap();
}

/// Write a file at a root-relative path, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Root-relative path of the standard export's top page.
pub fn getting_started_file() -> String {
    format!("Getting Started {}.md", uid(1))
}

/// Build the standard export used across module tests:
///
/// ```text
/// index.html                         # Getting Started / Projects / Board / GitHub
/// Getting Started <1>.md             # page with children + an embedded image
/// Getting Started <1>/Deep Dive <4>.md
/// Getting Started <1>/screenshot.png
/// Projects <2>/Alpha <5>.md          # section header with one page
/// Board <3>.csv                      # dataset pair
/// Board <3>_all.csv
/// ```
pub fn std_export() -> TempDir {
    let tmp = tempdir();
    let root = tmp.path();

    let gs = getting_started_file();
    let gs_dir = format!("Getting Started {}", uid(1));

    write_index(
        root,
        "Demo Workspace",
        &[
            ("Getting Started", &encode(&gs)),
            ("Projects", &encode(&format!("Projects {}", uid(2)))),
            ("Board", &encode(&format!("Board {}.csv", uid(3)))),
            ("GitHub", "https://github.com/example"),
        ],
    );

    write_file(
        root,
        &gs,
        &format!(
            "# Getting Started\n\nWelcome.\n\n![shot]({}/screenshot.png)\n",
            encode(&gs_dir)
        ),
    );
    write_file(
        root,
        &format!("{gs_dir}/Deep Dive {}.md", uid(4)),
        "# Deep Dive\n\nDetails.\n",
    );
    write_file(root, &format!("{gs_dir}/screenshot.png"), "not really a png");
    write_file(
        root,
        &format!("Projects {}/Alpha {}.md", uid(2), uid(5)),
        "# Alpha\n",
    );
    write_file(
        root,
        &format!("Board {}.csv", uid(3)),
        "Name,Status\nAlpha,Open\n",
    );
    write_file(
        root,
        &format!("Board {}_all.csv", uid(3)),
        "Name,Status\nAlpha,Open\nBeta,Done\n",
    );

    tmp
}

// =========================================================================
// Tree lookups — panic with a clear message on miss
// =========================================================================

/// Find a node by title anywhere in the given subtrees. Panics if absent.
pub fn find_node<'a>(nodes: &'a [NavNode], title: &str) -> &'a NavNode {
    fn search<'a>(nodes: &'a [NavNode], title: &str) -> Option<&'a NavNode> {
        for node in nodes {
            if node.title == title {
                return Some(node);
            }
            if let Some(found) = search(&node.children, title) {
                return Some(found);
            }
        }
        None
    }
    search(nodes, title).unwrap_or_else(|| {
        let mut titles = Vec::new();
        for node in nodes {
            node.walk(&mut |n| titles.push(n.title.clone()));
        }
        panic!("node '{title}' not found. Available: {titles:?}")
    })
}

/// Top-level node titles in tree order.
pub fn top_titles(ws: &Workspace) -> Vec<&str> {
    ws.tree.iter().map(|n| n.title.as_str()).collect()
}
