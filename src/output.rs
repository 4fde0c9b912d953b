//! CLI output formatting.
//!
//! Output is information-centric: the primary display for every entry is its
//! title and positional index, with filesystem paths as indented `Source:`
//! context lines. Each formatter is a pure function returning lines, with a
//! `print_*` wrapper that writes to stdout — keeps the formatting testable
//! without capturing stdout.
//!
//! ```text
//! Workspace: Demo Workspace
//! 001 Getting Started
//!     Source: Getting Started 4a1b….md
//!     001 Deep Dive
//!         Source: Getting Started 4a1b…/Deep Dive 9f8e….md
//! 002 Board (dataset)
//!     Source: Board a1b2….csv
//! 003 GitHub → https://github.com/example
//! ```

use crate::types::{NavNode, Workspace};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Indentation: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn node_header(index: usize, node: &NavNode) -> String {
    if node.is_external {
        let url = node.external_url.as_deref().unwrap_or("");
        return format!("{} {} → {}", format_index(index), node.title, url);
    }
    if node.is_csv {
        return format!("{} {} (dataset)", format_index(index), node.title);
    }
    format!("{} {}", format_index(index), node.title)
}

fn push_node(lines: &mut Vec<String>, node: &NavNode, index: usize, depth: usize) {
    lines.push(format!("{}{}", indent(depth), node_header(index, node)));
    if let Some(path) = &node.file_path {
        lines.push(format!("{}Source: {}", indent(depth + 1), path));
    }
    for (i, child) in node.children.iter().enumerate() {
        push_node(lines, child, i + 1, depth + 1);
    }
}

/// Format the full navigation tree.
pub fn format_nav_output(ws: &Workspace) -> Vec<String> {
    let mut lines = vec![format!("Workspace: {}", ws.name)];
    for (i, node) in ws.tree.iter().enumerate() {
        push_node(&mut lines, node, i + 1, 0);
    }
    lines
}

pub fn print_nav_output(ws: &Workspace) {
    for line in format_nav_output(ws) {
        println!("{line}");
    }
}

/// Format the check summary: entry counts by kind.
pub fn format_check_output(ws: &Workspace) -> Vec<String> {
    let mut pages = 0;
    let mut datasets = 0;
    let mut sections = 0;
    let mut external = 0;
    for root in &ws.tree {
        root.walk(&mut |n| {
            if n.is_external {
                external += 1;
            } else if n.is_csv {
                datasets += 1;
            } else if n.file_path.is_some() {
                pages += 1;
            } else {
                sections += 1;
            }
        });
    }
    vec![format!(
        "Workspace '{}': {} pages, {} datasets, {} sections, {} external links",
        ws.name, pages, datasets, sections, external
    )]
}

pub fn print_check_output(ws: &Workspace) {
    for line in format_check_output(ws) {
        println!("{line}");
    }
}
