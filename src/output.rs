//! CLI output formatting.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Index
//!     Registered 2 new images in source/index.json
//!     001 New (c.jpg)
//!     002 New (b.jpg)
//!
//! Page → public/index.html (3 posts)
//!
//! Images
//! 001 c.jpg: 1440x960
//! 002 b.jpg: exists, skipped
//! 003 a.jpg: failed: Failed to decode source/images/a.jpg: ...
//!
//! Built 3 posts: 1 image written, 1 skipped, 1 failed
//! ```
//!
//! ## Check
//!
//! ```text
//! 2 unregistered images
//!     c.jpg
//!     b.jpg
//! ```

use crate::build::BuildReport;
use crate::process::ImageStatus;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Index".to_string()];
    if report.registered.is_empty() {
        lines.push(format!("{}No new images", indent(1)));
    } else {
        lines.push(format!(
            "{}Registered {} in {}",
            indent(1),
            plural(report.registered.len(), "new image"),
            report.index_path.display()
        ));
        for (i, image) in report.registered.iter().enumerate() {
            lines.push(format!(
                "{}{} New ({})",
                indent(1),
                format_index(i + 1),
                image
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Page → {} ({})",
        report.html_path.display(),
        plural(report.post_count, "post")
    ));

    lines.push(String::new());
    lines.push("Images".to_string());
    for (i, item) in report.images.iter().enumerate() {
        let status = match &item.status {
            ImageStatus::Written(dims) => format!("{}x{}", dims.width, dims.height),
            ImageStatus::Skipped => "exists, skipped".to_string(),
            ImageStatus::Failed(e) => format!("failed: {e}"),
        };
        lines.push(format!(
            "{} {}: {}",
            format_index(i + 1),
            item.image,
            status
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}: {} written, {} skipped, {} failed",
        plural(report.post_count, "post"),
        plural(report.written(), "image"),
        report.skipped(),
        report.failed()
    ));
    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

pub fn format_check(pending: &[String]) -> Vec<String> {
    if pending.is_empty() {
        return vec!["All images are registered".to_string()];
    }
    let mut lines = vec![plural(pending.len(), "unregistered image")];
    for image in pending {
        lines.push(format!("{}{}", indent(1), image));
    }
    lines
}

pub fn print_check(pending: &[String]) {
    for line in format_check(pending) {
        println!("{}", line);
    }
}

pub fn format_serve_banner(root: &Path, addr: &str) -> String {
    format!("Serving {} at http://{}", root.display(), addr)
}
