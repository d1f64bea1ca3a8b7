// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal rendering for the `fields` subcommand.
//!
//! Color is used only when stdout is a terminal and `NO_COLOR` is unset.

use regsearch::{Bound, Clause, FieldSet, Occur};
use std::io::IsTerminal;

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
}

use colors::*;

/// Whether stdout should get escape codes.
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CLAUSE TREE
// ═══════════════════════════════════════════════════════════════════════════

/// Render a clause as an indented tree.
///
/// ```text
/// Boolean
/// ├── MUST     term type:oauth
/// └── MUST_NOT term enabled:false
/// ```
pub fn render_clause_tree(clause: &Clause, color: bool) -> String {
    let painter = Painter { color };
    let mut out = String::new();
    out.push_str(&label(clause, &painter));
    out.push('\n');
    render_children(clause, "", &painter, &mut out);
    out
}

fn render_children(clause: &Clause, prefix: &str, painter: &Painter, out: &mut String) {
    let Clause::Boolean(children) = clause else {
        return;
    };

    for (i, (occur, child)) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        let occur = match occur {
            Occur::Must => painter.paint(GREEN, "MUST    "),
            Occur::Should => painter.paint(DIM, "SHOULD  "),
            Occur::MustNot => painter.paint(RED, "MUST_NOT"),
        };

        out.push_str(&format!("{prefix}{branch}{occur} {}\n", label(child, painter)));
        render_children(child, &format!("{prefix}{indent}"), painter, out);
    }
}

fn label(clause: &Clause, painter: &Painter) -> String {
    let kind = |k: &str| painter.paint(DIM, k);
    match clause {
        Clause::Boolean(children) if children.is_empty() => {
            format!("{} (matches nothing)", painter.paint(BOLD, "Boolean"))
        }
        Clause::Boolean(_) => painter.paint(BOLD, "Boolean"),
        Clause::Term { .. } => format!("{} {clause}", kind("term")),
        Clause::Phrase { .. } => format!("{} {clause}", kind("phrase")),
        Clause::Wildcard { .. } => format!("{} {clause}", kind("wildcard")),
        Clause::Regexp { .. } => format!("{} {clause}", kind("regexp")),
        Clause::Range { lower, upper, .. } => {
            let numeric = [lower, upper]
                .iter()
                .all(|b| b.value().map_or(true, |v| v.parse::<i64>().is_ok()))
                && !matches!((lower, upper), (Bound::Unbounded, Bound::Unbounded));
            let kind_name = if numeric { "range (numeric)" } else { "range" };
            format!("{} {clause}", kind(kind_name))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FIELDS
// ═══════════════════════════════════════════════════════════════════════════

/// One discovered path per line, marking exact-match paths.
pub fn render_fields(fields: &FieldSet, color: bool) -> String {
    let painter = Painter { color };
    let mut out = String::new();
    for path in fields {
        let note = if path.is_body() {
            " (whole record + policy sub-objects)"
        } else if path.is_exact() {
            " (exact value)"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {}{}\n",
            painter.paint(CYAN, path.as_str()),
            painter.paint(DIM, note)
        ));
    }
    out
}
