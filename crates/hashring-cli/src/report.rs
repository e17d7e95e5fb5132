//! Text reports printed by the CLI subcommands.

use std::collections::BTreeMap;
use std::fmt::Write;

use hashring::{Ring, RingHasher};

/// Placeholder printed for keys routed on an empty ring.
const NO_NODE: &str = "(none)";

/// Route each key and render `key -> node` lines.
pub fn render_routes<H: RingHasher>(ring: &Ring<H>, keys: &[String]) -> String {
    let mut out = String::new();
    for key in keys {
        let node = ring.get_node(key).unwrap_or(NO_NODE);
        let _ = writeln!(out, "{key} -> {node}");
    }
    out
}

/// Count how many of `count` synthetic keys (`{prefix}{i}`) each node owns.
///
/// Every node in the ring appears, including nodes that received no keys.
pub fn distribution<H: RingHasher>(
    ring: &Ring<H>,
    count: usize,
    prefix: &str,
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = ring
        .node_ids()
        .into_iter()
        .map(|node| (node.to_string(), 0))
        .collect();

    for i in 0..count {
        if let Some(node) = ring.get_node(&format!("{prefix}{i}")) {
            *counts.entry(node.to_string()).or_default() += 1;
        }
    }
    counts
}

/// Render a distribution as `node  count  percent` rows.
pub fn render_distribution(counts: &BTreeMap<String, usize>) -> String {
    let total: usize = counts.values().sum();
    let width = counts.keys().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (node, count) in counts {
        let pct = if total == 0 {
            0.0
        } else {
            *count as f64 * 100.0 / total as f64
        };
        let _ = writeln!(out, "{node:<width$}  {count:>8}  {pct:>6.2}%");
    }
    let _ = writeln!(out, "{:<width$}  {total:>8}", "total");
    out
}

/// Key assignments before and after removing a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    /// The node that was removed.
    pub node: String,
    /// `(key, owner before, owner after)` for every key.
    pub rows: Vec<(String, Option<String>, Option<String>)>,
}

impl RemovalReport {
    /// Number of keys whose owner changed.
    pub fn moved(&self) -> usize {
        self.rows.iter().filter(|(_, b, a)| b != a).count()
    }
}

/// Compute assignments for `keys` with and without `node`.
///
/// The given ring is left untouched; removal happens on a clone.
pub fn removal<H: RingHasher + Clone>(
    ring: &Ring<H>,
    node: &str,
    keys: &[String],
) -> RemovalReport {
    let mut without = ring.clone();
    without.remove_node(node);

    let rows = keys
        .iter()
        .map(|key| {
            let before = ring.get_node(key).map(str::to_string);
            let after = without.get_node(key).map(str::to_string);
            (key.clone(), before, after)
        })
        .collect();

    RemovalReport {
        node: node.to_string(),
        rows,
    }
}

/// Render a removal report as a before/after table plus a summary line.
pub fn render_removal(report: &RemovalReport) -> String {
    let mut out = String::new();
    for (key, before, after) in &report.rows {
        let before = before.as_deref().unwrap_or(NO_NODE);
        let after = after.as_deref().unwrap_or(NO_NODE);
        let marker = if before == after { "" } else { "  (moved)" };
        let _ = writeln!(out, "{key}: {before} -> {after}{marker}");
    }
    let _ = writeln!(
        out,
        "removed {}: {}/{} keys moved",
        report.node,
        report.moved(),
        report.rows.len()
    );
    out
}
