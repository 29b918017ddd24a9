use super::Entry;

const BRANCH: &str = "\u{251c}\u{2500}\u{2500} "; // ├──
const CORNER: &str = "\u{2514}\u{2500}\u{2500} "; // └──
const BAR: &str = "\u{2502}   "; // │
const BLANK: &str = "    ";

/// One visible row before prefix computation.
struct Row<'a> {
    level: usize,
    name: &'a str,
    is_last: bool,
}

/// Render `entries` as a box-drawing tree whose first line is `root_label`.
/// Lines are joined with `\n`, no trailing newline.
pub fn render_tree(entries: &[Entry], root_label: &str) -> String {
    let mut rows = Vec::new();
    flatten(entries, 0, &mut rows);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(root_label.to_string());

    // ancestor_is_last[l] = whether the open ancestor at level l was last
    let mut ancestor_is_last: Vec<bool> = Vec::new();
    for row in &rows {
        ancestor_is_last.truncate(row.level);

        let mut line = String::new();
        for &last in &ancestor_is_last {
            line.push_str(if last { BLANK } else { BAR });
        }
        line.push_str(if row.is_last { CORNER } else { BRANCH });
        line.push_str(row.name);
        lines.push(line);

        ancestor_is_last.push(row.is_last);
    }

    lines.join("\n")
}

/// Depth-first pre-order listing with last-sibling flags.
fn flatten<'a>(entries: &'a [Entry], level: usize, rows: &mut Vec<Row<'a>>) {
    for (i, entry) in entries.iter().enumerate() {
        rows.push(Row {
            level,
            name: &entry.name,
            is_last: i + 1 == entries.len(),
        });
        flatten(entry.children(), level + 1, rows);
    }
}
