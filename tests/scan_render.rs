//! Scanning, filtering, and rendering against real directory fixtures.

mod common;

use common::{create_fixture, create_project, default_tree_config, write_file};
use ls_tree::events::{Level, MemorySink, NullSink};
use ls_tree::filter::prune;
use ls_tree::ignore_rules::IgnoreRuleSet;
use ls_tree::pattern;
use ls_tree::probe;
use ls_tree::tree::{self, count_entries, Entry, TreeConfig};

fn names(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

fn find<'a>(entries: &'a [Entry], relative_path: &str) -> Option<&'a Entry> {
    entries.iter().find_map(|e| {
        if e.relative_path == relative_path {
            Some(e)
        } else {
            find(e.children(), relative_path)
        }
    })
}

fn all_relative_paths(entries: &[Entry], out: &mut Vec<String>) {
    for e in entries {
        out.push(e.relative_path.clone());
        all_relative_paths(e.children(), out);
    }
}

#[test]
fn directories_come_before_files() {
    let tmp = create_fixture(&["b.txt", "a/", "c.txt", "z/", "a/inner.txt"]);
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();

    assert_eq!(entries.len(), 4);
    assert!(entries[0].is_dir && entries[1].is_dir);
    assert!(!entries[2].is_dir && !entries[3].is_dir);

    let mut dirs = names(&entries[..2]);
    dirs.sort_unstable();
    assert_eq!(dirs, vec!["a", "z"]);
}

#[test]
fn each_group_keeps_listing_order() {
    let tmp = create_fixture(&[
        "d9/", "d2/", "b.txt", "d1/", "m.txt", "z.txt", "q.txt", "a.txt", "d5/",
    ]);
    let listed = probe::list_directory(tmp.path(), &NullSink).unwrap();
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();

    let listed_dirs: Vec<&str> = listed
        .iter()
        .filter(|l| l.is_dir)
        .map(|l| l.name.as_str())
        .collect();
    let listed_files: Vec<&str> = listed
        .iter()
        .filter(|l| !l.is_dir)
        .map(|l| l.name.as_str())
        .collect();

    let scanned = names(&entries);
    assert_eq!(scanned.len(), listed.len());
    assert_eq!(&scanned[..listed_dirs.len()], listed_dirs.as_slice());
    assert_eq!(&scanned[listed_dirs.len()..], listed_files.as_slice());
}

#[test]
fn entries_carry_paths_sizes_and_depths() {
    let tmp = create_project();
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();

    let src = find(&entries, "src").unwrap();
    assert!(src.is_dir);
    assert_eq!(src.size, 0);
    assert_eq!(src.depth, 0);
    assert_eq!(src.children().len(), 2);

    let index = find(&entries, "src/index.ts").unwrap();
    assert!(!index.is_dir);
    assert!(index.children.is_none());
    assert_eq!(index.depth, 1);
    assert_eq!(index.size, "export {};\n".len() as u64);
    assert_eq!(index.path, tmp.path().join("src").join("index.ts"));
}

#[test]
fn depth_limit_lists_but_does_not_expand() {
    let tmp = create_fixture(&["a/b/c/d.txt", "top.txt"]);
    let config = TreeConfig {
        max_depth: Some(1),
        ..default_tree_config()
    };
    let entries = tree::scan(tmp.path(), &config, &NullSink).unwrap();

    let b = find(&entries, "a/b").unwrap();
    assert!(b.is_dir);
    assert_eq!(b.depth, 1);
    assert_eq!(b.children, Some(Vec::new()));
    assert!(find(&entries, "a/b/c").is_none());

    let mut paths = Vec::new();
    all_relative_paths(&entries, &mut paths);
    for path in &paths {
        let entry = find(&entries, path).unwrap();
        assert!(entry.depth <= 1, "{path} is too deep");
    }
}

#[test]
fn depth_zero_lists_only_the_root_children() {
    let tmp = create_fixture(&["a/b.txt", "c.txt"]);
    let config = TreeConfig {
        max_depth: Some(0),
        ..default_tree_config()
    };
    let entries = tree::scan(tmp.path(), &config, &NullSink).unwrap();
    assert_eq!(count_entries(&entries), 2);
    assert_eq!(find(&entries, "a").unwrap().children(), &[] as &[Entry]);
}

#[test]
fn hidden_entries_follow_the_flag() {
    let tmp = create_project();

    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();
    assert!(find(&entries, ".git").is_none());

    let config = TreeConfig {
        ignore_hidden: false,
        ..default_tree_config()
    };
    let entries = tree::scan(tmp.path(), &config, &NullSink).unwrap();
    assert!(find(&entries, ".git/HEAD").is_some());
}

#[test]
fn ignore_rules_skip_matching_entries_and_their_subtrees() {
    let tmp = create_fixture(&["app.log", "src/debug.log", "src/main.ts", "build/out.js", "keep/"]);
    let config = TreeConfig {
        ignore_rules: IgnoreRuleSet::new(&["*.log", "build/"], &NullSink),
        ..default_tree_config()
    };
    let entries = tree::scan(tmp.path(), &config, &NullSink).unwrap();

    let mut paths = Vec::new();
    all_relative_paths(&entries, &mut paths);
    paths.sort();
    assert_eq!(paths, vec!["keep", "src", "src/main.ts"]);
}

#[test]
fn empty_directory_scans_to_nothing() {
    let tmp = create_fixture(&[]);
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();
    assert!(entries.is_empty());
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_listed_empty_with_warning() {
    if common::running_privileged() {
        eprintln!("skipping: permissions are not enforced for this user");
        return;
    }
    let tmp = create_fixture(&["locked/secret.txt", "open.txt"]);
    let locked = tmp.path().join("locked");
    common::set_mode(&locked, 0o000);

    let sink = MemorySink::new();
    let result = tree::scan(tmp.path(), &default_tree_config(), &sink);
    common::set_mode(&locked, 0o755);

    let entries = result.unwrap();
    let entry = find(&entries, "locked").unwrap();
    assert!(entry.is_dir);
    assert!(entry.children().is_empty());
    assert!(find(&entries, "open.txt").is_some());

    let warnings = sink.messages(Level::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("no permission"));
}

#[test]
fn rendered_project_tree() {
    let tmp = create_fixture(&["proj/src/index.ts", "proj/README.md"]);
    let root = tmp.path().join("proj");
    let entries = tree::scan(&root, &default_tree_config(), &NullSink).unwrap();

    assert_eq!(
        tree::render_tree(&entries, "proj"),
        "proj\n├── src\n│   └── index.ts\n└── README.md"
    );
}

#[test]
fn render_has_one_line_per_entry_plus_root() {
    let tmp = create_project();
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();
    let rendered = tree::render_tree(&entries, "root");

    assert_eq!(rendered.lines().count(), count_entries(&entries) + 1);
    assert!(!rendered.ends_with('\n'));
}

#[test]
fn filtering_removes_every_match_and_keeps_the_rest() {
    let tmp = create_fixture(&[
        "src/app.ts",
        "src/app.test.ts",
        "node_modules/pkg/index.js",
        "lib/node_modules/x.js",
        "notes.log",
    ]);
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();
    let patterns = pattern::compile(&["node_modules", "*.log", "/\\.test\\.ts$/"], &NullSink);
    let pruned = prune(entries, &patterns);

    let mut paths = Vec::new();
    all_relative_paths(&pruned, &mut paths);
    for path in &paths {
        assert!(!pattern::matches(&patterns, path), "{path} should be gone");
    }
    paths.sort();
    assert_eq!(paths, vec!["lib", "src", "src/app.ts"]);
}

#[test]
fn wildcard_filter_keeps_dotfiles_when_hidden_are_shown() {
    let tmp = create_fixture(&[".env", "a.txt", "src/main.ts"]);
    let config = TreeConfig {
        ignore_hidden: false,
        ..default_tree_config()
    };
    let entries = tree::scan(tmp.path(), &config, &NullSink).unwrap();
    let pruned = prune(entries, &pattern::compile(&["*"], &NullSink));

    assert_eq!(names(&pruned), vec![".env"]);
}

#[test]
fn filtering_twice_changes_nothing() {
    let tmp = create_project();
    write_file(tmp.path(), "src/old.bak", "");
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();
    let patterns = pattern::compile(&["*.bak"], &NullSink);

    let once = prune(entries, &patterns);
    let twice = prune(once.clone(), &patterns);
    assert_eq!(once, twice);
}

#[test]
fn directory_files_are_collected_for_merging() {
    let tmp = create_fixture(&["src/a.ts", "src/lib/b.ts", "src-old/c.ts", "docs/d.md"]);
    let entries = tree::scan(tmp.path(), &default_tree_config(), &NullSink).unwrap();

    let mut files = tree::collect_dir_files(&entries, &["./src/"]);
    files.sort();
    assert_eq!(
        files,
        vec![
            tmp.path().join("src").join("a.ts"),
            tmp.path().join("src").join("lib").join("b.ts"),
        ]
    );

    let all: Vec<_> = tree::collect_files(&entries)
        .iter()
        .map(|e| e.relative_path.clone())
        .collect();
    assert_eq!(all.len(), 4);
    assert!(all.contains(&"docs/d.md".to_string()));
}
