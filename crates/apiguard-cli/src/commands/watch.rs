use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use apiguard_core::config::{ApiguardConfig, APIGUARD_DIR};
use apiguard_output::OutputFormatter;
use apiguard_parsers::detect_language;
use notify::{Event, EventKind, RecursiveMode, Watcher};

const IGNORED_DIRS: &[&str] = &[APIGUARD_DIR, ".git", "target", "build", "out", "node_modules"];
const DEBOUNCE_MS: u64 = 200;

fn is_watched(path: &Path) -> bool {
    let ignored = path.components().any(|c| match c {
        Component::Normal(s) => IGNORED_DIRS.contains(&s.to_str().unwrap_or("")),
        _ => false,
    });
    !ignored && detect_language(path).is_some()
}

fn changed_paths(event: &Event, into: &mut BTreeSet<PathBuf>) {
    if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        into.extend(event.paths.iter().filter(|p| is_watched(p)).cloned());
    }
}

/// Run `apiguard watch`: re-check Java files as they change.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool) -> i32 {
    let root = match super::project_root("watch") {
        Ok(p) => p,
        Err(code) => return code,
    };
    let config = super::load_config(&root);
    let engine = super::check::build_engine(&root, &config, None, &[]);
    let report_dir = config
        .report
        .enabled
        .then(|| ApiguardConfig::resolve(&root, &config.report.dir));

    let (tx, rx) = mpsc::channel::<Event>();
    let mut watcher = match notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    }) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("apiguard watch: failed to create watcher: {}", e);
            return 2;
        }
    };

    if let Err(e) = watcher.watch(&root, RecursiveMode::Recursive) {
        eprintln!("apiguard watch: failed to watch directory: {}", e);
        return 2;
    }

    let mut total_checks = 0u32;
    eprintln!("apiguard watch: watching for changes... (Ctrl+C to stop)");

    while let Ok(event) = rx.recv() {
        let mut changed = BTreeSet::new();
        changed_paths(&event, &mut changed);

        // Debounce: drain events for DEBOUNCE_MS
        while let Ok(ev) = rx.recv_timeout(Duration::from_millis(DEBOUNCE_MS)) {
            changed_paths(&ev, &mut changed);
        }

        let files: Vec<PathBuf> = changed
            .iter()
            .filter(|p| p.is_file())
            .map(|p| super::relative_to(&root, p))
            .collect();
        if files.is_empty() {
            continue;
        }

        if verbose {
            let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
            eprintln!("apiguard watch: checking {}", names.join(" "));
        }
        super::check::check_and_print(
            formatter,
            &engine,
            &root,
            &files,
            report_dir.as_deref(),
            verbose,
        );
        total_checks += 1;
    }

    eprintln!("apiguard watch: stopped. Total checks: {}", total_checks);
    0
}
