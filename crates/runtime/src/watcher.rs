use anyhow::Result;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use tracing::info;

/// Watches a scene file and reports each modification on the returned channel.
///
/// The watcher stops when the returned handle is dropped.
pub fn start(scene_path: &Path) -> Result<(RecommendedWatcher, Receiver<PathBuf>)> {
    info!("Initializing scene watcher...");
    let (tx, rx) = channel();
    let target = scene_path.canonicalize()?;
    let file_name = target.file_name().map(ToOwned::to_owned);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if event.kind.is_modify() || event.kind.is_create() {
                for path in &event.paths {
                    if path.file_name() == file_name.as_deref() {
                        // receiver gone means the frame loop exited
                        let _ = tx.send(path.clone());
                    }
                }
            }
        }
        Err(e) => tracing::error!("Error watching scene file: {e:?}"),
    })?;

    // Editors often replace the file, so watch its directory.
    let dir = target.parent().unwrap_or(Path::new("."));
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    info!("Scene watcher started for {:?}.", target);
    Ok((watcher, rx))
}
