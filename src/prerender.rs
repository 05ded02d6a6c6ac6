//! Server-side generation of the static site used by restricted clients.
//!
//! Output layout under the target directory:
//!
//! - `data.json`: the roster for live clients
//! - `image/{class}.{ext}`: one table per class, plus `ALL`
//! - `image/status.json`: last-modified time and row count per class

use crate::metadata::LastModified;
use crate::rendering::TableRenderer;
use crate::roster::{ClassSelector, PrerenderStatus, Roster, RosterPayload};
use crate::strategy::{DATA_PATH, STATUS_PATH};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value).map_err(|e| Error::Other(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Class names become file names under `image/`, so they must stay a
/// single path segment.
fn check_class_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(Error::Config(format!("class name {:?} cannot be used as a file name", name)));
    }
    Ok(())
}

/// Selectors to render: the given classes, or `ALL` followed by every class
/// of the roster when none are given.
pub fn selectors_for(roster: &Roster, classes: &[String]) -> Vec<ClassSelector> {
    if classes.is_empty() {
        std::iter::once(ClassSelector::All)
            .chain(roster.class_names().into_iter().map(ClassSelector::Class))
            .collect()
    } else {
        classes.iter().map(|c| ClassSelector::parse(c)).collect()
    }
}

/// Write `data.json`, one image per selector and `image/status.json` into
/// `out`. Images are rendered on a pool sized to the CPU count.
pub fn write_site(
    out: &Path,
    roster: &Roster,
    classes: &[String],
    last_modified: LastModified,
    renderer: &TableRenderer,
) -> Result<PrerenderStatus> {
    let selectors = selectors_for(roster, classes);
    for selector in &selectors {
        check_class_name(selector.as_str())?;
    }

    let image_dir = out.join("image");
    std::fs::create_dir_all(&image_dir)?;
    let payload = RosterPayload {
        form_data: roster.rows().to_vec(),
        last_modified: last_modified.epoch_seconds(),
        class_name: roster.class_names(),
    };
    write_json(&out.join(DATA_PATH), &payload)?;

    let workers = num_cpus::get().clamp(1, selectors.len().max(1));
    let chunk = selectors.len().div_ceil(workers).max(1);
    let ext = renderer.format().extension();

    let results: Vec<Result<Vec<(String, usize)>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = selectors
            .chunks(chunk)
            .map(|batch| {
                let image_dir = &image_dir;
                scope.spawn(move || -> Result<Vec<(String, usize)>> {
                    let mut counts = Vec::with_capacity(batch.len());
                    for selector in batch {
                        let rows = roster.filter(selector);
                        let image = renderer.render(rows, selector.is_all())?;
                        let file: PathBuf = image_dir.join(format!("{}.{}", selector.as_str(), ext));
                        std::fs::write(&file, &image.data)?;
                        log::debug!("wrote {} ({} rows)", file.display(), rows.len());
                        counts.push((selector.as_str().to_string(), rows.len()));
                    }
                    Ok(counts)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(Error::Render("pre-render worker panicked".into())))
            })
            .collect()
    });

    let mut status = PrerenderStatus {
        last_modified: last_modified.epoch_seconds(),
        remains: Default::default(),
    };
    for batch in results {
        status.remains.extend(batch?);
    }
    write_json(&out.join(STATUS_PATH), &status)?;
    log::info!(
        "pre-rendered {} images into {}",
        status.remains.len(),
        image_dir.display()
    );
    Ok(status)
}
