//! File chooser popup for opening layout files

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{message, Labeled, SelectionList};
use crate::tui::surface::Surface;

const POPUP_WIDTH: u16 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    label: String,
    path: PathBuf,
    is_dir: bool,
}

impl Labeled for Entry {
    fn label(&self) -> &str {
        &self.label
    }
}

/// `..` first, then directories, then files, each group sorted by name;
/// hidden entries are left out
fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(Entry {
                label: format!("{name}/"),
                path,
                is_dir: true,
            });
        } else {
            files.push(Entry {
                label: name,
                path,
                is_dir: false,
            });
        }
    }
    dirs.sort_by(|a, b| a.label.cmp(&b.label));
    files.sort_by(|a, b| a.label.cmp(&b.label));

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    entries.push(Entry {
        label: "../".to_string(),
        path: dir.join(".."),
        is_dir: true,
    });
    entries.extend(dirs);
    entries.extend(files);
    Ok(entries)
}

/// Browse from `start` and return the chosen file, or `None` on Esc
///
/// A directory that cannot be listed is reported in a message box and
/// counts as no choice.
pub fn pick_file(surface: &mut dyn Surface, start: &Path) -> io::Result<Option<PathBuf>> {
    let mut dir = start.to_path_buf();
    loop {
        let entries = match list_entries(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("listing {} failed: {e}", dir.display());
                let text = format!("Cannot read {}: {e}", dir.display());
                message(surface, "Select File", &text)?;
                return Ok(None);
            }
        };
        let mut list = SelectionList::new("Select File", &entries, POPUP_WIDTH)
            .with_popup_width(POPUP_WIDTH);
        if !list.open(surface, 5, 5)? {
            return Ok(None);
        }

        let chosen = list.selected_item();
        if !chosen.is_dir {
            debug!("picked {}", chosen.path.display());
            return Ok(Some(chosen.path.clone()));
        }
        dir = chosen.path.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::surface::ScriptedSurface;
    use crossterm::event::KeyCode;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("layouts")).unwrap();
        std::fs::write(dir.path().join("layouts/qwerty.txt"), "0").unwrap();
        std::fs::write(dir.path().join("b.txt"), "0").unwrap();
        std::fs::write(dir.path().join("a.txt"), "0").unwrap();
        std::fs::write(dir.path().join(".hidden"), "0").unwrap();
        dir
    }

    #[test]
    fn test_listing_order() {
        let dir = tree();
        let labels: Vec<String> = list_entries(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, ["../", "layouts/", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_pick_in_start_dir() {
        let dir = tree();
        let mut surface = ScriptedSurface::new(80, 24).keys(&[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        let picked = pick_file(&mut surface, dir.path()).unwrap();
        assert_eq!(picked, Some(dir.path().join("a.txt")));
    }

    #[test]
    fn test_descend_into_directory() {
        let dir = tree();
        let mut surface = ScriptedSurface::new(80, 24).keys(&[
            KeyCode::Down,
            KeyCode::Enter,
            KeyCode::Down,
            KeyCode::Enter,
        ]);
        let picked = pick_file(&mut surface, dir.path()).unwrap();
        assert_eq!(picked, Some(dir.path().join("layouts").join("qwerty.txt")));
    }

    #[test]
    fn test_escape_picks_nothing() {
        let dir = tree();
        let mut surface = ScriptedSurface::new(80, 24).key(KeyCode::Esc);
        assert_eq!(pick_file(&mut surface, dir.path()).unwrap(), None);
    }

    #[test]
    fn test_unreadable_directory_is_reported() {
        let dir = tree();
        let mut surface = ScriptedSurface::new(80, 24).key(KeyCode::Enter);
        assert_eq!(pick_file(&mut surface, &dir.path().join("nope")).unwrap(), None);
        assert!(surface.was_shown("Cannot read"));
    }
}
