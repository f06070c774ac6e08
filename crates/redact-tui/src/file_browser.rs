use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Directory browser used to pick the document to upload
pub struct FileBrowser {
    pub current_dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected_index: usize,
    pub show_hidden: bool,
    /// List every file, not just PDFs
    pub show_all: bool,
    pub scroll_offset: usize,
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

impl FileBrowser {
    pub fn new(start_dir: Option<PathBuf>) -> Self {
        let current_dir = start_dir
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut browser = Self {
            current_dir,
            entries: Vec::new(),
            selected_index: 0,
            show_hidden: false,
            show_all: false,
            scroll_offset: 0,
        };
        browser.load_entries();
        browser
    }

    /// Unreadable directories list only ".." so the user can back out
    pub fn load_entries(&mut self) {
        self.entries.clear();
        self.selected_index = 0;
        self.scroll_offset = 0;

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }

        if let Ok(read_dir) = fs::read_dir(&self.current_dir) {
            self.entries.extend(read_dir.flatten().filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if !self.show_hidden && name.starts_with('.') {
                    return None;
                }
                let path = entry.path();
                let is_dir = path.is_dir();
                if !is_dir && !self.show_all && !is_pdf(&path) {
                    return None;
                }
                Some(FileEntry { name, path, is_dir })
            }));
        }

        // ".." first, then directories, then files alphabetically
        self.entries.sort_by(|a, b| match (&a.name[..], &b.name[..]) {
            ("..", _) => Ordering::Less,
            (_, "..") => Ordering::Greater,
            _ => match (a.is_dir, b.is_dir) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            },
        });
    }

    pub fn next(&mut self, visible_height: usize) {
        if self.entries.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1).min(self.entries.len() - 1);
        if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index + 1 - visible_height;
        }
    }

    pub fn previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
    }

    /// Descend into the selected directory, or return the selected file
    pub fn enter_selected(&mut self) -> Option<PathBuf> {
        let entry = self.entries.get(self.selected_index)?;
        if !entry.is_dir {
            return Some(entry.path.clone());
        }
        self.current_dir = entry.path.clone();
        self.load_entries();
        None
    }

    pub fn go_up(&mut self) {
        if let Some(parent) = self.current_dir.parent() {
            self.current_dir = parent.to_path_buf();
            self.load_entries();
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.load_entries();
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.load_entries();
    }
}
