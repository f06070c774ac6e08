use redact_core::{ArtifactFormat, Event, PiiCategory, UploadedFile};
use redact_engine::Coordinator;

use crate::file_browser::FileBrowser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Input,
    Original,
    Redacted,
    Log,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Input => Pane::Original,
            Pane::Original => Pane::Redacted,
            Pane::Redacted => Pane::Log,
            Pane::Log => Pane::Input,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingText,
    BrowsingFiles,
    ConfirmReset,
    ShowingHelp,
}

pub struct App {
    pub coordinator: Coordinator,
    pub input_mode: InputMode,
    pub focus: Pane,
    /// Pasted text as typed; committed to the workflow when editing ends
    pub text_buffer: String,
    pub file_browser: Option<FileBrowser>,
    pub scroll: [u16; 4],
    pub tick: usize,
}

impl App {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator,
            input_mode: InputMode::Normal,
            focus: Pane::Input,
            text_buffer: String::new(),
            file_browser: None,
            scroll: [0; 4],
            tick: 0,
        }
    }

    /// Apply finished network calls; called once per frame
    pub fn on_tick(&mut self) {
        self.coordinator.poll();
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn run(&mut self) {
        self.commit_text();
        self.coordinator.dispatch(Event::RunRequested);
        self.scroll[Pane::Redacted.index()] = 0;
        self.scroll[Pane::Log.index()] = 0;
    }

    pub fn toggle_category(&mut self, category: PiiCategory) {
        self.coordinator.dispatch(Event::CategoryToggled(category));
    }

    pub fn download(&mut self, format: ArtifactFormat) {
        self.coordinator.start_download(format);
    }

    pub fn toggle_help(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::ShowingHelp => InputMode::Normal,
            _ => InputMode::ShowingHelp,
        };
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn scroll_up(&mut self) {
        let offset = &mut self.scroll[self.focus.index()];
        *offset = offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let offset = &mut self.scroll[self.focus.index()];
        *offset = offset.saturating_add(1);
    }

    pub fn scroll_offset(&self, pane: Pane) -> u16 {
        self.scroll[pane.index()]
    }

    // Pasted text editing

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::EditingText;
        self.focus = Pane::Input;
    }

    pub fn input_char(&mut self, c: char) {
        self.text_buffer.push(c);
    }

    pub fn input_paste(&mut self, text: &str) {
        self.text_buffer.push_str(text);
    }

    pub fn input_backspace(&mut self) {
        self.text_buffer.pop();
    }

    pub fn finish_editing(&mut self) {
        self.commit_text();
        self.input_mode = InputMode::Normal;
    }

    fn commit_text(&mut self) {
        if self.coordinator.workflow().document.source_text != self.text_buffer {
            self.coordinator
                .dispatch(Event::SourceTextChanged(self.text_buffer.clone()));
        }
    }

    // File selection

    pub fn start_browsing(&mut self) {
        self.file_browser = Some(FileBrowser::new(None));
        self.input_mode = InputMode::BrowsingFiles;
    }

    pub fn browser_next(&mut self, visible_height: usize) {
        if let Some(browser) = &mut self.file_browser {
            browser.next(visible_height);
        }
    }

    pub fn browser_previous(&mut self) {
        if let Some(browser) = &mut self.file_browser {
            browser.previous();
        }
    }

    pub fn browser_go_up(&mut self) {
        if let Some(browser) = &mut self.file_browser {
            browser.go_up();
        }
    }

    pub fn browser_toggle_hidden(&mut self) {
        if let Some(browser) = &mut self.file_browser {
            browser.toggle_hidden();
        }
    }

    pub fn browser_toggle_show_all(&mut self) {
        if let Some(browser) = &mut self.file_browser {
            browser.toggle_show_all();
        }
    }

    /// Enter a directory, or select the highlighted file as the upload.
    /// A file that cannot be read becomes a notice; the session carries on.
    pub async fn browser_enter(&mut self) {
        let Some(browser) = &mut self.file_browser else {
            return;
        };
        let Some(path) = browser.enter_selected() else {
            return;
        };

        match UploadedFile::from_path(&path).await {
            Ok(file) => self.coordinator.dispatch(Event::FileSelected(file)),
            Err(e) => self
                .coordinator
                .notify(format!("Cannot read {}: {}", path.display(), e)),
        }
        self.close_browser();
    }

    pub fn clear_file(&mut self) {
        self.coordinator.dispatch(Event::FileCleared);
    }

    pub fn close_browser(&mut self) {
        self.file_browser = None;
        self.input_mode = InputMode::Normal;
    }

    // Reset

    pub fn start_reset(&mut self) {
        self.input_mode = InputMode::ConfirmReset;
    }

    pub fn confirm_reset(&mut self) {
        self.coordinator.dispatch(Event::ResetRequested);
        self.text_buffer.clear();
        self.scroll = [0; 4];
        self.focus = Pane::Input;
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}
