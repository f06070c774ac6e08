mod app;
mod file_browser;
mod ui;

pub use app::App;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use redact_core::{ArtifactFormat, PiiCategory};
use redact_engine::Coordinator;
use std::io;
use std::time::Duration;

/// How long to wait for terminal input before applying network completions
const FRAME: Duration = Duration::from_millis(100);

pub async fn run(coordinator: Coordinator) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(coordinator);

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(FRAME)? {
            tokio::task::yield_now().await;
            continue;
        }

        use app::InputMode;

        match event::read()? {
            Event::Paste(text) if app.input_mode == InputMode::EditingText => {
                app.input_paste(&text);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('e') => app.start_editing(),
                    KeyCode::Char('o') => app.start_browsing(),
                    KeyCode::Char('c') => app.clear_file(),
                    KeyCode::Char('r') => app.run(),
                    KeyCode::Char('1') => app.toggle_category(PiiCategory::Emails),
                    KeyCode::Char('2') => app.toggle_category(PiiCategory::Phones),
                    KeyCode::Char('3') => app.toggle_category(PiiCategory::Names),
                    KeyCode::Char('4') => app.toggle_category(PiiCategory::Addresses),
                    KeyCode::Char('t') => app.download(ArtifactFormat::Text),
                    KeyCode::Char('p') => app.download(ArtifactFormat::Pdf),
                    KeyCode::Char('x') => app.start_reset(),
                    KeyCode::Tab => app.cycle_focus(),
                    KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
                    KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
                    _ => {}
                },
                InputMode::EditingText => match key.code {
                    KeyCode::Esc => app.finish_editing(),
                    KeyCode::Enter => app.input_char('\n'),
                    KeyCode::Tab => app.input_char('\t'),
                    KeyCode::Backspace => app.input_backspace(),
                    KeyCode::Char(c) => app.input_char(c),
                    _ => {}
                },
                InputMode::BrowsingFiles => {
                    // Matches the 85% popup height, minus borders
                    let visible_height =
                        (terminal.size()?.height as usize * 85 / 100).saturating_sub(2);
                    match key.code {
                        KeyCode::Char('j') | KeyCode::Down => app.browser_next(visible_height),
                        KeyCode::Char('k') | KeyCode::Up => app.browser_previous(),
                        KeyCode::Enter | KeyCode::Char('l') => app.browser_enter().await,
                        KeyCode::Char('h') | KeyCode::Backspace => app.browser_go_up(),
                        KeyCode::Char('.') => app.browser_toggle_hidden(),
                        KeyCode::Char('a') => app.browser_toggle_show_all(),
                        KeyCode::Esc => app.close_browser(),
                        _ => {}
                    }
                }
                InputMode::ConfirmReset => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_reset(),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_input(),
                    _ => {}
                },
                InputMode::ShowingHelp => match key.code {
                    KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
                    _ => {}
                },
            },
            _ => {}
        }
    }
}
