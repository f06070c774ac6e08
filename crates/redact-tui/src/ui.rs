use crate::app::{App, InputMode, Pane};
use redact_core::{ArtifactFormat, PiiCategory, RunState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(0),     // Main content
            Constraint::Length(3),  // Footer
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_main(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);

    match app.input_mode {
        InputMode::BrowsingFiles => draw_file_browser(f, app),
        InputMode::ConfirmReset => draw_confirm_reset(f),
        InputMode::ShowingHelp => draw_help(f),
        InputMode::Normal | InputMode::EditingText => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("redact - PII Redaction")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_main(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Input + settings
            Constraint::Percentage(60), // Results
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3), // File
            Constraint::Length(6), // Settings
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ])
        .split(columns[1]);

    draw_input(f, app, left[0]);
    draw_file(f, app, left[1]);
    draw_settings(f, app, left[2]);

    let doc = &app.coordinator.workflow().document;
    draw_text_pane(f, app, right[0], Pane::Original, " Original ", &doc.original_text);
    draw_text_pane(f, app, right[1], Pane::Redacted, " Redacted ", &doc.redacted_text);
    draw_text_pane(f, app, right[2], Pane::Log, " Log ", &doc.log_text());
}

fn pane_block(app: &App, pane: Pane, title: &str) -> Block<'static> {
    let (title, style) = if app.focus == pane {
        (format!("{}[FOCUSED] ", title), Style::default().fg(Color::Yellow))
    } else {
        (title.to_string(), Style::default())
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::EditingText;
    let title = if editing {
        " Paste text (esc: done) "
    } else {
        " Paste text (e: edit) "
    };

    let mut content = app.text_buffer.clone();
    if editing {
        content.push('█');
    }

    let style = if app.coordinator.workflow().file.is_some() {
        // A selected file takes precedence over pasted text.
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(content)
        .style(style)
        .block(pane_block(app, Pane::Input, title))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset(Pane::Input), 0));
    f.render_widget(paragraph, area);
}

fn draw_file(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.coordinator.workflow().file {
        Some(file) => format!("📎 {}", file.name),
        None => "No file (o: choose PDF)".to_string(),
    };
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Upload "));
    f.render_widget(paragraph, area);
}

fn draw_settings(f: &mut Frame, app: &App, area: Rect) {
    let settings = &app.coordinator.workflow().settings;
    let items: Vec<ListItem> = PiiCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let enabled = settings.is_enabled(*category);
            let mark = if enabled { "[x]" } else { "[ ]" };
            let style = if enabled {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(format!("{} {} {}", i + 1, mark, category.label())).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Redact "));
    f.render_widget(list, area);
}

fn draw_text_pane(f: &mut Frame, app: &App, area: Rect, pane: Pane, title: &str, text: &str) {
    let paragraph = Paragraph::new(text.to_string())
        .block(pane_block(app, pane, title))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset(pane), 0));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let wf = app.coordinator.workflow();

    // Run state first, then the latest notice; a failed run must not hide
    // later notices such as download failures.
    let mut spans = Vec::new();
    if app.coordinator.is_busy() {
        spans.push(Span::styled(
            format!("{} Processing...", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::Cyan),
        ));
    } else if let Some(e) = &wf.last_error {
        spans.push(Span::styled(
            format!("Error: {}", e),
            Style::default().fg(Color::Red),
        ));
    } else if wf.notice.is_none() {
        spans.push(match wf.phase {
            RunState::Succeeded => Span::styled("✓ Redacted", Style::default().fg(Color::Green)),
            _ => Span::raw("Ready"),
        });
    }
    if let Some(notice) = &wf.notice {
        if !spans.is_empty() {
            spans.push(Span::raw(" · "));
        }
        spans.push(Span::raw(notice.clone()));
    }

    let download_style = if wf.downloads_enabled {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    spans.extend([
        Span::raw(" | "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(":redact "),
    ]);
    for (key, format) in [("t", ArtifactFormat::Text), ("p", ArtifactFormat::Pdf)] {
        spans.push(Span::styled(key, download_style));
        spans.push(Span::styled(format!(":{} ", format.file_name()), download_style));
    }
    spans.extend([
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::raw(":reset "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(":help "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(":quit"),
    ]);

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

/// Rect of `percent_x` x `percent_y` centred in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_file_browser(f: &mut Frame, app: &App) {
    let Some(browser) = &app.file_browser else {
        return;
    };

    let area = centered_rect(70, 85, f.area());
    let visible = area.height.saturating_sub(2) as usize;

    let items: Vec<ListItem> = browser
        .entries
        .iter()
        .enumerate()
        .skip(browser.scroll_offset)
        .take(visible)
        .map(|(i, entry)| {
            let label = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let style = if i == browser.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if entry.is_dir {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let filter = if browser.show_all { "all files" } else { "PDF" };
    let title = format!(" {} ({}) ", browser.current_dir.display(), filter);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(Clear, area);
    f.render_widget(list, area);
}

fn draw_confirm_reset(f: &mut Frame) {
    let area = centered_rect(40, 20, f.area());
    let paragraph = Paragraph::new("Are you sure you want to reset all fields?\n\n(y/n)")
        .block(Block::default().borders(Borders::ALL).title(" Reset "))
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let help = "Keyboard shortcuts:\n\
        \n  e        - Edit pasted text (esc to finish)\
        \n  o        - Choose a PDF to upload\
        \n  c        - Clear the selected file\
        \n  1-4      - Toggle emails / phones / names / addresses\
        \n  r        - Run redaction\
        \n  t / p    - Download redacted.txt / redacted.pdf\
        \n  x        - Reset everything\
        \n  tab      - Switch focused pane\
        \n  j/k      - Scroll focused pane\
        \n  q        - Quit";

    let paragraph = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
