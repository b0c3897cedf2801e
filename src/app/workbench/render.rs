use super::{preview_lines, Focus, Workbench};
use crate::kernel::{EditingSurface, ViewMode};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const STATUS_HEIGHT: u16 = 1;
const EXPLORER_WIDTH_PERCENT: u16 = 25;
const EXPLORER_MIN_WIDTH: u16 = 18;
const KEY_HINTS: &str =
    "^N new  ^O open  F2 rename  Del delete  ^E edit/preview  ^R refresh  ^Q quit";

impl Workbench {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
            .split(area);

        let explorer_width = (rows[0].width * EXPLORER_WIDTH_PERCENT / 100).max(EXPLORER_MIN_WIDTH);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(explorer_width), Constraint::Min(0)])
            .split(rows[0]);

        self.render_explorer(frame, columns[0]);
        match self.session.view_mode() {
            ViewMode::Edit => self.render_editor(frame, columns[1]),
            ViewMode::Preview => self.render_preview(frame, columns[1]),
        }
        self.render_status(frame, rows[1]);
    }

    fn render_explorer(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Explorer && self.prompt.is_none();
        let bound_name = self
            .session
            .bound_path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string());

        let items: Vec<ListItem> = self
            .session
            .notes()
            .iter()
            .map(|name| {
                let marker = if bound_name.as_deref() == Some(name.as_str()) {
                    "● "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{name}"))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Notes ", Style::default().fg(self.theme.header_fg)))
            .border_style(Style::default().fg(self.theme.border(focused)));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selected_item_bg));

        let mut state = ListState::default();
        if !self.session.notes().is_empty() {
            state.select(Some(self.explorer_selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Editor && self.prompt.is_none();
        let surface = self.session.surface();
        let buffer = surface.buffer();
        let tab_width = self.session.config().indent_width.max(1);

        let title = match self.session.bound_path() {
            Some(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                let dirty = if self.session.has_unsaved_changes() { " ●" } else { "" };
                let lock = if surface.is_enabled() { "" } else { " [read-only]" };
                format!(" {name}{dirty}{lock} ")
            }
            None => " (no note) ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, Style::default().fg(self.theme.header_fg)))
            .border_style(Style::default().fg(self.theme.border(focused)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        let selection = buffer.selection();
        let (sel_start, sel_end) = selection.range();
        let (cursor_row, cursor_col) = buffer.offset_to_line_col(selection.head());

        let mut scroll = self.editor_scroll;
        if cursor_row < scroll {
            scroll = cursor_row;
        } else if height > 0 && cursor_row >= scroll + height {
            scroll = cursor_row + 1 - height;
        }

        let selected = Style::default().bg(self.theme.selection_bg);
        let mut lines = Vec::with_capacity(height);
        let mut cursor_x = None;
        for row in scroll..(scroll + height).min(buffer.len_lines()) {
            let line_start = buffer.line_col_to_offset(row, 0);
            let text = buffer.line(row).unwrap_or_default();
            let text = text.trim_end_matches(['\n', '\r']);

            let mut spans = Vec::new();
            let mut run = String::new();
            let mut run_selected = false;
            for (i, ch) in text.chars().enumerate() {
                let offset = line_start + i;
                let in_selection = offset >= sel_start && offset < sel_end;
                if in_selection != run_selected && !run.is_empty() {
                    spans.push(styled_run(std::mem::take(&mut run), run_selected, selected));
                }
                run_selected = in_selection;
                if ch == '\t' {
                    run.push_str(&" ".repeat(tab_width));
                } else {
                    run.push(ch);
                }
            }
            if !run.is_empty() {
                spans.push(styled_run(run, run_selected, selected));
            }

            if row == cursor_row {
                let prefix: String = text.chars().take(cursor_col).collect();
                cursor_x = Some(display_width(&prefix, tab_width));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if focused && surface.is_enabled() {
            if let Some(x) = cursor_x {
                let x = inner.x + (x as u16).min(inner.width.saturating_sub(1));
                let y = inner.y + (cursor_row - scroll) as u16;
                frame.set_cursor_position((x, y));
            }
        }
        self.editor_scroll = scroll;
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let title = match self.session.bound_path() {
            Some(path) => format!(" Preview: {} ", path.display()),
            None => " Preview ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, Style::default().fg(self.theme.header_fg)))
            .border_style(Style::default().fg(self.theme.border(false)));
        let lines: Vec<Line> = preview_lines(self.session.preview_html())
            .into_iter()
            .map(Line::from)
            .collect();
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((self.preview_scroll, 0)),
            area,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(prompt) = &self.prompt {
            let label = prompt.label();
            let line = Line::from(vec![
                Span::styled(label.clone(), Style::default().fg(self.theme.accent_fg)),
                Span::raw(prompt.input().to_string()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let x = area.x + (label.width() + prompt.input().width()) as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
            return;
        }

        let line = if let Some(notice) = self.session.notice() {
            Line::from(Span::styled(
                notice.to_string(),
                Style::default()
                    .fg(self.theme.error_fg)
                    .add_modifier(Modifier::BOLD),
            ))
        } else if let Some(log) = self.latest_log() {
            Line::from(Span::styled(log.to_string(), Style::default().fg(self.theme.muted_fg)))
        } else {
            Line::from(Span::styled(KEY_HINTS, Style::default().fg(self.theme.muted_fg)))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn styled_run(text: String, is_selected: bool, selected: Style) -> Span<'static> {
    if is_selected {
        Span::styled(text, selected)
    } else {
        Span::raw(text)
    }
}

fn display_width(text: &str, tab_width: usize) -> usize {
    text.chars()
        .map(|ch| {
            if ch == '\t' {
                tab_width
            } else {
                ch.width().unwrap_or(0)
            }
        })
        .sum()
}
