//! A single verse: controls column on the left, Arabic text and translations on the right
//!
//! `VerseView` is a pure function of its props plus a little UI state (the
//! last built tree, control hit areas, the copy confirmation). All data changes
//! go through the injected handlers.

mod controls;
mod props;
mod text;

pub use controls::{activate, controls, handle_play, Activation, Control, ControlKind};
pub use props::{RenderKey, VerseHandlers, VerseProps};
pub use text::{
    arabic_text, translations_to_render, word_audio_positions, word_tooltip, wrap_items,
    wrap_text_to_width, ArabicText, RenderedWord, VerseTree,
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use crate::lazy::LoadState;
use crate::messages::MessageFormatter;
use crate::widgets::VerseWidgets;

/// Width of the controls column
pub const CONTROLS_WIDTH: u16 = 16;

/// How long the copy control shows its confirmation
const COPIED_FLASH: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
pub struct VerseView {
    cached: Option<(RenderKey, VerseTree)>,
    render_count: u64,
    copied_at: Option<Instant>,
    hit_areas: Vec<(Rect, ControlKind)>,
    /// Clickable words and their audio positions; glyphs have none
    word_areas: Vec<(Rect, u32)>,
}

impl VerseView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a rebuild on the next render
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Number of times the verse tree has been rebuilt
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// The current render decision, rebuilt only when the guarded props changed
    pub fn tree(&mut self, props: &VerseProps<'_>, messages: &dyn MessageFormatter) -> &VerseTree {
        let key = RenderKey::from_props(props);
        let tree = match self.cached.take() {
            Some((prev, tree)) if !RenderKey::should_update(&prev, &key) => tree,
            _ => {
                tracing::debug!(verse_key = %props.verse.verse_key, "Render verse");
                self.render_count += 1;
                VerseTree::build(props, messages)
            }
        };

        // Always compare against the most recent props, not the last rebuilt ones
        &self.cached.insert((key, tree)).1
    }

    /// Rows this verse needs at the given total width, including the trailing blank row
    pub fn height(
        &mut self,
        width: u16,
        props: &VerseProps<'_>,
        messages: &dyn MessageFormatter,
    ) -> u16 {
        let content_width = content_width(width);
        let tree = self.tree(props, messages);
        let rows = tree.controls.len().max(content_lines(tree, content_width).len());
        rows as u16 + 1
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: &VerseProps<'_>,
        widgets: &VerseWidgets,
        messages: &dyn MessageFormatter,
    ) {
        let copied = self
            .copied_at
            .is_some_and(|at| at.elapsed() < COPIED_FLASH);

        let border_color = if props.is_focused { Color::Cyan } else { Color::DarkGray };
        let mut block = Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);

        let [controls_area, _, content_area] = Layout::horizontal([
            Constraint::Length(CONTROLS_WIDTH),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        let (control_lines, content, highlighted, word_areas) = {
            let tree = self.tree(props, messages);
            let control_lines: Vec<(ControlKind, Line<'static>)> = tree
                .controls
                .iter()
                .map(|control| (control.kind(), control_line(control, widgets, copied)))
                .collect();
            // Search results are read-only
            let word_areas = if props.is_searched {
                Vec::new()
            } else {
                word_hit_areas(tree, content_area)
            };
            (
                control_lines,
                content_lines(tree, content_area.width),
                tree.highlighted,
                word_areas,
            )
        };
        self.word_areas = word_areas;

        if highlighted {
            block = block.style(Style::default().bg(Color::DarkGray));
        }
        frame.render_widget(block, area);

        self.hit_areas.clear();
        for (row, (kind, line)) in control_lines.into_iter().enumerate() {
            let row = row as u16;
            if row >= controls_area.height {
                break;
            }
            let line_area = Rect::new(controls_area.x, controls_area.y + row, controls_area.width, 1);
            frame.render_widget(Paragraph::new(line), line_area);
            self.hit_areas.push((line_area, kind));
        }

        frame.render_widget(Paragraph::new(content), content_area);
    }

    /// Keyboard activation of a control. Only the focused verse reacts.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        props: &VerseProps<'_>,
        handlers: &VerseHandlers<'_>,
        widgets: &VerseWidgets,
    ) -> Option<Activation> {
        if !props.is_focused || key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        let kind = ControlKind::from_key(c)?;
        self.activate(kind, props, handlers, widgets)
    }

    /// Mouse activation of a control or a word, using the areas from the last render
    pub fn handle_click(
        &mut self,
        column: u16,
        row: u16,
        props: &VerseProps<'_>,
        handlers: &VerseHandlers<'_>,
        widgets: &VerseWidgets,
    ) -> Option<Activation> {
        let control = self
            .hit_areas
            .iter()
            .find(|(area, _)| point_in_rect(column, row, *area))
            .map(|(_, kind)| *kind);
        if let Some(kind) = control {
            return self.activate(kind, props, handlers, widgets);
        }

        let position = self
            .word_areas
            .iter()
            .find(|(area, _)| point_in_rect(column, row, *area))
            .map(|(_, position)| *position)?;
        tracing::debug!(verse_key = %props.verse.verse_key, position, "Word clicked");
        handlers.audio.set_current_word(&props.verse.verse_key, position);
        Some(Activation::SeekWord(position))
    }

    pub fn activate(
        &mut self,
        kind: ControlKind,
        props: &VerseProps<'_>,
        handlers: &VerseHandlers<'_>,
        widgets: &VerseWidgets,
    ) -> Option<Activation> {
        let activation = activate(kind, props, handlers, widgets)?;
        if matches!(activation, Activation::Copied { .. }) {
            self.copied_at = Some(Instant::now());
        }
        Some(activation)
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn content_width(total: u16) -> u16 {
    // Left border, controls column, gap
    total.saturating_sub(CONTROLS_WIDTH + 2)
}

fn lazy_line<T>(state: LoadState<T>, icon: &str, label: &str) -> Line<'static> {
    match state {
        LoadState::Pending => Line::styled(format!("… {}", label), Style::default().fg(Color::DarkGray)),
        LoadState::Ready(_) => Line::raw(format!("{} {}", icon, label)),
        LoadState::Failed(_) => Line::styled(
            format!("✗ {}", label),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
        ),
    }
}

fn control_line(control: &Control, widgets: &VerseWidgets, copied: bool) -> Line<'static> {
    match control {
        Control::Badge { verse_key, .. } => Line::from(Span::styled(
            format!(" {} ", verse_key),
            Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
        )),
        Control::Play { playing, label } => {
            let icon = if *playing { "‖" } else { "▶" };
            Line::raw(format!("{} {}", icon, label))
        }
        Control::Copy { label, copied_label } => {
            let state = widgets.copy.state();
            if copied && state.is_ready() {
                Line::styled(format!("✓ {}", copied_label), Style::default().fg(Color::Green))
            } else {
                lazy_line(state, "⧉", label)
            }
        }
        Control::Tafsir { label } => Line::raw(format!("≡ {}", label)),
        Control::Bookmark { bookmarked, label } => {
            if *bookmarked {
                Line::styled(format!("★ {}", label), Style::default().fg(Color::Yellow).bold())
            } else {
                Line::raw(format!("☆ {}", label))
            }
        }
        Control::Share { label } => lazy_line(widgets.share.state(), "↗", label),
    }
}

fn content_lines(tree: &VerseTree, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines = Vec::new();

    match &tree.arabic {
        ArabicText::Words(words) => {
            let spans: Vec<Span<'static>> = words.iter().map(word_span).collect();
            let widths: Vec<usize> = spans.iter().map(Span::width).collect();
            for range in wrap_items(&widths, width) {
                let mut line_spans = Vec::with_capacity(range.len() * 2);
                for (i, span) in spans[range].iter().enumerate() {
                    if i > 0 {
                        line_spans.push(Span::raw(" "));
                    }
                    line_spans.push(span.clone());
                }
                lines.push(Line::from(line_spans).alignment(Alignment::Right));
            }
        }
        ArabicText::Plain(text) => {
            for line in wrap_text_to_width(text, width) {
                lines.push(Line::raw(line).alignment(Alignment::Right));
            }
        }
    }

    if let Some(tooltip) = &tree.tooltip {
        lines.push(
            Line::styled(format!("‹{}›", tooltip), Style::default().fg(Color::Cyan).italic())
                .alignment(Alignment::Right),
        );
    }

    for translation in &tree.translations {
        lines.push(Line::default());
        for line in wrap_text_to_width(&translation.text, width) {
            lines.push(Line::raw(line));
        }
        if let Some(name) = &translation.resource_name {
            lines.push(Line::styled(
                format!("- {}", name),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    lines
}

/// Screen areas of the audio-eligible words, laid out exactly as `content_lines`
/// places them: wrapped with `wrap_items`, right-aligned, one space apart.
fn word_hit_areas(tree: &VerseTree, area: Rect) -> Vec<(Rect, u32)> {
    let ArabicText::Words(words) = &tree.arabic else {
        return Vec::new();
    };
    let widths: Vec<usize> = words.iter().map(|word| word_span(word).width()).collect();

    let mut hits = Vec::new();
    for (row, range) in wrap_items(&widths, area.width as usize).into_iter().enumerate() {
        let row = row as u16;
        if row >= area.height {
            break;
        }
        let line_width = widths[range.clone()].iter().sum::<usize>() + range.len().saturating_sub(1);
        let right = area.x as usize + area.width as usize;
        let mut x = area.x as usize + (area.width as usize).saturating_sub(line_width);
        for i in range {
            if x >= right {
                break;
            }
            if let Some(position) = words[i].audio_position {
                let width = widths[i].min(right - x);
                hits.push((Rect::new(x as u16, area.y + row, width as u16, 1), position));
            }
            x += widths[i] + 1;
        }
    }
    hits
}

fn word_span(word: &RenderedWord) -> Span<'static> {
    let style = if word.highlighted {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else if word.audio_position.is_none() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    Span::styled(word.text.clone(), style)
}
