use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_verses(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.state.tafsir_picker.is_some() {
        render_tafsir_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let chapter = &app.state.chapter;
    let mut spans = vec![
        Span::styled(
            format!(" {}. {} ", chapter.id, chapter.name_simple),
            Style::default().fg(Color::Cyan).bold(),
        ),
    ];
    if let Some(name_arabic) = &chapter.name_arabic {
        spans.push(Span::styled(format!("{} ", name_arabic), Style::default().fg(Color::White)));
    }
    spans.push(Span::styled(
        format!("[{} verses]", app.state.verses.len()),
        Style::default().fg(Color::Gray),
    ));
    if app.state.is_searched {
        spans.push(Span::styled(" search", Style::default().fg(Color::Yellow)));
    }
    if app.state.is_pdf {
        spans.push(Span::styled(" pdf", Style::default().fg(Color::Yellow)));
    }
    if let Some(key) = &app.state.playback.current_verse {
        let icon = if app.state.playback.is_playing { "▶" } else { "‖" };
        spans.push(Span::styled(format!("  {} {}", icon, key), Style::default().fg(Color::Green)));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_verses(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.verse_areas.clear();
    if app.state.verses.is_empty() {
        let empty = Paragraph::new("No verses to show").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let heights: Vec<u16> = (0..app.state.verses.len())
        .map(|idx| {
            let props = app.state.props(idx);
            app.views[idx].height(inner.width, &props, &app.messages)
        })
        .collect();

    // Keep the selected verse on screen
    let selected = app.state.selected;
    if selected < app.state.first_visible {
        app.state.first_visible = selected;
    }
    while app.state.first_visible < selected
        && heights[app.state.first_visible..=selected]
            .iter()
            .map(|h| *h as u32)
            .sum::<u32>()
            > inner.height as u32
    {
        app.state.first_visible += 1;
    }

    let bottom = inner.y + inner.height;
    let mut y = inner.y;
    for idx in app.state.first_visible..app.state.verses.len() {
        if y >= bottom {
            break;
        }
        // Last row of each verse is the gap before the next one
        let rows = heights[idx].saturating_sub(1).min(bottom - y);
        let verse_area = Rect::new(inner.x, y, inner.width, rows);

        let props = app.state.props(idx);
        app.views[idx].render(frame, verse_area, &props, &app.widgets, &app.messages);
        app.verse_areas.push((idx, verse_area));

        y = y.saturating_add(heights[idx]);
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = if app.state.tafsir_picker.is_some() {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" verse ", label_style),
            Span::styled(" p ", key_style),
            Span::styled(" play ", label_style),
            Span::styled(" y ", key_style),
            Span::styled(" copy ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" tafsir ", label_style),
            Span::styled(" b ", key_style),
            Span::styled(" bookmark ", label_style),
            Span::styled(" s ", key_style),
            Span::styled(" share ", label_style),
            Span::styled(" l ", key_style),
            Span::styled(" link ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    if let Some(status) = &app.state.status {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tafsir_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(picker) = app.state.tafsir_picker.as_mut() else {
        return;
    };

    // Calculate popup size and position (centered)
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = (app.state.tafsirs.len().max(1) as u16 + 2).min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ({}) ", picker.prompt, picker.verse_key));

    if app.state.tafsirs.is_empty() {
        let empty = Paragraph::new(" No tafsirs available ")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, popup_area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .tafsirs
        .iter()
        .map(|tafsir| ListItem::new(format!(" {} ", tafsir.name)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut picker.state);
}
