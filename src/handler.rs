use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use verse_view::{Activation, VerseHandlers};

use crate::app::App;
use crate::tui::ReaderEvent;

pub fn handle_event(app: &mut App, event: ReaderEvent) -> Result<()> {
    match event {
        ReaderEvent::Key(key) => handle_key(app, key),
        ReaderEvent::Mouse(mouse) => handle_mouse(app, mouse),
        ReaderEvent::Resize(_, _) => {}
        ReaderEvent::Tick => app.tick(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state.should_quit = true;
        return;
    }

    if app.state.tafsir_picker.is_some() {
        handle_picker_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.state.should_quit = true,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.state.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => app.state.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.state.select_last(),

        KeyCode::Esc => app.state.status = None,

        // Everything else belongs to the focused verse's controls
        _ => {
            if app.state.verses.is_empty() {
                return;
            }
            let idx = app.state.selected;
            let activation = {
                let props = app.state.props(idx);
                let handlers = VerseHandlers {
                    audio: &app.dispatcher,
                    bookmarks: &app.dispatcher,
                    tafsirs: &app.dispatcher,
                    messages: &app.messages,
                };
                app.views[idx].handle_key(&key, &props, &handlers, &app.widgets)
            };
            if let Some(activation) = activation {
                on_activation(app, activation);
            }
        }
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.state.picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.state.picker_nav_up(),
        KeyCode::Enter => app.state.picker_confirm(),
        KeyCode::Esc | KeyCode::Char('q') => app.state.picker_cancel(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::ScrollDown if app.state.tafsir_picker.is_some() => app.state.picker_nav_down(),
        MouseEventKind::ScrollUp if app.state.tafsir_picker.is_some() => app.state.picker_nav_up(),
        MouseEventKind::ScrollDown => app.state.select_next(),
        MouseEventKind::ScrollUp => app.state.select_prev(),
        MouseEventKind::Down(MouseButton::Left) if app.state.tafsir_picker.is_none() => {
            let Some(idx) = app
                .verse_areas
                .iter()
                .find(|(_, area)| point_in_rect(x, y, *area))
                .map(|(idx, _)| *idx)
            else {
                return;
            };

            app.state.selected = idx;
            let activation = {
                let props = app.state.props(idx);
                let handlers = VerseHandlers {
                    audio: &app.dispatcher,
                    bookmarks: &app.dispatcher,
                    tafsirs: &app.dispatcher,
                    messages: &app.messages,
                };
                app.views[idx].handle_click(x, y, &props, &handlers, &app.widgets)
            };
            if let Some(activation) = activation {
                on_activation(app, activation);
            }
        }
        _ => {}
    }
}

fn on_activation(app: &mut App, activation: Activation) {
    app.state.on_activation(activation);
    // Collaborator calls made during activation take effect before the next frame
    app.drain_actions();
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
