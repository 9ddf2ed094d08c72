use std::ops::ControlFlow;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::presenter::Presenter;

/// Applies one terminal event to the presenter. Breaks when the window should close.
pub fn handle_event(presenter: &mut Presenter, event: Event) -> ControlFlow<()> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(presenter, key),
        Event::Paste(text) => {
            edit_query(presenter, |query| query.push_str(&text));
            ControlFlow::Continue(())
        }
        _ => ControlFlow::Continue(()),
    }
}

fn handle_key(presenter: &mut Presenter, key: KeyEvent) -> ControlFlow<()> {
    let page = presenter.page_height();
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return ControlFlow::Break(()),
        KeyCode::Char('c') if control => return ControlFlow::Break(()),
        KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
            edit_query(presenter, |query| query.push(ch));
        }
        KeyCode::Backspace => {
            if !presenter.query().is_empty() {
                edit_query(presenter, |query| {
                    query.pop();
                });
            }
        }
        KeyCode::Down => presenter.scroll_down(1),
        KeyCode::Up => presenter.scroll_up(1),
        KeyCode::PageDown => presenter.scroll_down(page),
        KeyCode::PageUp => presenter.scroll_up(page),
        KeyCode::Home => presenter.scroll_home(),
        _ => {}
    }
    ControlFlow::Continue(())
}

fn edit_query(presenter: &mut Presenter, edit: impl FnOnce(&mut String)) {
    let mut query = presenter.query().to_owned();
    edit(&mut query);
    presenter.on_query_changed(query);
}
