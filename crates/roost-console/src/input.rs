use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::{App, InputMode, View};
use crate::ui::notifications::Notification;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // An armed resolve confirmation captures the keyboard until answered.
    if app.view == View::Chat && app.poller.pending_resolve() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_resolve(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_resolve(),
            _ => {}
        }
        return;
    }

    match app.view {
        View::Tickets => handle_tickets_key(app, key),
        View::Chat => handle_chat_key(app, key),
    }
}

fn handle_tickets_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Tab => app.cycle_filter(),
        KeyCode::Char('r') => {
            app.refresh_tickets();
            app.notify(Notification::info("Refreshing ticket lists"));
        }
        KeyCode::Enter => app.open_selected_ticket(),
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    // Resolve works from either mode.
    if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.request_resolve();
        return;
    }

    match app.input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.close_chat(),
            KeyCode::Char('e') | KeyCode::Char('i') => app.input_mode = InputMode::Editing,
            KeyCode::Char('r') => app.poller.refresh_now(),
            _ => {}
        },
    }
}
