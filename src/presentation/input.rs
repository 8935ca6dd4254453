use std::time::Instant;

use crate::application::{App, AppMode};
use crate::domain::Field;
use crate::presentation::ui::dropdown_area;
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers, now: Instant) {
        if modifiers.contains(KeyModifiers::CONTROL) && matches!(key, KeyCode::Char('c') | KeyCode::Char('q')) {
            app.should_quit = true;
            return;
        }

        if app.is_submitted() {
            Self::handle_submitted(app, key);
            return;
        }

        match app.mode {
            AppMode::Form => Self::handle_form_mode(app, key, modifiers, now),
            AppMode::BankDropdown | AppMode::CountryDropdown => Self::handle_dropdown_mode(app, key, now),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    /// Mouse presses only matter while a dropdown is open on `screen`.
    ///
    /// A press on an option selects it, a press outside the list dismisses it
    /// and a press on the list border does nothing.
    pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, screen: Rect, now: Instant) {
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return;
        }
        let len = app.dropdown_len();
        if len == 0 {
            return;
        }

        let area = dropdown_area(screen, len);
        if !area.contains(Position::new(mouse.column, mouse.row)) {
            app.close_dropdown();
            return;
        }

        let inner_top = area.y + 1;
        let inner_bottom = area.bottom().saturating_sub(1);
        let on_border = mouse.row < inner_top
            || mouse.row >= inner_bottom
            || mouse.column == area.x
            || mouse.column + 1 >= area.right();
        if on_border {
            return;
        }

        let index = usize::from(mouse.row - inner_top);
        if index < len {
            app.dropdown_index = index;
            app.confirm_dropdown(now);
        }
    }

    pub fn handle_paste(app: &mut App, text: &str, now: Instant) {
        if matches!(app.mode, AppMode::Form) && !app.is_submitted() {
            app.paste(text, now);
        }
    }

    fn handle_form_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers, now: Instant) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('u') => app.clear_focused(now),
                KeyCode::Char('n') => app.next(now),
                KeyCode::Char('b') => app.back(now),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Enter => {
                if !app.open_dropdown() {
                    app.next(now);
                }
            }
            KeyCode::Char(' ') if matches!(app.focus, Field::Bank | Field::CountryCode) => {
                app.open_dropdown();
            }
            KeyCode::Esc => app.back(now),
            KeyCode::Backspace => app.backspace(now),
            KeyCode::F(1) => app.toggle_help(),
            KeyCode::Char(c) => app.type_char(c, now),
            _ => {}
        }
    }

    fn handle_dropdown_mode(app: &mut App, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.dropdown_down(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.dropdown_up(),
            KeyCode::Enter | KeyCode::Char(' ') => app.confirm_dropdown(now),
            KeyCode::Esc => app.close_dropdown(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
            app.toggle_help();
        }
    }

    fn handle_submitted(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('n') => app.start_new_recipient(),
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            _ => {}
        }
    }
}
