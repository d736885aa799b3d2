use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::app::{AppMode, BoardApp};

pub fn handle_event(app: &mut BoardApp, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) if app.mode == AppMode::Board => handle_mouse(app, mouse),
        _ => {}
    }
}

fn handle_key(app: &mut BoardApp, key: KeyEvent) {
    match app.mode {
        AppMode::Board => handle_board_key(app, key),
        AppMode::Search => handle_search_key(app, key),
    }
}

fn handle_board_key(app: &mut BoardApp, key: KeyEvent) {
    app.status = None;
    match (key.code, key.modifiers) {
        (KeyCode::Esc | KeyCode::Char('q'), _) => {
            app.should_quit = true;
        }
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyCode::Char('/') | KeyCode::Char('a'), _) => app.open_search(),
        (KeyCode::Left, KeyModifiers::SHIFT) | (KeyCode::Char('<'), _) => app.resize_window(-0.5),
        (KeyCode::Right, KeyModifiers::SHIFT) | (KeyCode::Char('>'), _) => app.resize_window(0.5),
        (KeyCode::Left | KeyCode::Char('h'), _) => app.shift_window(-0.5),
        (KeyCode::Right | KeyCode::Char('l'), _) => app.shift_window(0.5),
        (KeyCode::Up | KeyCode::Char('k'), _) => app.select_up(),
        (KeyCode::Down | KeyCode::Char('j'), _) => app.select_down(),
        (KeyCode::Char('K'), _) => app.move_row_up(),
        (KeyCode::Char('J'), _) => app.move_row_down(),
        (KeyCode::Char('d') | KeyCode::Delete, _) => app.remove_selected(),
        (KeyCode::Char('f'), _) => app.toggle_format(),
        (KeyCode::Char('t'), _) => app.cycle_theme(),
        (KeyCode::Char('['), _) => app.shift_date(-1),
        (KeyCode::Char(']'), _) => app.shift_date(1),
        (KeyCode::Char('.'), _) => app.select_today(),
        _ => {}
    }
}

fn handle_search_key(app: &mut BoardApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_search(),
        KeyCode::Enter => app.popup_select(),
        KeyCode::Up => app.popup_up(),
        KeyCode::Down => app.popup_down(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut BoardApp, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(mouse.column),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(),
        _ => {}
    }
}
