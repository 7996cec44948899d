//! UI-only state. Everything session-shaped lives in the global status
//! published by the core thread; the app only tracks cursors and the input
//! line.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sessions,
    Log,
    Input,
}

#[derive(Debug)]
pub struct App {
    pub focus: Focus,
    pub selected: usize,
    pub log_view_offset: usize,
    pub auto_scroll: bool,
    pub input_buffer: String,
    pub quit_requested: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            focus: Focus::Sessions,
            selected: 0,
            log_view_offset: 0,
            auto_scroll: true,
            input_buffer: String::new(),
            quit_requested: false,
        }
    }
}

impl App {
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, session_count: usize) {
        if session_count > 0 && self.selected + 1 < session_count {
            self.selected += 1;
        }
    }

    /// Clamp the cursor after a rescan shrank the session list.
    pub fn clamp_selection(&mut self, session_count: usize) {
        if session_count == 0 {
            self.selected = 0;
        } else if self.selected >= session_count {
            self.selected = session_count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_in_bounds() {
        let mut app = App::default();
        app.select_previous();
        assert_eq!(app.selected, 0);

        app.select_next(3);
        app.select_next(3);
        app.select_next(3);
        assert_eq!(app.selected, 2);

        app.clamp_selection(1);
        assert_eq!(app.selected, 0);
    }
}
