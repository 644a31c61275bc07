//! Application state: interaction modes, selection, scroll, filter, sort.

use crate::model::{ProcessSample, Snapshot};
use crate::rank::{SortBy, sort_samples};

/// Maximum length of the name filter, in characters.
pub const FILTER_MAX: usize = 49;

/// Interaction mode. Each variant carries exactly the data it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Periodic refresh, navigation, sort and kill shortcuts.
    Normal,
    /// Incremental name search. Input blocks indefinitely; refresh is
    /// suspended to avoid visual jitter while typing.
    Search {
        /// The in-progress filter buffer, committed on exit.
        buffer: String,
    },
    /// Kill confirmation gate. The target is captured at entry so a
    /// concurrent refresh cannot swap the selection out from under the
    /// dialog.
    ConfirmKill { pid: u32, name: String },
}

impl Mode {
    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Mode::Search { .. })
    }
}

/// State owned by the main control loop. The sampling pipeline only ever
/// reads the filter text and sort key.
pub struct AppState {
    pub mode: Mode,
    /// Last successfully refreshed full snapshot.
    pub snapshot: Snapshot,
    /// Filtered and ranked view of `snapshot`.
    pub visible: Snapshot,
    /// Committed name filter (outside of search mode).
    pub filter_text: String,
    pub sort_by: SortBy,
    pub selected: usize,
    pub scroll_offset: usize,
    /// Rows available for the table, set by the renderer each frame.
    pub view_height: usize,
    /// One-shot request for a shortened tick, set after a confirmed kill
    /// so the list updates promptly.
    pub quick_refresh: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            snapshot: Snapshot::new(),
            visible: Snapshot::new(),
            filter_text: String::new(),
            sort_by: SortBy::default(),
            selected: 0,
            scroll_offset: 0,
            view_height: 0,
            quick_refresh: false,
        }
    }

    /// The filter the pipeline should apply right now: the live search
    /// buffer while searching, the committed text otherwise.
    pub fn effective_filter(&self) -> &str {
        match &self.mode {
            Mode::Search { buffer } => buffer,
            _ => &self.filter_text,
        }
    }

    /// Re-runs filter and rank over the stored full snapshot, then
    /// re-clamps selection and scroll. Pure over `snapshot`, so repeated
    /// application with identical inputs yields identical views.
    pub fn rebuild_visible(&mut self) {
        let mut visible = self.snapshot.filter_by_name(self.effective_filter());
        sort_samples(visible.samples_mut(), self.sort_by);
        self.visible = visible;
        self.clamp_selection();
    }

    /// Clamps the selection to `[0, count-1]` (0 when empty) and adjusts
    /// the scroll offset by the minimum needed to keep it visible.
    pub fn clamp_selection(&mut self) {
        let count = self.visible.len();
        if count == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }
        if self.selected >= count {
            self.selected = count - 1;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.view_height > 0 && self.selected >= self.scroll_offset + self.view_height {
            self.scroll_offset = self.selected + 1 - self.view_height;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.scroll_offset {
                self.scroll_offset = self.selected;
            }
        }
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
            if self.view_height > 0 && self.selected >= self.scroll_offset + self.view_height {
                self.scroll_offset += 1;
            }
        }
    }

    /// Changes the sort key and re-ranks the view right away, so the next
    /// draw already shows the new order. The previous visual position is
    /// meaningless under a new ranking, so selection and scroll reset.
    pub fn set_sort(&mut self, by: SortBy) {
        self.sort_by = by;
        self.selected = 0;
        self.scroll_offset = 0;
        self.rebuild_visible();
    }

    pub fn selected_sample(&self) -> Option<&ProcessSample> {
        self.visible.samples().get(self.selected)
    }

    /// Enters search mode, editing from the committed filter.
    pub fn enter_search(&mut self) {
        self.mode = Mode::Search {
            buffer: self.filter_text.clone(),
        };
    }

    /// Leaves search mode, committing the buffer.
    pub fn leave_search(&mut self) {
        if let Mode::Search { buffer } = std::mem::replace(&mut self.mode, Mode::Normal) {
            self.filter_text = buffer;
        }
    }

    /// Appends a printable character to the search buffer, up to the cap.
    /// A changed filter invalidates the visual position.
    pub fn push_filter_char(&mut self, c: char) {
        if let Mode::Search { buffer } = &mut self.mode
            && buffer.chars().count() < FILTER_MAX
        {
            buffer.push(c);
            self.selected = 0;
            self.scroll_offset = 0;
        }
    }

    pub fn pop_filter_char(&mut self) {
        if let Mode::Search { buffer } = &mut self.mode {
            buffer.pop();
        }
    }

    /// Arms the kill confirmation for the current selection, capturing
    /// the target identity at this instant. No-op on an empty view.
    pub fn enter_confirm_kill(&mut self) {
        if let Some(sample) = self.selected_sample() {
            self.mode = Mode::ConfirmKill {
                pid: sample.pid,
                name: sample.name.clone(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, name: &str, memory_kb: u64, cpu_percent: f32) -> ProcessSample {
        ProcessSample {
            pid,
            name: name.to_string(),
            user: "root".to_string(),
            memory_kb,
            cpu_percent,
        }
    }

    fn state_with(names: &[&str]) -> AppState {
        let mut state = AppState::new();
        let mut snap = Snapshot::new();
        for (i, name) in names.iter().enumerate() {
            snap.push(sample(i as u32 + 1, name, 0, 0.0));
        }
        state.snapshot = snap;
        state.view_height = 10;
        state.rebuild_visible();
        state
    }

    #[test]
    fn selection_clamps_when_view_shrinks() {
        let mut state = state_with(&["a", "b", "c", "d", "e"]);
        state.selected = 4;

        // New refresh with fewer entries.
        let mut snap = Snapshot::new();
        snap.push(sample(1, "a", 0, 0.0));
        snap.push(sample(2, "b", 0, 0.0));
        state.snapshot = snap;
        state.rebuild_visible();

        assert_eq!(state.selected, 1);
    }

    #[test]
    fn selection_resets_to_zero_when_view_empties() {
        let mut state = state_with(&["a", "b"]);
        state.selected = 1;
        state.snapshot = Snapshot::new();
        state.rebuild_visible();

        assert_eq!(state.selected, 0);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn scroll_follows_selection_minimally() {
        let names: Vec<String> = (0..20).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut state = state_with(&refs);
        state.view_height = 5;

        // Walk down past the window: offset advances one row at a time.
        for _ in 0..7 {
            state.select_down();
        }
        assert_eq!(state.selected, 7);
        assert_eq!(state.scroll_offset, 3);

        // Walking up inside the window leaves the offset alone.
        state.select_up();
        assert_eq!(state.scroll_offset, 3);

        // Moving above the window pulls the offset up to the selection.
        for _ in 0..5 {
            state.select_up();
        }
        assert_eq!(state.selected, 1);
        assert_eq!(state.scroll_offset, 1);
    }

    #[test]
    fn filter_plus_sort_is_idempotent() {
        let mut state = state_with(&["systemd", "bash", "sshd", "systemd-udevd"]);
        state.filter_text = "sys".to_string();
        state.sort_by = SortBy::Name;

        state.rebuild_visible();
        let first: Vec<ProcessSample> = state.visible.samples().to_vec();

        state.rebuild_visible();
        let second: Vec<ProcessSample> = state.visible.samples().to_vec();

        assert_eq!(first, second);
    }

    #[test]
    fn search_buffer_commits_on_leave() {
        let mut state = state_with(&["systemd", "bash"]);
        state.enter_search();
        state.push_filter_char('s');
        state.push_filter_char('y');
        assert_eq!(state.effective_filter(), "sy");

        state.leave_search();
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.filter_text, "sy");
    }

    #[test]
    fn search_edit_resets_position() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected = 2;
        state.scroll_offset = 1;
        state.enter_search();
        state.push_filter_char('x');

        assert_eq!(state.selected, 0);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn filter_buffer_is_capped() {
        let mut state = state_with(&["a"]);
        state.enter_search();
        for _ in 0..(FILTER_MAX + 10) {
            state.push_filter_char('x');
        }

        let Mode::Search { buffer } = &state.mode else {
            panic!("still searching");
        };
        assert_eq!(buffer.len(), FILTER_MAX);
    }

    #[test]
    fn confirm_kill_captures_target_at_entry() {
        let mut state = state_with(&["bash", "vim"]);
        state.selected = 1;
        state.enter_confirm_kill();

        assert_eq!(
            state.mode,
            Mode::ConfirmKill {
                pid: 2,
                name: "vim".to_string()
            }
        );

        // A refresh reordering the view must not change the armed target.
        let mut snap = Snapshot::new();
        snap.push(sample(9, "other", 0, 0.0));
        state.snapshot = snap;
        state.rebuild_visible();
        assert!(matches!(&state.mode, Mode::ConfirmKill { pid: 2, .. }));
    }

    #[test]
    fn confirm_kill_needs_a_selection() {
        let mut state = state_with(&[]);
        state.enter_confirm_kill();
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn sort_change_resets_position() {
        let mut state = state_with(&["a", "b", "c"]);
        state.selected = 2;
        state.scroll_offset = 2;
        state.set_sort(SortBy::Cpu);

        assert_eq!(state.sort_by, SortBy::Cpu);
        assert_eq!(state.selected, 0);
        assert_eq!(state.scroll_offset, 0);
    }
}
