use std::path::Path;

use crossterm::event::KeyCode;

use crate::controller::{SelectionKey, ViewStateController};
use crate::map::{self, MapRenderer, Marker};
use crate::stats::MetricKind;

/// Rows moved by one page key in the country table
const TABLE_PAGE: usize = 10;

/// Application state
pub struct App {
    pub dashboard: ViewStateController,
    pub map_renderer: MapRenderer,
    /// Highlighted entry in the country selector
    selector_index: usize,
    /// First visible row of the country table
    table_offset: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(dashboard: ViewStateController) -> Self {
        Self {
            dashboard,
            map_renderer: MapRenderer::new(),
            selector_index: 0,
            table_offset: 0,
            should_quit: false,
        }
    }

    pub fn load_basemap(&mut self, data_dir: &Path) {
        map::load_basemap(&mut self.map_renderer, data_dir);
    }

    /// Apply one key press. Layer toggles are the only keys not tied to the
    /// dashboard state.
    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),

            KeyCode::Up | KeyCode::Char('k') => self.move_selector(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selector(1),
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.selector_index = 0;
                self.dashboard.select_country(SelectionKey::Worldwide);
            }

            KeyCode::Char('1') | KeyCode::Char('c') => self.dashboard.set_metric(MetricKind::Cases),
            KeyCode::Char('2') | KeyCode::Char('r') => self.dashboard.set_metric(MetricKind::Recovered),
            KeyCode::Char('3') | KeyCode::Char('d') => self.dashboard.set_metric(MetricKind::Deaths),
            KeyCode::Tab => self.dashboard.set_metric(self.dashboard.metric().next()),

            KeyCode::PageUp => self.scroll_table(-(TABLE_PAGE as isize)),
            KeyCode::PageDown => self.scroll_table(TABLE_PAGE as isize),

            KeyCode::Char('b') | KeyCode::Char('B') => self.map_renderer.toggle_borders(),
            KeyCode::Char('m') | KeyCode::Char('M') => self.map_renderer.toggle_markers(),
            KeyCode::Char('L') => self.map_renderer.toggle_labels(),

            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Highlighted selector row, kept in range of the current roster
    pub fn selector_index(&self) -> usize {
        self.selector_index
            .min(self.dashboard.selector_options().len().saturating_sub(1))
    }

    pub fn table_offset(&self) -> usize {
        self.table_offset
            .min(self.dashboard.table().len().saturating_sub(1))
    }

    fn move_selector(&mut self, delta: isize) {
        let len = self.dashboard.selector_options().len();
        if len == 0 {
            return;
        }
        self.selector_index = self.selector_index().saturating_add_signed(delta).min(len - 1);
    }

    fn select_highlighted(&mut self) {
        let key = self
            .dashboard
            .selector_options()
            .get(self.selector_index())
            .map(|option| option.key.clone());
        if let Some(key) = key {
            self.dashboard.select_country(key);
        }
    }

    fn scroll_table(&mut self, delta: isize) {
        let last = self.dashboard.table().len().saturating_sub(1);
        self.table_offset = self.table_offset().saturating_add_signed(delta).min(last);
    }

    /// Map markers for the current roster, metric and selection
    pub fn markers(&self) -> Vec<Marker> {
        map::country_markers(
            self.dashboard.roster().records(),
            self.dashboard.metric(),
            self.dashboard.selection(),
        )
    }
}
