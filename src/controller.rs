use indexmap::IndexMap;

use crate::catalog::{Catalog, Page};
use crate::ratings::RatingStore;
use crate::surface::{badness_color, Cell, EntryId, EntryVisual, Surface};

/// Owns the domain state of the annotator: the catalog, the derived page
/// list, the rating store and the per-render bookkeeping. All mutation goes
/// through `select_page`, `activate` and `slider_input`.
pub struct Controller {
    catalog: Catalog,
    pages: Vec<Page>,
    ratings: RatingStore,
    current: Option<usize>,
    active_group: Option<String>,
    /// id -> group name for the current render, in creation order.
    entry_groups: Vec<String>,
    /// group -> rendered entries for the current render, for batch repaint.
    by_group: IndexMap<String, Vec<EntryId>>,
}

impl Controller {
    pub fn new(catalog: Catalog) -> Self {
        let pages = catalog.pages();
        let ratings = RatingStore::init(&catalog);
        Controller {
            catalog,
            pages,
            ratings,
            current: None,
            active_group: None,
            entry_groups: Vec::new(),
            by_group: IndexMap::new(),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current.map(|idx| &self.pages[idx])
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    /// Stored rating of the active group, if any.
    pub fn active_rating(&self) -> Option<u8> {
        let group = self.active_group.as_deref()?;
        let page = self.current_page()?;
        Some(self.ratings.get(&page.subject, &page.kind, group))
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    /// Renders page `idx` from scratch: drops the active selection and the
    /// previous render, then inserts one entry per session of every group
    /// on the page, colored by the group's current rating. Re-selecting the
    /// same page rebuilds the identical render.
    pub fn select_page<S: Surface>(&mut self, idx: usize, surface: &mut S) {
        self.active_group = None;
        self.by_group.clear();
        self.entry_groups.clear();
        surface.clear_entries();

        self.current = Some(idx);
        let page = self.pages[idx].clone();
        surface.set_header(&page.subject, &page.kind);

        for (group, sessions) in self.catalog.groups(&page) {
            let rating = self.ratings.get(&page.subject, &page.kind, group);
            let color = badness_color(rating);
            for session in sessions {
                let id = surface.add_entry(
                    Cell {
                        lesson: session.lesson,
                        day: session.day.index(),
                    },
                    EntryVisual {
                        group: group.clone(),
                        teacher: session.teacher.clone(),
                        parity_note: session.parity.note(),
                        color,
                    },
                );
                self.entry_groups.push(group.clone());
                self.by_group.entry(group.clone()).or_default().push(id);
            }
        }
    }

    /// Click on a rendered entry: its group becomes active and the slider
    /// seeks to that group's stored rating. Ratings are not touched.
    pub fn activate<S: Surface>(&mut self, id: EntryId, surface: &mut S) {
        let group = self.entry_groups[id].clone();
        self.active_group = Some(group);
        if let Some(rating) = self.active_rating() {
            surface.set_slider(rating);
        }
    }

    /// Slider moved. Without an active group this is a no-op; otherwise the
    /// new value is stored and every rendered entry of that group is
    /// repainted, without rebuilding the page.
    pub fn slider_input<S: Surface>(&mut self, value: u8, surface: &mut S) {
        let Some(group) = self.active_group.clone() else {
            return;
        };
        let Some(page) = self.current_page().cloned() else {
            return;
        };
        self.ratings.set(&page.subject, &page.kind, &group, value);
        let stored = self.ratings.get(&page.subject, &page.kind, &group);
        let color = badness_color(stored);
        if let Some(ids) = self.by_group.get(&group) {
            for &id in ids {
                surface.repaint(id, color);
            }
        }
        surface.set_slider(stored);
    }

    /// The whole rating store as JSON, the `data.json` payload.
    pub fn export_json(&self) -> anyhow::Result<String> {
        Ok(self.ratings.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgb;

    /// Records every surface call so tests can assert on the render.
    #[derive(Default)]
    struct RecordingSurface {
        header: (String, String),
        entries: Vec<(Cell, EntryVisual)>,
        slider: u8,
        clears: usize,
        repaints: Vec<(EntryId, Rgb)>,
    }

    impl Surface for RecordingSurface {
        fn set_header(&mut self, subject: &str, kind: &str) {
            self.header = (subject.to_string(), kind.to_string());
        }

        fn clear_entries(&mut self) {
            self.entries.clear();
            self.clears += 1;
        }

        fn add_entry(&mut self, cell: Cell, visual: EntryVisual) -> EntryId {
            self.entries.push((cell, visual));
            self.entries.len() - 1
        }

        fn repaint(&mut self, id: EntryId, color: Rgb) {
            self.entries[id].1.color = color;
            self.repaints.push((id, color));
        }

        fn set_slider(&mut self, value: u8) {
            self.slider = value;
        }
    }

    fn catalog() -> Catalog {
        serde_json::from_str(
            r#"{
                "Analiza": {
                    "WYK": {"1": [
                        {"day": "poniedziałek", "lesson": 0, "teacher": "Kowalski"},
                        {"day": "czwartek", "lesson": 3, "teacher": "Kowalski"}
                    ]},
                    "CW": {
                        "1": [{"day": "wtorek", "lesson": 1, "teacher": "Nowak", "parity": "odd"}],
                        "2": [{"day": "wtorek", "lesson": 1, "teacher": "Nowak", "parity": "even"}]
                    }
                },
                "Pusty": {"SEM": {}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn reselecting_a_page_rebuilds_the_same_render() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(0, &mut surface);
        let first = surface.entries.clone();
        controller.select_page(0, &mut surface);

        assert_eq!(surface.entries, first);
        assert_eq!(surface.entries.len(), 2);
        assert_eq!(surface.clears, 2);
    }

    #[test]
    fn page_switch_drops_previous_entries_first() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(0, &mut surface);
        assert_eq!(surface.entries.len(), 2);

        controller.select_page(1, &mut surface);
        assert_eq!(surface.header, ("Analiza".to_string(), "CW".to_string()));
        assert_eq!(surface.entries.len(), 2);
        assert_eq!(surface.entries[0].1.parity_note, Some("(nieparzyste)"));
        assert_eq!(surface.entries[1].1.parity_note, Some("(parzyste)"));
        assert!(controller.active_group().is_none());
    }

    #[test]
    fn empty_page_renders_header_only() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(2, &mut surface);
        assert_eq!(surface.header, ("Pusty".to_string(), "SEM".to_string()));
        assert!(surface.entries.is_empty());
    }

    #[test]
    fn activating_any_entry_of_a_group_seeks_the_slider() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(0, &mut surface);
        controller.activate(0, &mut surface);
        controller.slider_input(7, &mut surface);

        // Both rendered copies of group 1 belong to the same rating entry.
        controller.activate(1, &mut surface);
        assert_eq!(controller.active_group(), Some("1"));
        assert_eq!(surface.slider, 7);
    }

    #[test]
    fn slider_updates_store_and_repaints_only_the_active_group() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(1, &mut surface);
        // Entry 0 is group "1", entry 1 is group "2".
        controller.activate(0, &mut surface);
        controller.slider_input(10, &mut surface);

        assert_eq!(controller.ratings().get("Analiza", "CW", "1"), 10);
        assert_eq!(controller.ratings().get("Analiza", "CW", "2"), 0);
        assert_eq!(surface.repaints, vec![(0, badness_color(10))]);
        assert_eq!(surface.entries[1].1.color, badness_color(0));
    }

    #[test]
    fn slider_without_active_group_is_a_no_op() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(0, &mut surface);
        controller.slider_input(9, &mut surface);

        assert!(surface.repaints.is_empty());
        assert_eq!(controller.ratings().get("Analiza", "WYK", "1"), 0);
    }

    #[test]
    fn activation_does_not_touch_stored_ratings() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(1, &mut surface);
        controller.activate(0, &mut surface);
        controller.slider_input(4, &mut surface);
        controller.activate(1, &mut surface);

        assert_eq!(surface.slider, 0);
        assert_eq!(controller.ratings().get("Analiza", "CW", "1"), 4);
    }

    #[test]
    fn fresh_rating_persists_across_page_switches() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(1, &mut surface);
        controller.activate(1, &mut surface);
        controller.slider_input(6, &mut surface);

        controller.select_page(0, &mut surface);
        controller.select_page(1, &mut surface);
        assert_eq!(surface.entries[1].1.color, badness_color(6));
    }

    #[test]
    fn export_round_trips_to_the_in_memory_store() {
        let mut controller = Controller::new(catalog());
        let mut surface = RecordingSurface::default();

        controller.select_page(0, &mut surface);
        controller.activate(0, &mut surface);
        controller.slider_input(5, &mut surface);

        let json = controller.export_json().unwrap();
        let parsed: RatingStore = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, controller.ratings());
        assert_eq!(parsed.get("Analiza", "WYK", "1"), 5);
    }
}
