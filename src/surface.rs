use crate::catalog::{LESSON_SLOTS, WEEKDAYS};
use crate::ratings::MAX_RATING;

pub type Rgb = (u8, u8, u8);

/// Handle for one rendered entry, valid until the next `clear_entries`.
pub type EntryId = usize;

/// Grid position of a rendered entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub lesson: usize,
    pub day: usize,
}

/// What the controller wants shown for one session.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EntryVisual {
    pub group: String,
    pub teacher: String,
    pub parity_note: Option<&'static str>,
    pub color: Rgb,
}

/// Rendering side of the annotator. The controller drives page renders and
/// repaints through this; the terminal UI (or a test mock) supplies it.
pub trait Surface {
    fn set_header(&mut self, subject: &str, kind: &str);
    /// Drop every rendered entry; previously issued ids become invalid.
    fn clear_entries(&mut self);
    fn add_entry(&mut self, cell: Cell, visual: EntryVisual) -> EntryId;
    fn repaint(&mut self, id: EntryId, color: Rgb);
    fn set_slider(&mut self, value: u8);
}

/// Linear green-to-red mix, the terminal analogue of
/// `color-mix(in srgb, green, red rating*10%)`.
pub fn badness_color(rating: u8) -> Rgb {
    let t = f32::from(rating.min(MAX_RATING)) / f32::from(MAX_RATING);
    let r = (255.0 * t).round() as u8;
    let g = (128.0 * (1.0 - t)).round() as u8;
    (r, g, 0)
}

/// One entry as held by the terminal surface.
#[derive(Clone, Debug)]
pub struct RenderedEntry {
    pub id: EntryId,
    pub group: String,
    pub teacher: String,
    pub parity_note: Option<&'static str>,
    pub color: Rgb,
}

/// Retained 6x5 scene the TUI draws every frame. Entries accumulate per
/// cell (several sessions can share a slot) and are released wholesale on
/// page switch.
pub struct TermSurface {
    grid: Vec<Vec<Vec<RenderedEntry>>>,
    positions: Vec<Cell>,
    pub subject: String,
    pub kind: String,
    pub slider: u8,
}

impl TermSurface {
    pub fn new() -> Self {
        let grid = (0..LESSON_SLOTS)
            .map(|_| (0..WEEKDAYS).map(|_| Vec::new()).collect())
            .collect();
        TermSurface {
            grid,
            positions: Vec::new(),
            subject: String::new(),
            kind: String::new(),
            slider: 0,
        }
    }

    pub fn cell(&self, lesson: usize, day: usize) -> &[RenderedEntry] {
        &self.grid[lesson][day]
    }

    pub fn entry_count(&self) -> usize {
        self.positions.len()
    }

    pub fn entry(&self, id: EntryId) -> &RenderedEntry {
        let cell = self.positions[id];
        self.grid[cell.lesson][cell.day]
            .iter()
            .find(|entry| entry.id == id)
            .expect("entry id tracked in positions")
    }
}

impl Default for TermSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TermSurface {
    fn set_header(&mut self, subject: &str, kind: &str) {
        self.subject = subject.to_string();
        self.kind = kind.to_string();
    }

    fn clear_entries(&mut self) {
        for row in &mut self.grid {
            for cell in row {
                cell.clear();
            }
        }
        self.positions.clear();
    }

    fn add_entry(&mut self, cell: Cell, visual: EntryVisual) -> EntryId {
        let id = self.positions.len();
        self.positions.push(cell);
        self.grid[cell.lesson][cell.day].push(RenderedEntry {
            id,
            group: visual.group,
            teacher: visual.teacher,
            parity_note: visual.parity_note,
            color: visual.color,
        });
        id
    }

    fn repaint(&mut self, id: EntryId, color: Rgb) {
        let cell = self.positions[id];
        for entry in &mut self.grid[cell.lesson][cell.day] {
            if entry.id == id {
                entry.color = color;
            }
        }
    }

    fn set_slider(&mut self, value: u8) {
        self.slider = value.min(MAX_RATING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_endpoints_match_css_green_and_red() {
        assert_eq!(badness_color(0), (0, 128, 0));
        assert_eq!(badness_color(10), (255, 0, 0));
    }

    #[test]
    fn color_midpoint_is_half_mixed() {
        let (r, g, b) = badness_color(5);
        assert_eq!((r, g, b), (128, 64, 0));
        assert_eq!(b, 0);
    }

    #[test]
    fn entries_stack_in_a_shared_cell() {
        let mut surface = TermSurface::new();
        let cell = Cell { lesson: 2, day: 1 };
        let visual = EntryVisual {
            group: "1".into(),
            teacher: "T".into(),
            parity_note: None,
            color: badness_color(0),
        };
        let a = surface.add_entry(cell, visual.clone());
        let b = surface.add_entry(cell, visual);
        assert_ne!(a, b);
        assert_eq!(surface.cell(2, 1).len(), 2);

        surface.repaint(b, (9, 9, 9));
        assert_eq!(surface.entry(a).color, badness_color(0));
        assert_eq!(surface.entry(b).color, (9, 9, 9));

        surface.clear_entries();
        assert_eq!(surface.entry_count(), 0);
        assert!(surface.cell(2, 1).is_empty());
    }
}
