use std::path::Path;

use anyhow::{bail, Context};
use indexmap::IndexMap;
use serde::Deserialize;

/// Hour slots per day. Slot `i` covers 8+2i:00 to 10+2i:00.
pub const LESSON_SLOTS: usize = 6;
pub const WEEKDAYS: usize = 5;

/// Weekday as it appears in the downloaded timetable data.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub enum Day {
    #[serde(rename = "poniedziałek")]
    Monday,
    #[serde(rename = "wtorek")]
    Tuesday,
    #[serde(rename = "środa")]
    Wednesday,
    #[serde(rename = "czwartek")]
    Thursday,
    #[serde(rename = "piątek")]
    Friday,
}

impl Day {
    pub fn index(self) -> usize {
        match self {
            Day::Monday => 0,
            Day::Tuesday => 1,
            Day::Wednesday => 2,
            Day::Thursday => 3,
            Day::Friday => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "poniedziałek",
            Day::Tuesday => "wtorek",
            Day::Wednesday => "środa",
            Day::Thursday => "czwartek",
            Day::Friday => "piątek",
        }
    }

    pub const ALL: [Day; WEEKDAYS] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

/// Biweekly parity of a session. `All` means the class meets every week;
/// the downloader also omits the field for such sessions.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    All,
    Odd,
    Even,
}

impl Parity {
    /// Annotation shown next to a biweekly session. The USOS timetable
    /// calls odd weeks "nieparzyste" and even weeks "parzyste".
    pub fn note(self) -> Option<&'static str> {
        match self {
            Parity::All => None,
            Parity::Odd => Some("(nieparzyste)"),
            Parity::Even => Some("(parzyste)"),
        }
    }
}

/// One scheduled occurrence of a group's class.
#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    pub day: Day,
    pub lesson: usize,
    pub teacher: String,
    #[serde(default)]
    pub parity: Parity,
}

pub type Sessions = Vec<Session>;
pub type GroupMap = IndexMap<String, Sessions>;
pub type TypeMap = IndexMap<String, GroupMap>;

/// One unit of navigation: a (subject, class type) pair.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Page {
    pub subject: String,
    pub kind: String,
}

/// The full downloaded timetable, `subject -> type -> group -> sessions`.
/// Key order is the order the downloader emitted and defines page order.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog(pub IndexMap<String, TypeMap>);

impl Catalog {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timetable data from {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid timetable data", path.display()))?;
        catalog.check_lessons()?;
        Ok(catalog)
    }

    /// Slot indices outside the grid would only fault later, deep in the
    /// renderer, so reject them up front.
    fn check_lessons(&self) -> anyhow::Result<()> {
        for (subject, types) in &self.0 {
            for (kind, groups) in types {
                for (group, sessions) in groups {
                    for session in sessions {
                        if session.lesson >= LESSON_SLOTS {
                            bail!(
                                "{subject}/{kind}/{group}: lesson slot {} out of range (0..{LESSON_SLOTS})",
                                session.lesson
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Pages in catalog traversal order, one per (subject, type).
    pub fn pages(&self) -> Vec<Page> {
        let mut pages = Vec::new();
        for (subject, types) in &self.0 {
            for kind in types.keys() {
                pages.push(Page {
                    subject: subject.clone(),
                    kind: kind.clone(),
                });
            }
        }
        pages
    }

    pub fn groups(&self, page: &Page) -> &GroupMap {
        &self.0[&page.subject][&page.kind]
    }
}

/// Label for grid row `slot`, derived from how the downloader packs hours.
pub fn slot_label(slot: usize) -> String {
    format!("{}-{}", 8 + 2 * slot, 10 + 2 * slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        serde_json::from_str(
            r#"{
                "Analiza": {
                    "WYK": {"1": [{"day": "poniedziałek", "lesson": 0, "teacher": "Kowalski"}]},
                    "CW": {
                        "1": [{"day": "wtorek", "lesson": 2, "teacher": "Nowak", "parity": "odd"}],
                        "2": [{"day": "piątek", "lesson": 5, "teacher": "Nowak", "parity": "all"}]
                    }
                },
                "GUM": {
                    "LAB": {"3": [{"day": "środa", "lesson": 1, "teacher": "Wiśniewska", "parity": "even"}]}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn pages_follow_catalog_order() {
        let pages = sample().pages();
        let flat: Vec<(&str, &str)> = pages
            .iter()
            .map(|p| (p.subject.as_str(), p.kind.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![("Analiza", "WYK"), ("Analiza", "CW"), ("GUM", "LAB")]
        );
    }

    #[test]
    fn polish_day_names_map_to_column_indices() {
        let catalog = sample();
        let session = &catalog.0["Analiza"]["CW"]["2"][0];
        assert_eq!(session.day, Day::Friday);
        assert_eq!(session.day.index(), 4);
    }

    #[test]
    fn missing_parity_means_weekly() {
        let catalog = sample();
        let session = &catalog.0["Analiza"]["WYK"]["1"][0];
        assert_eq!(session.parity, Parity::All);
        assert_eq!(session.parity.note(), None);
    }

    #[test]
    fn parity_notes_match_usos_wording() {
        assert_eq!(Parity::Odd.note(), Some("(nieparzyste)"));
        assert_eq!(Parity::Even.note(), Some("(parzyste)"));
    }

    #[test]
    fn out_of_range_lesson_is_rejected() {
        let catalog: Catalog = serde_json::from_str(
            r#"{"X": {"WYK": {"1": [{"day": "wtorek", "lesson": 6, "teacher": "T"}]}}}"#,
        )
        .unwrap();
        let err = catalog.check_lessons().unwrap_err();
        assert!(err.to_string().contains("lesson slot 6"));
    }

    #[test]
    fn slot_labels_cover_eight_to_twenty() {
        assert_eq!(slot_label(0), "8-10");
        assert_eq!(slot_label(5), "18-20");
    }
}
