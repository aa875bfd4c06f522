//! crates/revision_planner_core/src/catalog.rs
//!
//! The subject catalog and its raw exam-date table.
//!
//! Entries are kept as raw strings here; they are only parsed when a planning
//! run builds its timelines, so a malformed table fails the run that uses it.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// One raw exam sitting: an ISO date with an optional `HH:MM` start time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawExamEntry")]
pub struct ExamEntry {
    pub date: String,
    pub time: Option<String>,
}

impl ExamEntry {
    pub fn on(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: None,
        }
    }

    pub fn at(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: Some(time.into()),
        }
    }
}

/// Accepts either `"2025-05-15"` or `{"date": "2025-05-15", "time": "13:30"}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawExamEntry {
    Date(String),
    Timed { date: String, time: Option<String> },
}

impl From<RawExamEntry> for ExamEntry {
    fn from(raw: RawExamEntry) -> Self {
        match raw {
            RawExamEntry::Date(date) => ExamEntry::on(date),
            RawExamEntry::Timed { date, time } => ExamEntry { date, time },
        }
    }
}

/// The fixed catalog of subjects and the exam dates known for each of them.
///
/// Deserializes from a JSON object of subject to entries; the catalog follows
/// the order in which the subjects appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamTable {
    catalog: Vec<String>,
    exams: BTreeMap<String, Vec<ExamEntry>>,
}

impl<'de> Deserialize<'de> for ExamTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExamTableVisitor;

        impl<'de> Visitor<'de> for ExamTableVisitor {
            type Value = ExamTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of subject names to exam entries")
            }

            fn visit_map<M>(self, mut map: M) -> Result<ExamTable, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut table = ExamTable::new();
                while let Some(subject) = map.next_key::<String>()? {
                    if table.exams.contains_key(&subject) {
                        return Err(de::Error::custom(format!(
                            "subject '{subject}' is listed twice"
                        )));
                    }
                    let entries: Vec<ExamEntry> = map.next_value()?;
                    table.insert(subject, entries);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(ExamTableVisitor)
    }
}

impl ExamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `subject` to the catalog without any exam dates.
    pub fn add_subject(&mut self, subject: impl Into<String>) {
        let subject = subject.into();
        if !self.catalog.contains(&subject) {
            self.catalog.push(subject);
        }
    }

    /// Records the exam sittings of `subject`, replacing any earlier entries.
    pub fn insert(&mut self, subject: impl Into<String>, entries: Vec<ExamEntry>) {
        let subject = subject.into();
        self.add_subject(subject.clone());
        self.exams.insert(subject, entries);
    }

    /// Builder-style variant of [`ExamTable::insert`] for undated entries.
    pub fn with_exams(mut self, subject: &str, dates: &[&str]) -> Self {
        self.insert(subject, dates.iter().map(|d| ExamEntry::on(*d)).collect());
        self
    }

    /// Subjects in catalog order.
    pub fn subjects(&self) -> &[String] {
        &self.catalog
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.catalog.iter().any(|s| s == subject)
    }

    /// The raw exam entries of `subject`, if the table knows any.
    pub fn exams_for(&self, subject: &str) -> Option<&[ExamEntry]> {
        self.exams.get(subject).map(Vec::as_slice)
    }

    /// The 2025 GCSE catalog the planner ships with.
    pub fn gcse_2025() -> Self {
        let mut table = Self::new();
        for subject in GCSE_2025_SUBJECTS {
            table.add_subject(*subject);
        }
        for (subject, dates) in GCSE_2025_EXAMS {
            table.insert(*subject, dates.iter().map(|d| ExamEntry::on(*d)).collect());
        }
        table
    }
}

const GCSE_2025_SUBJECTS: &[&str] = &[
    "Maths",
    "English Language",
    "English Literature",
    "Biology",
    "Chemistry",
    "Physics",
    "Geography",
    "History",
    "French",
    "Spanish",
    "Business",
    "Automotive",
    "Religious Studies",
    "Music",
    "Food Tech",
    "Health and Social",
    "IT",
    "Construction",
    "Statistics",
    "Sport",
    "Design Technology",
    "Media Studies",
    "Hospitality & Catering",
];

const GCSE_2025_EXAMS: &[(&str, &[&str])] = &[
    ("Health and Social", &["2025-05-06"]),
    ("Construction", &["2025-05-06"]),
    ("Business", &["2025-05-09", "2025-05-16"]),
    ("English Literature", &["2025-05-12", "2025-05-20"]),
    ("Religious Studies", &["2025-05-13", "2025-05-21"]),
    ("Biology", &["2025-05-13", "2025-06-09"]),
    ("Geography", &["2025-05-14", "2025-06-06", "2025-06-12"]),
    ("Media Studies", &["2025-05-14", "2025-05-22"]),
    ("Maths", &["2025-05-15", "2025-06-04", "2025-06-11"]),
    ("History", &["2025-05-16", "2025-06-05", "2025-06-10"]),
    ("Chemistry", &["2025-05-19", "2025-06-13"]),
    ("French", &["2025-05-21", "2025-06-05"]),
    ("Physics", &["2025-05-22", "2025-06-16"]),
    ("Sport", &["2025-05-22"]),
    ("English Language", &["2025-05-23", "2025-06-06"]),
    ("Statistics", &["2025-06-02", "2025-06-13"]),
    ("Automotive", &["2025-06-02"]),
    ("IT", &["2025-06-09"]),
    ("Spanish", &["2025-06-10", "2025-06-17"]),
    ("Music", &["2025-06-05"]),
    ("Food Tech", &["2025-06-06"]),
    ("Design Technology", &["2025-06-18"]),
    ("Hospitality & Catering", &["2025-05-07"]),
];
