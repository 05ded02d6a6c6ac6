//! Roster data model: rows, class selectors and the grouped roster.
//!
//! On the wire a row is the positional array
//! `[id, name, college, grade, className]`. In memory it is a named struct so
//! nothing downstream depends on array indices.

use crate::filter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireRow", into = "WireRow")]
pub struct Row {
    pub id: String,
    pub name: String,
    pub college: String,
    pub grade: String,
    pub class_name: String,
}

#[derive(Serialize, Deserialize)]
struct WireRow(String, String, String, String, String);

impl From<WireRow> for Row {
    fn from(w: WireRow) -> Self {
        Row {
            id: w.0,
            name: w.1,
            college: w.2,
            grade: w.3,
            class_name: w.4,
        }
    }
}

impl From<Row> for WireRow {
    fn from(r: Row) -> Self {
        WireRow(r.id, r.name, r.college, r.grade, r.class_name)
    }
}

impl Row {
    /// Build a row from the three fields the table shows.
    pub fn new(id: impl Into<String>, name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Row {
            id: id.into(),
            name: name.into(),
            college: String::new(),
            grade: String::new(),
            class_name: class_name.into(),
        }
    }
}

/// The class filter currently chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ClassSelector {
    /// Every class; the table gains a class column.
    #[default]
    All,
    /// Exactly one class name.
    Class(String),
}

impl ClassSelector {
    /// String form of [`ClassSelector::All`].
    pub const ALL: &'static str = "ALL";

    /// Map `""` and `ALL` to [`ClassSelector::All`]; anything else names a
    /// class exactly as written, surrounding spaces included.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() || s == Self::ALL {
            ClassSelector::All
        } else {
            ClassSelector::Class(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClassSelector::All => Self::ALL,
            ClassSelector::Class(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ClassSelector::All)
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            ClassSelector::All => true,
            ClassSelector::Class(name) => row.class_name == *name,
        }
    }
}

impl FromStr for ClassSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(ClassSelector::parse(s))
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered list of rows in which each class occupies one contiguous run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    rows: Vec<Row>,
}

impl Roster {
    /// Wrap rows that are already grouped by class.
    ///
    /// Returns [`Error::UngroupedRoster`] if a class shows up again after a
    /// different class has started.
    pub fn new(rows: Vec<Row>) -> Result<Self> {
        check_grouped(&rows)?;
        Ok(Self { rows })
    }

    /// Sort rows by (class, id) and wrap them.
    pub fn from_unsorted(mut rows: Vec<Row>) -> Self {
        rows.sort_by(|a, b| a.class_name.cmp(&b.class_name).then_with(|| a.id.cmp(&b.id)));
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows selected by `selector`, borrowed from the roster.
    pub fn filter(&self, selector: &ClassSelector) -> &[Row] {
        filter::filter(&self.rows, selector)
    }

    /// Distinct class names in roster order.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            if names.last() != Some(&row.class_name) {
                names.push(row.class_name.clone());
            }
        }
        names
    }

    /// Number of rows per requested class. Classes absent from the roster map
    /// to zero; the `ALL` sentinel maps to the roster length.
    pub fn remains<S: AsRef<str>>(&self, classes: &[S]) -> BTreeMap<String, usize> {
        classes
            .iter()
            .map(|c| {
                let selector = ClassSelector::parse(c.as_ref());
                (selector.as_str().to_string(), self.filter(&selector).len())
            })
            .collect()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

fn check_grouped(rows: &[Row]) -> Result<()> {
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut current: Option<&str> = None;
    for (index, row) in rows.iter().enumerate() {
        let class = row.class_name.as_str();
        if current == Some(class) {
            continue;
        }
        if !seen.insert(class) {
            return Err(Error::UngroupedRoster {
                class: class.to_string(),
                index,
            });
        }
        current = Some(class);
    }
    Ok(())
}

/// Body of `data.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    #[serde(default)]
    pub form_data: Vec<Row>,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_name: Vec<String>,
}

impl RosterPayload {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::parse("data.json", e))
    }
}

/// Body of `image/status.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderStatus {
    pub last_modified: i64,
    #[serde(default)]
    pub remains: BTreeMap<String, usize>,
}

impl PrerenderStatus {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::parse("status.json", e))
    }

    pub fn remaining(&self, selector: &ClassSelector) -> Option<usize> {
        self.remains.get(selector.as_str()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_reads_positional_array() {
        let row: Row = serde_json::from_str(r#"["1001","Alice","EE","2018","C1"]"#).unwrap();
        assert_eq!(row.id, "1001");
        assert_eq!(row.name, "Alice");
        assert_eq!(row.class_name, "C1");
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["1001","Alice","EE","2018","C1"]"#);
    }

    #[test]
    fn padded_class_names_are_selectable() {
        let roster = Roster::new(vec![Row::new("1", "a", "C1"), Row::new("2", "b", " C1 ")]).unwrap();
        let rows = roster.filter(&ClassSelector::parse(" C1 "));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "2");
        assert!(ClassSelector::parse(" C1 ").matches(&rows[0]));
        assert!(!ClassSelector::parse("C1").matches(&rows[0]));
    }

    #[test]
    fn row_rejects_short_array() {
        assert!(serde_json::from_str::<Row>(r#"["1001","Alice"]"#).is_err());
    }

    #[test]
    fn selector_sentinel() {
        assert_eq!(ClassSelector::parse("ALL"), ClassSelector::All);
        assert_eq!(ClassSelector::parse(""), ClassSelector::All);
        assert_eq!(ClassSelector::parse(" C1 "), ClassSelector::Class(" C1 ".into()));
        assert_eq!(ClassSelector::Class("C2".into()).to_string(), "C2");
    }

    #[test]
    fn roster_rejects_interleaved_classes() {
        let rows = vec![Row::new("1", "a", "C1"), Row::new("2", "b", "C2"), Row::new("3", "c", "C1")];
        match Roster::new(rows) {
            Err(Error::UngroupedRoster { class, index }) => {
                assert_eq!(class, "C1");
                assert_eq!(index, 2);
            }
            other => panic!("expected ungrouped error, got {:?}", other),
        }
    }

    #[test]
    fn unsorted_rows_are_grouped() {
        let rows = vec![Row::new("3", "c", "C2"), Row::new("2", "b", "C1"), Row::new("1", "a", "C2")];
        let roster = Roster::from_unsorted(rows);
        assert_eq!(roster.class_names(), vec!["C1".to_string(), "C2".to_string()]);
        assert_eq!(roster.rows()[1].id, "1");
        assert!(Roster::new(roster.clone().into_rows()).is_ok());
    }

    #[test]
    fn remains_counts_every_requested_class() {
        let roster = Roster::new(vec![
            Row::new("1", "a", "C1"),
            Row::new("2", "b", "C1"),
            Row::new("3", "c", "C2"),
        ])
        .unwrap();
        let remains = roster.remains(&["ALL", "C1", "C2", "C9"]);
        assert_eq!(remains["ALL"], 3);
        assert_eq!(remains["C1"], 2);
        assert_eq!(remains["C2"], 1);
        assert_eq!(remains["C9"], 0);
    }

    #[test]
    fn payload_defaults_missing_form_data() {
        let p = RosterPayload::from_json(br#"{"lastModified": 1614924187}"#).unwrap();
        assert!(p.form_data.is_empty());
        assert_eq!(p.last_modified, 1614924187);
    }

    #[test]
    fn status_lookup() {
        let s = PrerenderStatus::from_json(br#"{"lastModified":5,"remains":{"C1":2,"ALL":3}}"#).unwrap();
        assert_eq!(s.remaining(&ClassSelector::All), Some(3));
        assert_eq!(s.remaining(&ClassSelector::parse("C1")), Some(2));
        assert_eq!(s.remaining(&ClassSelector::parse("C9")), None);
    }
}
