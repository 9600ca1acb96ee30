//! LifeView - one character's record held on the Rust side
//!
//! History is grouped by year once at construction; Python pulls pages of
//! years or single events through the getters.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::ops::Range;

use crate::error::Result;
use crate::model::{AttributeSnapshot, Character, CharacterId, LifeEvent, OfferSet};
use crate::store::LifeStore;

pub const DEFAULT_YEARS_PER_PAGE: usize = 10;

/// Everything the life page shows, read from the store in one go
#[derive(Debug, Clone)]
pub struct LifeRecord {
    pub character: Character,
    pub attributes: Option<AttributeSnapshot>,
    pub offers: OfferSet,
    pub events: Vec<LifeEvent>,
}

impl LifeRecord {
    pub fn load(store: &dyn LifeStore, id: CharacterId) -> Result<Self> {
        Ok(Self {
            character: store.character(id)?,
            attributes: store.latest_snapshot(id)?,
            offers: store.offers(id)?,
            events: store.events(id)?,
        })
    }
}

/// Events that share a year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearEntry {
    pub year: u32,
    pub summaries: Vec<String>,
}

/// Group year-ordered events into one entry per year
pub fn group_by_year(events: &[LifeEvent]) -> Vec<YearEntry> {
    let mut years: Vec<YearEntry> = Vec::new();
    for event in events {
        match years.last_mut() {
            Some(entry) if entry.year == event.year => entry.summaries.push(event.summary.clone()),
            _ => years.push(YearEntry {
                year: event.year,
                summaries: vec![event.summary.clone()],
            }),
        }
    }
    years
}

/// Index range of a 1-indexed page, or `None` when the page is out of bounds
pub fn page_range(len: usize, page: usize, per_page: usize) -> Option<Range<usize>> {
    if page == 0 || per_page == 0 {
        return None;
    }
    let start = (page - 1).checked_mul(per_page)?;
    if start >= len {
        return None;
    }
    Some(start..(start + per_page).min(len))
}

fn attributes_to_dict<'py>(py: Python<'py>, snapshot: &AttributeSnapshot) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("year", snapshot.year)?;
    dict.set_item("health", snapshot.health)?;
    dict.set_item("wealth", snapshot.wealth)?;
    dict.set_item("happiness", snapshot.happiness)?;
    dict.set_item("karma", snapshot.karma)?;
    dict.set_item("iq", snapshot.iq)?;
    Ok(dict)
}

/// Read-only handle on a character's life
#[pyclass]
pub struct LifeView {
    character: Character,
    attributes: Option<AttributeSnapshot>,
    offers: OfferSet,
    events: Vec<LifeEvent>,
    years: Vec<YearEntry>,
}

impl LifeView {
    pub fn new(record: LifeRecord) -> Self {
        let years = group_by_year(&record.events);
        Self {
            character: record.character,
            attributes: record.attributes,
            offers: record.offers,
            events: record.events,
            years,
        }
    }
}

#[pymethods]
impl LifeView {
    #[getter]
    fn id(&self) -> CharacterId {
        self.character.id
    }

    #[getter]
    fn name(&self) -> &str {
        &self.character.name
    }

    #[getter]
    fn gender(&self) -> &str {
        &self.character.gender
    }

    #[getter]
    fn age(&self) -> u32 {
        self.character.age
    }

    #[getter]
    fn score(&self) -> i64 {
        self.character.score
    }

    /// "created", "alive", "deceased" or "ended"
    #[getter]
    fn status(&self) -> &'static str {
        self.character.status.as_str()
    }

    #[getter]
    fn is_alive(&self) -> bool {
        self.character.is_alive()
    }

    #[getter]
    fn perks(&self) -> Vec<String> {
        self.character.perks.to_vec()
    }

    /// Current attributes, or None before the first evaluation
    #[getter]
    fn attributes(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        match self.attributes {
            Some(ref snapshot) => Ok(attributes_to_dict(py, snapshot)?.into_any().unbind()),
            None => Ok(py.None()),
        }
    }

    #[getter]
    fn choices(&self) -> Vec<String> {
        self.offers.choices.clone()
    }

    #[getter]
    fn achievements(&self) -> Vec<String> {
        self.offers.achievements.clone()
    }

    /// Bumped on every offer refresh
    #[getter]
    fn offers_version(&self) -> u64 {
        self.offers.version
    }

    #[getter]
    fn total_events(&self) -> usize {
        self.events.len()
    }

    #[getter]
    fn total_years(&self) -> usize {
        self.years.len()
    }

    #[getter]
    fn total_pages(&self) -> usize {
        self.years.len().div_ceil(DEFAULT_YEARS_PER_PAGE)
    }

    /// Years on a 1-indexed page, each as `{"year": int, "summaries": [str]}`
    ///
    /// Out-of-range pages give an empty list.
    #[pyo3(signature = (page, years_per_page=DEFAULT_YEARS_PER_PAGE))]
    fn get_page_data(&self, py: Python<'_>, page: usize, years_per_page: usize) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        if let Some(range) = page_range(self.years.len(), page, years_per_page) {
            for entry in &self.years[range] {
                let dict = PyDict::new(py);
                dict.set_item("year", entry.year)?;
                dict.set_item("summaries", &entry.summaries)?;
                list.append(dict)?;
            }
        }
        Ok(list.into_any().unbind())
    }

    /// A single event by position in the history, or None
    fn get_event(&self, py: Python<'_>, index: usize) -> PyResult<Py<PyAny>> {
        match self.events.get(index) {
            Some(event) => {
                let dict = PyDict::new(py);
                dict.set_item("year", event.year)?;
                dict.set_item("summary", &event.summary)?;
                Ok(dict.into_any().unbind())
            }
            None => Ok(py.None()),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "LifeView(id={}, name={:?}, age={}, status={})",
            self.character.id,
            self.character.name,
            self.character.age,
            self.character.status
        )
    }
}

impl LifeView {
    #[cfg(test)]
    pub(crate) fn years(&self) -> &[YearEntry] {
        &self.years
    }

    #[cfg(test)]
    pub(crate) fn character(&self) -> &Character {
        &self.character
    }
}
