//! Natal chart snapshot and the store it is fetched from.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyReading};
use crate::error::ChartError;
use crate::house::HouseCusps;

/// Body positions and house cusps at a birth instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NatalChart {
    pub bodies: BTreeMap<Body, BodyReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub houses: Option<HouseCusps>,
}

impl NatalChart {
    pub fn new(bodies: BTreeMap<Body, BodyReading>, houses: Option<HouseCusps>) -> Self {
        Self { bodies, houses }
    }

    /// Decode a chart from JSON of the form
    /// `{"bodies": {"sun": {"longitude": 12.5}, ...}, "houses": [..12..]}`.
    pub fn from_json(s: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Canonical JSON, stable for equal charts (bodies are ordered).
    pub fn to_canonical_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reading for a body, or `MissingNatalData`.
    pub fn reading(&self, body: Body) -> Result<&BodyReading, ChartError> {
        self.bodies
            .get(&body)
            .ok_or(ChartError::MissingNatalData(body))
    }

    pub fn houses(&self) -> Result<&HouseCusps, ChartError> {
        self.houses.as_ref().ok_or(ChartError::MissingHouses)
    }

    /// House a body occupies.
    pub fn house_of(&self, body: Body) -> Result<u8, ChartError> {
        let lon = self.reading(body)?.longitude;
        Ok(self.houses()?.house_of(lon))
    }

    /// Bodies placed in a house, in body order.
    pub fn bodies_in_house(&self, house: u8) -> Result<Vec<Body>, ChartError> {
        let cusps = self.houses()?;
        Ok(self
            .bodies
            .iter()
            .filter(|(_, r)| cusps.house_of(r.longitude) == house)
            .map(|(b, _)| *b)
            .collect())
    }
}

/// Source of natal charts keyed by user id.
pub trait NatalChartStore {
    /// Fetch a chart; absence is `ChartError::NotFound`.
    fn get(&self, user_id: &str) -> Result<NatalChart, ChartError>;
}

/// Map-backed store for tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChartStore {
    charts: HashMap<String, NatalChart>,
}

impl InMemoryChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, chart: NatalChart) {
        self.charts.insert(user_id.into(), chart);
    }
}

impl NatalChartStore for InMemoryChartStore {
    fn get(&self, user_id: &str) -> Result<NatalChart, ChartError> {
        self.charts
            .get(user_id)
            .cloned()
            .ok_or_else(|| ChartError::NotFound(user_id.to_string()))
    }
}
