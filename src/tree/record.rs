use std::collections::HashMap;
use std::io::Read;

use compact_str::CompactString;
use serde::Deserialize;

use super::arena::NodeKey;
use crate::config::ChartOptions;

/// One flat input row: `{ id, parentId, value, ...metrics }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Record {
    pub id: NodeKey,
    /// None marks a top-level record (natural root candidate)
    pub parent_id: Option<NodeKey>,
    pub value: f64,
    pub label: Option<CompactString>,
    /// Remaining numeric fields, usable as `scaleByMetric` targets
    pub metrics: HashMap<CompactString, f64>,
}

impl Record {
    pub fn new(id: impl Into<NodeKey>, parent_id: Option<NodeKey>, value: f64) -> Self {
        Record {
            id: id.into(),
            parent_id,
            value,
            label: None,
            metrics: HashMap::new(),
        }
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(CompactString::new(name), value);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(CompactString::new(label));
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: NodeKey,
    #[serde(default)]
    parent_id: Option<NodeKey>,
    #[serde(default)]
    value: f64,
    #[serde(default)]
    label: Option<CompactString>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        // Non-numeric extras (colors, notes, ...) are not metrics.
        let metrics = raw
            .extra
            .iter()
            .filter_map(|(name, v)| v.as_f64().map(|n| (CompactString::new(name), n)))
            .collect();

        Record {
            id: raw.id,
            parent_id: raw.parent_id,
            value: raw.value,
            label: raw.label,
            metrics,
        }
    }
}

/// A dataset file: the flat records plus the chart options that drive layout.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub data: Vec<Record>,
    #[serde(default)]
    pub options: ChartOptions,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_reader(reader: impl Read) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}
