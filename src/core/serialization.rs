//! Serialization module for skychart
//!
//! This module provides output serializers for a generated chart:
//! - JSON (default): every star plus every constellation, for a renderer
//! - Summary: one plain-text line per constellation

use serde::{Deserialize, Serialize};

use crate::core::celestial::{AlgorithmKind, Constellation, Segment};
use crate::core::engine::SkyChart;
use crate::core::error::Result;
use crate::core::models::Seeds;
use crate::core::sky::{SkyField, StarColor, StarId};

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFormat {
    #[default]
    Json,
    Summary,
}

/// Trait for chart serializers
pub trait ChartSerializer: Send + Sync {
    /// Serialize a whole chart
    fn serialize(&self, chart: &SkyChart) -> Result<String>;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}

// =============================================================================
// Records
// =============================================================================

/// A star as seen by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub id: StarId,
    pub w: f64,
    pub h: f64,
    pub size: f64,
    pub color: StarColor,
    pub is_master: bool,
}

impl StarRecord {
    pub fn from_field(field: &SkyField, id: StarId) -> Self {
        let star = field.star(id);
        Self {
            id,
            w: star.position.w,
            h: star.position.h,
            size: star.size,
            color: star.color,
            is_master: star.is_master(),
        }
    }
}

/// A constellation with its member stars resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    pub stars: Vec<StarRecord>,
    pub segments: Vec<Segment>,
}

impl ConstellationRecord {
    pub fn from_constellation(field: &SkyField, constellation: &Constellation) -> Self {
        Self {
            id: constellation.id.clone(),
            name: constellation.name.clone(),
            parent_id: constellation.parent_id.clone(),
            custom_color: constellation.custom_color.map(|c| c.to_hex()),
            stars: constellation
                .stars
                .iter()
                .map(|&s| StarRecord::from_field(field, s))
                .collect(),
            segments: constellation.segments.clone(),
        }
    }
}

/// The whole chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub version: String,
    pub seeds: Seeds,
    pub algorithm: Option<AlgorithmKind>,
    pub width: f64,
    pub height: f64,
    pub stars: Vec<StarRecord>,
    pub constellations: Vec<ConstellationRecord>,
}

impl ChartRecord {
    pub fn from_chart(chart: &SkyChart) -> Self {
        let (width, height) = chart.field.tile_size();
        Self {
            version: crate::VERSION.to_string(),
            seeds: chart.seeds,
            algorithm: chart.algorithm,
            width,
            height,
            stars: chart
                .field
                .stars()
                .iter()
                .map(|s| StarRecord::from_field(&chart.field, s.id))
                .collect(),
            constellations: chart
                .constellations
                .iter()
                .map(|c| ConstellationRecord::from_constellation(&chart.field, c))
                .collect(),
        }
    }
}

// =============================================================================
// Serializers
// =============================================================================

/// Pretty-printed JSON serializer (default)
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSerializer for JsonSerializer {
    fn serialize(&self, chart: &SkyChart) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ChartRecord::from_chart(chart))?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

/// Plain-text overview
pub struct SummarySerializer;

impl SummarySerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SummarySerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSerializer for SummarySerializer {
    fn serialize(&self, chart: &SkyChart) -> Result<String> {
        let mut output = String::new();
        let algorithm = chart.algorithm.map_or("none", |a| a.as_str());
        output.push_str(&format!(
            "{} stars ({} masters), {} constellations ({} copies), algorithm {}\n",
            chart.field.stars().len(),
            chart.field.master_count(),
            chart.constellations.len(),
            chart.copies().count(),
            algorithm
        ));
        output.push_str(&format!(
            "seeds: stars={} constellations={} names={}\n",
            chart.seeds.star, chart.seeds.constellation, chart.seeds.name
        ));
        for c in &chart.constellations {
            output.push_str(&format!(
                "{:<8} {:<28} {:>3} stars {:>3} segments",
                c.id,
                c.name,
                c.len(),
                c.segments.len()
            ));
            if let Some(parent) = &c.parent_id {
                output.push_str(&format!("  (copy of {})", parent));
            }
            output.push('\n');
        }
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

/// Get the serializer for a format
pub fn get_serializer(format: ChartFormat) -> Box<dyn ChartSerializer> {
    match format {
        ChartFormat::Json => Box::new(JsonSerializer::new()),
        ChartFormat::Summary => Box::new(SummarySerializer::new()),
    }
}
