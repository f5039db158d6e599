//! Chart specification synthesis
//!
//! Maps ranked fields onto visual channels and picks geometry types from
//! the resulting layout.
//!
//! ## Channel assignment
//!
//! Every semantic type has a preference list of channels. Types are handled
//! in the order quantitative, ordinal, nominal, temporal. For each channel
//! in the list, the *last* unplaced field of that type in the ranked list is
//! assigned until the channel is full or no field of the type is left.
//!
//! ## Geometry
//!
//! Only decided when `position` holds two fields:
//!
//! ```text
//! dimension x measure  -> interval (<= 20 members) | line, area (>= 21)
//!                         nominal on either axis   -> interval
//! measure x measure    -> point (<= 10M rows) | density (>= 1001 rows)
//! ```

use crate::fields::FieldImpurity;
use insightx_core::{Field, FieldRole, FieldType, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A visual encoding slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Position,
    Color,
    Size,
    Shape,
    Opacity,
    Facets,
    Page,
    Filter,
    HighFacets,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::Position,
        Channel::Color,
        Channel::Size,
        Channel::Shape,
        Channel::Opacity,
        Channel::Facets,
        Channel::Page,
        Channel::Filter,
        Channel::HighFacets,
    ];

    /// Maximum number of fields, `None` when unbounded
    pub fn capacity(self) -> Option<usize> {
        match self {
            Channel::Position => Some(2),
            Channel::Facets => Some(2),
            Channel::HighFacets => None,
            _ => Some(1),
        }
    }
}

/// Channels a semantic type may occupy, most preferred first
pub fn channel_priority(field_type: FieldType) -> &'static [Channel] {
    use Channel::*;
    match field_type {
        FieldType::Quantitative => &[Position, Size, Opacity, Color, Page, Filter, HighFacets],
        FieldType::Ordinal => &[Position, Opacity, Color, Facets, Size, Page, Filter, HighFacets],
        FieldType::Nominal => &[Position, Color, Facets, Shape, Page, Filter, HighFacets],
        FieldType::Temporal => &[Position, Page, Filter],
    }
}

/// Fields placed on each channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelAssignment {
    channels: BTreeMap<Channel, Vec<String>>,
}

impl ChannelAssignment {
    pub fn get(&self, channel: Channel) -> &[String] {
        self.channels.get(&channel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn position(&self) -> &[String] {
        self.get(Channel::Position)
    }

    /// Fields the channel can still take
    pub fn remaining(&self, channel: Channel) -> Option<usize> {
        channel
            .capacity()
            .map(|cap| cap.saturating_sub(self.get(channel).len()))
    }

    /// Place a field, refusing when the channel is full
    pub fn push(&mut self, channel: Channel, field: impl Into<String>) -> bool {
        if self.remaining(channel) == Some(0) {
            return false;
        }
        self.channels.entry(channel).or_default().push(field.into());
        true
    }

    /// Number of placed fields across all channels
    pub fn len(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &[String])> {
        self.channels.iter().map(|(c, f)| (*c, f.as_slice()))
    }

    fn set_position(&mut self, fields: Vec<String>) {
        self.channels.insert(Channel::Position, fields);
    }
}

/// Greedy channel assignment over a ranked field list
pub fn assign_channels(ranked: &[Field]) -> ChannelAssignment {
    let mut assignment = ChannelAssignment::default();
    let mut chosen = vec![false; ranked.len()];
    let mut left = ranked.len();

    'types: for field_type in FieldType::ALL {
        for &channel in channel_priority(field_type) {
            if left == 0 {
                break 'types;
            }
            while assignment.remaining(channel) != Some(0) {
                let pick = (0..ranked.len())
                    .rev()
                    .find(|&i| !chosen[i] && ranked[i].field_type == field_type);
                let Some(i) = pick else { break };
                assignment.push(channel, ranked[i].name.clone());
                chosen[i] = true;
                left -= 1;
            }
        }
    }
    assignment
}

/// Chart mark family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeomType {
    Interval,
    Line,
    Area,
    Point,
    Density,
}

impl GeomType {
    /// Inclusive range of the size statistic a geometry suits
    pub fn range(self) -> (usize, usize) {
        match self {
            GeomType::Interval => (0, 20),
            GeomType::Line | GeomType::Area => (21, usize::MAX),
            GeomType::Point => (0, 10_000_000),
            GeomType::Density => (1001, usize::MAX),
        }
    }

    pub fn accepts(self, n: usize) -> bool {
        let (lo, hi) = self.range();
        lo <= n && n <= hi
    }
}

/// Channels plus geometry of one chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSchema {
    #[serde(flatten)]
    pub channels: ChannelAssignment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geom_type: Vec<GeomType>,
}

/// Terminal artifact of the pipeline: a chart schema and its data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpecification {
    pub schema: ViewSchema,
    pub agg_data: Table,
}

/// Builds view specifications from ranked fields
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationBuilder;

impl SpecificationBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Assign channels and choose geometry
    ///
    /// `field_scores` is the ranked field list; its roles decide which
    /// position fields count as dimensions and measures.
    pub fn build(&self, field_scores: &[FieldImpurity], agg_data: Table) -> ViewSpecification {
        let ranked: Vec<Field> = field_scores.iter().map(|s| s.field.clone()).collect();
        let mut channels = assign_channels(&ranked);
        let geom_type = select_geometry(&mut channels, field_scores, &agg_data);

        ViewSpecification {
            schema: ViewSchema { channels, geom_type },
            agg_data,
        }
    }
}

/// Choose geometry types from the position channel
///
/// A dimension/measure pair on `position` is reordered to
/// `[dimension, measure]`. Returns an empty list when `position` does not
/// hold exactly two fields.
pub fn select_geometry(
    channels: &mut ChannelAssignment,
    field_scores: &[FieldImpurity],
    agg_data: &Table,
) -> Vec<GeomType> {
    let position = channels.position();
    if position.len() != 2 {
        return Vec::new();
    }

    let lookup = |name: &str| field_scores.iter().find(|s| s.field.name == name);
    let role_of = |name: &str| lookup(name).map(|s| s.role);
    let is_nominal = |name: &str| {
        lookup(name)
            .map(|s| s.field.field_type == FieldType::Nominal)
            .unwrap_or(false)
    };

    let (a, b) = (position[0].clone(), position[1].clone());
    let pair = match (role_of(&a), role_of(&b)) {
        (Some(FieldRole::Dimension), Some(FieldRole::Measure)) => Some((a, b)),
        (Some(FieldRole::Measure), Some(FieldRole::Dimension)) => Some((b, a)),
        _ => None,
    };

    match pair {
        Some((dimension, measure)) => {
            let members = agg_data.distinct_count(&dimension);
            let geoms = if is_nominal(&dimension) || is_nominal(&measure) {
                vec![GeomType::Interval]
            } else {
                [GeomType::Interval, GeomType::Line, GeomType::Area]
                    .into_iter()
                    .filter(|g| g.accepts(members))
                    .collect()
            };
            channels.set_position(vec![dimension, measure]);
            geoms
        }
        None => [GeomType::Point, GeomType::Density]
            .into_iter()
            .filter(|g| g.accepts(agg_data.len()))
            .collect(),
    }
}
