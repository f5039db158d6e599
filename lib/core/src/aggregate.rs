//! Group-by aggregation
//!
//! Reduces a table to one row per distinct tuple of grouping values, each
//! measure combined with an [`Operator`].

use crate::table::{numeric_cell, Row, Table};
use crate::value::Value;
use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tuple of grouping values identifying one group
pub type GroupKey = SmallVec<[Value; 4]>;

/// How measure values are combined within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    Sum,
    Mean,
    Count,
}

impl Operator {
    /// Combine already-reduced group values into one summary
    ///
    /// Sums and counts add up; means are averaged.
    pub fn combine<I: IntoIterator<Item = f64>>(&self, values: I) -> f64 {
        let mut acc = Accumulator::default();
        for v in values {
            acc.push(v);
        }
        match self {
            Operator::Sum | Operator::Count => acc.sum,
            Operator::Mean => {
                if acc.count == 0 {
                    0.0
                } else {
                    acc.sum / acc.count as f64
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn finish(&self, op: Operator, measure: &str) -> Result<Value> {
        if op != Operator::Count && !self.sum.is_finite() {
            return Err(Error::Computation(format!(
                "sum of '{}' overflows",
                measure
            )));
        }
        Ok(match op {
            Operator::Sum => Value::number(self.sum),
            Operator::Count => Value::number(self.count as f64),
            Operator::Mean if self.count == 0 => Value::Null,
            Operator::Mean => Value::number(self.sum / self.count as f64),
        })
    }
}

/// Assignment of every row to a group
#[derive(Debug, Clone)]
pub struct Partition {
    /// Distinct keys in first-appearance order
    pub keys: Vec<GroupKey>,
    /// Group slot of each row, indexing into `keys`
    pub slots: Vec<usize>,
}

impl Partition {
    /// Partition rows by the exact tuple of `group_by` values
    pub fn new<S: AsRef<str>>(table: &Table, group_by: &[S]) -> Self {
        let mut index: AHashMap<GroupKey, usize> = AHashMap::new();
        let mut keys = Vec::new();
        let mut slots = Vec::with_capacity(table.len());

        for row in 0..table.len() {
            let key: GroupKey = group_by
                .iter()
                .map(|field| table.value(row, field.as_ref()).clone())
                .collect();
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    let slot = keys.len();
                    index.insert(key.clone(), slot);
                    keys.push(key);
                    slot
                }
            };
            slots.push(slot);
        }

        Self { keys, slots }
    }

    pub fn group_count(&self) -> usize {
        self.keys.len()
    }

    /// Row indices of each group, in row order
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.keys.len()];
        for (row, &slot) in self.slots.iter().enumerate() {
            members[slot].push(row);
        }
        members
    }
}

/// Aggregate `measures` of `table` grouped by `group_by`
///
/// Each measure is reduced in its own pass and merged into the row of its
/// key; when a measure name collides with a grouping field or an earlier
/// measure, the later pass wins. Absent measure cells are skipped, any other
/// non-numeric cell fails with [`Error::TypeMismatch`]. A sum or mean that
/// overflows `f64` fails with [`Error::Computation`]. Rows come out in
/// first-appearance order of their key.
pub fn aggregate<S: AsRef<str>, M: AsRef<str>>(
    table: &Table,
    group_by: &[S],
    measures: &[M],
    op: Operator,
) -> Result<Table> {
    let partition = Partition::new(table, group_by);
    aggregate_partition(table, &partition, group_by, measures, op)
}

/// Aggregate over a precomputed [`Partition`]
pub fn aggregate_partition<S: AsRef<str>, M: AsRef<str>>(
    table: &Table,
    partition: &Partition,
    group_by: &[S],
    measures: &[M],
    op: Operator,
) -> Result<Table> {
    if partition.slots.len() != table.len() {
        return Err(Error::InvalidConfig(
            "partition does not match the table".to_string(),
        ));
    }

    let mut rows: Vec<Row> = partition
        .keys
        .iter()
        .map(|key| {
            group_by
                .iter()
                .zip(key.iter())
                .map(|(field, value)| (field.as_ref().to_string(), value.clone()))
                .collect()
        })
        .collect();

    for measure in measures {
        let measure = measure.as_ref();
        let mut accs = vec![Accumulator::default(); partition.keys.len()];
        for (row, &slot) in partition.slots.iter().enumerate() {
            if let Some(v) = numeric_cell(measure, table.value(row, measure))? {
                accs[slot].push(v);
            }
        }
        for (out, acc) in rows.iter_mut().zip(accs.iter()) {
            out.insert(measure.to_string(), acc.finish(op, measure)?);
        }
    }

    Ok(Table::new(rows))
}
