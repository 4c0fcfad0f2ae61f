//! Converts keyed record collections into ordered lists for display.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

/// A value a record exposes under a named sort field.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(Cow<'a, str>),
}

pub trait SortField {
    /// `None` when the record has no comparable value for `field`
    fn sort_value(&self, field: &str) -> Option<SortValue<'_>>;
}

impl SortField for serde_json::Value {
    fn sort_value(&self, field: &str) -> Option<SortValue<'_>> {
        match self.get(field)? {
            serde_json::Value::String(s) => Some(SortValue::Text(Cow::Borrowed(s))),
            serde_json::Value::Number(n) => n.as_f64().map(SortValue::Number),
            _ => None,
        }
    }
}

/// Returns the values of `payload` in iteration order, or sorted by
/// `sort_by` when given.
///
/// Numbers compare numerically and text lexicographically; `direction`
/// reverses that comparison. Numbers sort before text, and records without a
/// value for the field sort last in either direction. The sort is stable, so
/// records that compare equal keep their source order.
pub fn map_payload_to_array<K, V, I>(
    payload: I,
    sort_by: Option<&str>,
    direction: SortDirection,
) -> Vec<V>
where
    I: IntoIterator<Item = (K, V)>,
    V: SortField,
{
    let mut values: Vec<V> = payload.into_iter().map(|(_, value)| value).collect();

    if let Some(field) = sort_by {
        values.sort_by(|a, b| compare_values(a.sort_value(field), b.sort_value(field), direction));
    }

    values
}

fn compare_values(
    a: Option<SortValue<'_>>,
    b: Option<SortValue<'_>>,
    direction: SortDirection,
) -> Ordering {
    let class_order = class_rank(&a).cmp(&class_rank(&b));
    if class_order != Ordering::Equal {
        return class_order;
    }

    let ordering = match (a, b) {
        (Some(SortValue::Number(a)), Some(SortValue::Number(b))) => a.total_cmp(&b),
        (Some(SortValue::Text(a)), Some(SortValue::Text(b))) => a.cmp(&b),
        _ => Ordering::Equal,
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn class_rank(value: &Option<SortValue<'_>>) -> u8 {
    match value {
        Some(SortValue::Number(_)) => 0,
        Some(SortValue::Text(_)) => 1,
        None => 2,
    }
}
