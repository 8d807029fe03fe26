//! Accumulated, not-yet-executed query constraints.
//!
//! A [`Selection`] is a list of AND-ed [`Predicate`] descriptors plus an
//! optional [`LimitOffset`] window. Adding a predicate returns a new selection,
//! so composition is monotonic and the order predicates were added in never
//! changes which rows match. Stores either render the descriptors (SQL) or
//! evaluate them directly with [`Selection::matches`].

use chrono::{DateTime, Utc};

use crate::filters::LimitOffset;
use crate::record::{FieldValue, Record};

/// A single constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field == value`
    Eq {
        field: &'static str,
        value: FieldValue,
    },
    /// `field IN values`; an empty list matches nothing.
    In {
        field: &'static str,
        values: Vec<FieldValue>,
    },
    /// `field < at`
    Before {
        field: &'static str,
        at: DateTime<Utc>,
    },
    /// `field > at`
    After {
        field: &'static str,
        at: DateTime<Utc>,
    },
}

impl Predicate {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Eq { field, .. }
            | Self::In { field, .. }
            | Self::Before { field, .. }
            | Self::After { field, .. } => field,
        }
    }

    /// Evaluates the predicate against one record.
    ///
    /// Range predicates never match a null or non-timestamp value.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let Some(current) = record.get(self.field()) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => &current == value,
            Self::In { values, .. } => values.contains(&current),
            Self::Before { at, .. } => current.as_timestamp().is_some_and(|v| v < *at),
            Self::After { at, .. } => current.as_timestamp().is_some_and(|v| v > *at),
        }
    }
}

/// The selection state held by a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    predicates: Vec<Predicate>,
    window: Option<LimitOffset>,
}

impl Selection {
    /// Every record of the type, unwindowed.
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns a selection with `predicate` AND-ed on.
    #[must_use]
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Returns a selection with the LIMIT/OFFSET window replaced.
    #[must_use]
    pub fn paginate(mut self, window: LimitOffset) -> Self {
        self.window = Some(window);
        self
    }

    /// The same predicates with the window dropped.
    #[must_use]
    pub fn unwindowed(mut self) -> Self {
        self.window = None;
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn window(&self) -> Option<LimitOffset> {
        self.window
    }

    /// True when the record satisfies every predicate. The window is ignored.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Filters `rows` (in their given order) and applies the window.
    pub fn apply<'a, R, I>(&self, rows: I) -> Vec<R>
    where
        R: Record,
        I: IntoIterator<Item = &'a R>,
    {
        let matching = rows.into_iter().filter(|r| self.matches(*r));
        match self.window {
            Some(LimitOffset { limit, offset }) => matching
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::Widget;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap()
    }

    fn widget(name: &str, created_day: u32) -> Widget {
        Widget {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size: None,
            owner_id: None,
            created: at(created_day),
            updated: at(created_day),
        }
    }

    fn names(rows: &[Widget]) -> Vec<&str> {
        rows.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn test_all_matches_everything() {
        let rows = vec![widget("a", 1), widget("b", 2)];
        assert_eq!(Selection::all().apply(&rows).len(), 2);
    }

    #[test]
    fn test_eq_predicate() {
        let rows = vec![widget("a", 1), widget("b", 2)];
        let selection = Selection::all().and(Predicate::Eq {
            field: "name",
            value: "b".into(),
        });
        assert_eq!(names(&selection.apply(&rows)), vec!["b"]);
    }

    #[test]
    fn test_eq_null_matches_null_field() {
        let mut sized = widget("sized", 1);
        sized.size = Some(3);
        let rows = vec![sized, widget("unsized", 2)];
        let selection = Selection::all().and(Predicate::Eq {
            field: "size",
            value: FieldValue::Null,
        });
        assert_eq!(names(&selection.apply(&rows)), vec!["unsized"]);
    }

    #[test]
    fn test_in_predicate_with_empty_values_matches_nothing() {
        let rows = vec![widget("a", 1)];
        let selection = Selection::all().and(Predicate::In {
            field: "id",
            values: vec![],
        });
        assert!(selection.apply(&rows).is_empty());
    }

    #[test]
    fn test_in_predicate() {
        let rows = vec![widget("a", 1), widget("b", 2), widget("c", 3)];
        let selection = Selection::all().and(Predicate::In {
            field: "id",
            values: vec![rows[0].id.into(), rows[2].id.into()],
        });
        assert_eq!(names(&selection.apply(&rows)), vec!["a", "c"]);
    }

    #[test]
    fn test_range_is_exclusive_on_both_ends() {
        let rows: Vec<Widget> = (1..=5).map(|d| widget(&d.to_string(), d)).collect();
        let selection = Selection::all()
            .and(Predicate::After {
                field: "created",
                at: at(1),
            })
            .and(Predicate::Before {
                field: "created",
                at: at(5),
            });
        assert_eq!(names(&selection.apply(&rows)), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_predicate_order_does_not_change_result() {
        let rows: Vec<Widget> = (1..=5).map(|d| widget(&d.to_string(), d)).collect();
        let before = Predicate::Before {
            field: "created",
            at: at(4),
        };
        let name = Predicate::In {
            field: "name",
            values: vec!["1".into(), "3".into(), "5".into()],
        };
        let forward = Selection::all().and(before.clone()).and(name.clone());
        let backward = Selection::all().and(name).and(before);
        assert_eq!(forward.apply(&rows), backward.apply(&rows));
    }

    #[test]
    fn test_window_applies_after_filtering() {
        let rows: Vec<Widget> = (1..=6).map(|d| widget(&d.to_string(), d)).collect();
        let selection = Selection::all()
            .and(Predicate::After {
                field: "created",
                at: at(1),
            })
            .paginate(LimitOffset::new(2, 2));
        assert_eq!(names(&selection.apply(&rows)), vec!["4", "5"]);
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let rows = vec![widget("a", 1)];
        let selection = Selection::all().and(Predicate::Eq {
            field: "colour",
            value: "red".into(),
        });
        assert!(selection.apply(&rows).is_empty());
    }
}
