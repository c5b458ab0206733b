//! Parsed query selections.
//!
//! Selection sets are produced by a [`QueryParser`] and consumed read-only
//! by the projector.

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// One selected field, optionally aliased, optionally with a nested selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Field name as declared on the parent type
    pub name: String,

    /// Output key override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Nested selection for object and list-of-object fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_set: Option<SelectionSet>,
}

impl Selection {
    /// Select a leaf field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            selection_set: None,
        }
    }

    /// Select a field with a nested selection.
    pub fn nested(name: impl Into<String>, selection_set: SelectionSet) -> Self {
        Self {
            name: name.into(),
            alias: None,
            selection_set: Some(selection_set),
        }
    }

    /// Set the output alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Key under which this selection appears in output.
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered sequence of selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    pub fn new(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selections.iter()
    }
}

impl FromIterator<Selection> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Selection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Turns query text into a selection set.
///
/// Implementations may use the schema to resolve or validate names; the
/// projector validates field names itself either way.
pub trait QueryParser {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parse `query` against `schema`.
    fn parse(&self, schema: &Schema, query: &str) -> Result<SelectionSet, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_key_prefers_alias() {
        assert_eq!(Selection::field("wins").output_key(), "wins");
        assert_eq!(
            Selection::field("wins").with_alias("victories").output_key(),
            "victories"
        );
    }

    #[test]
    fn test_selection_set_from_yaml() {
        let yaml = r#"
- name: teams
  selection_set:
    - name: wins
    - name: players
      alias: roster
      selection_set:
        - name: name
"#;
        let set: SelectionSet = serde_yaml::from_str(yaml).unwrap();
        let expected = SelectionSet::new(vec![Selection::nested(
            "teams",
            SelectionSet::new(vec![
                Selection::field("wins"),
                Selection::nested("players", SelectionSet::new(vec![Selection::field("name")]))
                    .with_alias("roster"),
            ]),
        )]);
        assert_eq!(set, expected);
    }
}
