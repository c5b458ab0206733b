//! Parser tests over realistic query documents.

use query_parser::{parse_query, GraphqlSelectionParser, QueryParseError};
use schema_core::{QueryParser, Schema, Selection, SelectionSet};

#[test]
fn test_parser_trait_matches_free_function() {
    let query = "query { teams { wins } }";
    let via_trait = GraphqlSelectionParser
        .parse(&Schema::default(), query)
        .unwrap();
    assert_eq!(via_trait, parse_query(query).unwrap());
}

#[test]
fn test_multiple_root_fields_keep_order() {
    let query = r#"
        {
          best: teams(orderBy: WINS, first: 1) { wins }
          players { name age }
        }
    "#;
    let set = parse_query(query).unwrap();

    let expected = SelectionSet::new(vec![
        Selection::nested("teams", SelectionSet::new(vec![Selection::field("wins")]))
            .with_alias("best"),
        Selection::nested(
            "players",
            SelectionSet::new(vec![Selection::field("name"), Selection::field("age")]),
        ),
    ]);
    assert_eq!(set, expected);
}

#[test]
fn test_deeply_nested_selection() {
    let query = "{ teams { players { team { players { team { wins } } } } } }";
    let mut set = &parse_query(query).unwrap();
    let mut depth = 0;
    while let Some(next) = set.selections[0].selection_set.as_ref() {
        set = next;
        depth += 1;
    }
    assert_eq!(depth, 5);
    assert_eq!(set.selections[0].name, "wins");
}

#[test]
fn test_inline_fragment_rejected() {
    let result = parse_query("{ teams { ... on Team { wins } } }");
    assert!(matches!(
        result,
        Err(QueryParseError::UnsupportedFragment { .. })
    ));
}

#[test]
fn test_fragment_definition_rejected() {
    let result = parse_query("{ teams { wins } }\nfragment F on team { wins }");
    assert!(matches!(
        result,
        Err(QueryParseError::UnsupportedFragment { offset: 19 })
    ));
}
