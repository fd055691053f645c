//! Filter compiler
//!
//! Turns a [`TodoQuery`] into one [`Predicate`]. Dimensions are visited in a
//! fixed order and the first invalid one aborts compilation:
//!
//! 1. `age`: exact match, `0 < age < 150`
//! 2. `company`: case-insensitive literal substring
//! 3. `owner`: case-insensitive literal substring
//! 4. `role`: exact match, `admin|editor|viewer`
//! 5. `category`: exact match against the fixed category set
//! 6. `status`: `complete` (any case) selects completed todos, anything else
//!    selects incomplete ones
//! 7. `contains` / `body`: case-insensitive literal substring of the body;
//!    `contains` wins when both are sent and an empty value is ignored
//!
//! Present dimensions are ANDed together. With none present the result
//! matches everything.

use super::predicate::{Field, Predicate, Value};
use super::validate::{parse_age, parse_category, parse_role, ValidationError};
use super::TodoQuery;

/// Compiles every present filter dimension into a single predicate
pub fn compile_filter(params: &TodoQuery) -> Result<Predicate, ValidationError> {
    let mut filters = Vec::new();

    if let Some(age) = &params.age {
        filters.push(Predicate::equals(Field::Age, Value::Int(parse_age(age)?)));
    }

    if let Some(company) = &params.company {
        filters.push(Predicate::contains_ignore_case(Field::Company, company.as_str()));
    }

    if let Some(owner) = &params.owner {
        filters.push(Predicate::contains_ignore_case(Field::Owner, owner.as_str()));
    }

    if let Some(role) = &params.role {
        let role = parse_role(role)?;
        filters.push(Predicate::equals(
            Field::Role,
            Value::Text(role.as_str().to_string()),
        ));
    }

    if let Some(category) = &params.category {
        let category = parse_category(category)?;
        filters.push(Predicate::equals(
            Field::Category,
            Value::Text(category.as_str().to_string()),
        ));
    }

    if let Some(status) = &params.status {
        filters.push(Predicate::equals(
            Field::Completed,
            Value::Bool(status.eq_ignore_ascii_case("complete")),
        ));
    }

    if let Some(text) = params
        .contains
        .as_deref()
        .or(params.body.as_deref())
        .filter(|s| !s.is_empty())
    {
        filters.push(Predicate::contains_ignore_case(Field::Body, text));
    }

    Ok(if filters.is_empty() {
        Predicate::match_all()
    } else {
        Predicate::and(filters)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params_matches_all() {
        let predicate = compile_filter(&TodoQuery::default()).unwrap();
        assert!(predicate.is_match_all());
    }

    #[test]
    fn test_single_dimension_is_not_wrapped() {
        let params = TodoQuery {
            age: Some("35".to_string()),
            ..Default::default()
        };
        assert_eq!(
            compile_filter(&params).unwrap(),
            Predicate::equals(Field::Age, Value::Int(35))
        );
    }

    #[test]
    fn test_dimensions_are_anded_in_fixed_order() {
        let params = TodoQuery {
            age: Some("30".to_string()),
            company: Some("glob".to_string()),
            role: Some("editor".to_string()),
            status: Some("Complete".to_string()),
            contains: Some("lorem".to_string()),
            ..Default::default()
        };

        assert_eq!(
            compile_filter(&params).unwrap(),
            Predicate::And(vec![
                Predicate::equals(Field::Age, Value::Int(30)),
                Predicate::contains_ignore_case(Field::Company, "glob"),
                Predicate::equals(Field::Role, Value::Text("editor".to_string())),
                Predicate::equals(Field::Completed, Value::Bool(true)),
                Predicate::contains_ignore_case(Field::Body, "lorem"),
            ])
        );
    }

    #[test]
    fn test_status_values() {
        for (raw, expected) in [
            ("complete", true),
            ("COMPLETE", true),
            ("incomplete", false),
            ("done", false),
            ("", false),
        ] {
            let params = TodoQuery {
                status: Some(raw.to_string()),
                ..Default::default()
            };
            assert_eq!(
                compile_filter(&params).unwrap(),
                Predicate::equals(Field::Completed, Value::Bool(expected)),
                "status={:?}",
                raw
            );
        }
    }

    #[test]
    fn test_empty_contains_is_ignored() {
        let params = TodoQuery {
            contains: Some(String::new()),
            ..Default::default()
        };
        assert!(compile_filter(&params).unwrap().is_match_all());
    }

    #[test]
    fn test_body_is_an_alias_for_contains() {
        let params = TodoQuery {
            body: Some("Sunt".to_string()),
            ..Default::default()
        };
        assert_eq!(
            compile_filter(&params).unwrap(),
            Predicate::contains_ignore_case(Field::Body, "Sunt")
        );

        let both = TodoQuery {
            contains: Some("first".to_string()),
            body: Some("second".to_string()),
            ..Default::default()
        };
        assert_eq!(
            compile_filter(&both).unwrap(),
            Predicate::contains_ignore_case(Field::Body, "first")
        );
    }

    #[test]
    fn test_first_invalid_dimension_aborts() {
        let params = TodoQuery {
            age: Some("9999".to_string()),
            role: Some("root".to_string()),
            ..Default::default()
        };
        assert_eq!(compile_filter(&params).unwrap_err().field(), "age");

        let params = TodoQuery {
            role: Some("root".to_string()),
            category: Some("chores".to_string()),
            ..Default::default()
        };
        assert_eq!(compile_filter(&params).unwrap_err().field(), "role");
    }

    #[test]
    fn test_role_and_category_are_case_sensitive() {
        let params = TodoQuery {
            role: Some("ADMIN".to_string()),
            ..Default::default()
        };
        assert!(compile_filter(&params).is_err());

        let params = TodoQuery {
            category: Some("Groceries".to_string()),
            ..Default::default()
        };
        assert!(compile_filter(&params).is_err());
    }

    #[test]
    fn test_pagination_params_do_not_filter() {
        let params = TodoQuery {
            limit: Some("2".to_string()),
            sort_by: Some("age".to_string()),
            sort_order: Some("desc".to_string()),
            ..Default::default()
        };
        assert!(compile_filter(&params).unwrap().is_match_all());
    }
}
