//! Clause parsing.
//!
//! Three small grammars live here:
//!
//! - `column:type` pairs given to `create_table`
//! - `column=value` equality clauses used by `where` and `set`
//! - the parenthesised value list of `insert ... values (...)`
//!
//! Quotes are only recognised at the start of a value (or of a list item).
//! A quoted value always stays a string, so `name="true"` is the text
//! `true` and never the boolean.

use crate::error::{CoreError, CoreResult};
use crate::types::{Clause, Literal};
use tracing::debug;

const PAIR_SHAPE: &str = "column:type";
const CLAUSE_SHAPE: &str = "column=value";
const LIST_SHAPE: &str = "(value, ...)";

/// Validates `column:type` tokens and splits them.
///
/// A token is valid when it holds exactly one `:` with text on both sides.
/// The type text is not checked here; `create_table` owns that.
///
/// # Errors
///
/// Returns [`CoreError::MalformedClause`] for the first invalid token.
pub fn parse_column_pairs<S: AsRef<str>>(tokens: &[S]) -> CoreResult<Vec<(String, String)>> {
    tokens
        .iter()
        .map(|token| {
            let token = token.as_ref();
            match token.split_once(':') {
                Some((name, ty)) if !name.is_empty() && !ty.is_empty() && !ty.contains(':') => {
                    Ok((name.to_string(), ty.to_string()))
                }
                _ => Err(CoreError::malformed(token, PAIR_SHAPE)),
            }
        })
        .collect()
}

/// Parses a whitespace separated list of `column=value` pairs.
///
/// Spaces around `=` are ignored, so `age = 30` reads as `age=30`. Values
/// are typed in this order: quoted text, `true`/`false` in any case, base-10
/// integer, plain text.
///
/// # Errors
///
/// Returns [`CoreError::MalformedClause`] if a token has no `=`, has more
/// than one `=` outside quotes, has an empty column name, or leaves a
/// quote open.
pub fn parse_clause(text: &str) -> CoreResult<Clause> {
    let mut clause = Clause::new();
    for token in split_clause_tokens(text)? {
        let (column, value) = token
            .split_once('=')
            .ok_or_else(|| CoreError::malformed(token.as_str(), CLAUSE_SHAPE))?;
        if column.is_empty() || (unquote(value).is_none() && value.contains('=')) {
            return Err(CoreError::malformed(token.as_str(), CLAUSE_SHAPE));
        }
        clause.insert(column, type_value(value));
    }
    debug!(pairs = clause.len(), "parsed clause");
    Ok(clause)
}

/// Parses the `(v1, v2, ...)` payload of an insert.
///
/// Items are split on commas outside quotes and trimmed. Quotes are kept:
/// coercion against the column type happens in the record store.
///
/// # Errors
///
/// Returns [`CoreError::MalformedClause`] if the text is not wrapped in
/// parentheses or a quote is left open.
pub fn parse_value_list(text: &str) -> CoreResult<Vec<String>> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| CoreError::malformed(text.trim(), LIST_SHAPE))?
        .trim();

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in inner.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            ',' => items.push(std::mem::take(&mut current).trim().to_string()),
            '"' | '\'' if current.trim().is_empty() => {
                current.clear();
                current.push(ch);
                quote = Some(ch);
            }
            _ => current.push(ch),
        }
    }

    if quote.is_some() {
        return Err(CoreError::malformed(current.trim(), LIST_SHAPE));
    }
    items.push(current.trim().to_string());
    Ok(items)
}

/// Returns the text between a matching pair of surrounding quotes.
pub(crate) fn unquote(value: &str) -> Option<&str> {
    let first = value.chars().next()?;
    if (first == '"' || first == '\'') && value.len() >= 2 && value.ends_with(first) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

fn type_value(value: &str) -> Literal {
    if let Some(text) = unquote(value) {
        Literal::Str(text.to_string())
    } else if value.eq_ignore_ascii_case("true") {
        Literal::Bool(true)
    } else if value.eq_ignore_ascii_case("false") {
        Literal::Bool(false)
    } else if let Ok(n) = value.parse::<i64>() {
        Literal::Int(n)
    } else {
        Literal::Str(value.to_string())
    }
}

/// Splits clause text on whitespace outside quotes, gluing `a = b` into `a=b`.
fn split_clause_tokens(text: &str) -> CoreResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }

        if ch.is_whitespace() {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            let joins_equals = current.ends_with('=') || chars.peek() == Some(&'=');
            if !joins_equals && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }

        if (ch == '"' || ch == '\'') && (current.is_empty() || current.ends_with('=')) {
            quote = Some(ch);
        }
        current.push(ch);
    }

    if quote.is_some() {
        return Err(CoreError::malformed(current, CLAUSE_SHAPE));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn column_pairs_valid() {
        let pairs = parse_column_pairs(&["name:str", "age:int"]).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "str".to_string()),
                ("age".to_string(), "int".to_string())
            ]
        );
    }

    #[test]
    fn column_pairs_leave_type_checking_to_schema() {
        let pairs = parse_column_pairs(&["score:float"]).unwrap();
        assert_eq!(pairs[0].1, "float");
    }

    #[test]
    fn column_pairs_malformed() {
        for bad in ["name", ":str", "name:", "a:b:c", ":"] {
            let err = parse_column_pairs(&["ok:int", bad]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedClause, "token {bad}");
            assert_eq!(err, CoreError::malformed(bad, "column:type"));
        }
    }

    #[test]
    fn clause_types_values() {
        let clause = parse_clause("name=John age=30 active=true").unwrap();
        assert_eq!(clause.get("name"), Some(&Literal::Str("John".into())));
        assert_eq!(clause.get("age"), Some(&Literal::Int(30)));
        assert_eq!(clause.get("active"), Some(&Literal::Bool(true)));
        assert_eq!(clause.len(), 3);
    }

    #[test]
    fn quoted_value_stays_text() {
        let clause = parse_clause(r#"name="true""#).unwrap();
        assert_eq!(clause.get("name"), Some(&Literal::Str("true".into())));

        let clause = parse_clause("n='42'").unwrap();
        assert_eq!(clause.get("n"), Some(&Literal::Str("42".into())));
    }

    #[test]
    fn bool_is_case_insensitive() {
        let clause = parse_clause("a=TRUE b=False").unwrap();
        assert_eq!(clause.get("a"), Some(&Literal::Bool(true)));
        assert_eq!(clause.get("b"), Some(&Literal::Bool(false)));
    }

    #[test]
    fn negative_int() {
        let clause = parse_clause("delta=-7").unwrap();
        assert_eq!(clause.get("delta"), Some(&Literal::Int(-7)));
    }

    #[test]
    fn spaces_around_equals_are_ignored() {
        let expected = Clause::new().with("age", 30).with("name", "Bob");
        assert_eq!(parse_clause("age = 30 name= Bob").unwrap(), expected);
        assert_eq!(parse_clause("age =30   name =Bob").unwrap(), expected);
    }

    #[test]
    fn quoted_value_may_hold_spaces_and_equals() {
        let clause = parse_clause(r#"name = "John Smith" note='a=b'"#).unwrap();
        assert_eq!(clause.get("name"), Some(&Literal::Str("John Smith".into())));
        assert_eq!(clause.get("note"), Some(&Literal::Str("a=b".into())));
    }

    #[test]
    fn apostrophe_inside_word_is_text() {
        let clause = parse_clause("name=O'Brien").unwrap();
        assert_eq!(clause.get("name"), Some(&Literal::Str("O'Brien".into())));
    }

    #[test]
    fn empty_text_is_empty_clause() {
        assert!(parse_clause("").unwrap().is_empty());
        assert!(parse_clause("   ").unwrap().is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        let clause = parse_clause("a=1 a=2").unwrap();
        assert_eq!(clause.len(), 1);
        assert_eq!(clause.get("a"), Some(&Literal::Int(2)));
    }

    #[test]
    fn malformed_clauses() {
        for bad in ["name", "age30 x=1", "=5", "a=b=c", r#"name="open"#] {
            let err = parse_clause(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedClause, "input {bad}");
        }
    }

    #[test]
    fn malformed_clause_names_the_token() {
        let err = parse_clause("a=1 broken").unwrap_err();
        assert_eq!(err, CoreError::malformed("broken", "column=value"));
    }

    #[test]
    fn value_list_splits_outside_quotes() {
        let values = parse_value_list(r#"("Alice, Jr.", 30, true)"#).unwrap();
        assert_eq!(values, vec![r#""Alice, Jr.""#, "30", "true"]);
    }

    #[test]
    fn value_list_trims_items() {
        let values = parse_value_list("  ( a ,b,  c )  ").unwrap();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn value_list_empty_parens() {
        assert!(parse_value_list("()").unwrap().is_empty());
        assert!(parse_value_list("(  )").unwrap().is_empty());
    }

    #[test]
    fn value_list_requires_parens() {
        for bad in ["1, 2", "(1, 2", "1, 2)", ""] {
            let err = parse_value_list(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedClause, "input {bad}");
        }
    }

    #[test]
    fn value_list_unterminated_quote() {
        let err = parse_value_list(r#"("abc, 1)"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedClause);
    }

    #[test]
    fn unquote_requires_matching_pair() {
        assert_eq!(unquote(r#""abc""#), Some("abc"));
        assert_eq!(unquote("'abc'"), Some("abc"));
        assert_eq!(unquote(r#""""#), Some(""));
        assert_eq!(unquote(r#""abc'"#), None);
        assert_eq!(unquote(r#"""#), None);
        assert_eq!(unquote("abc"), None);
    }
}
