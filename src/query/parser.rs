//! Request parser
//!
//! Turns one request line into exactly one `Command`. Malformed input is
//! itself a result value (`Command::Invalid`), never an error or a panic.
//!
//! The INSERT payload is handed to serde_json whole instead of being
//! whitespace-split: a row literal may contain spaces, so the request is
//! only tokenized up to the table name and the remainder goes to the JSON
//! decoder as-is.

use std::iter::Peekable;

use serde_json::Value;

use super::command::{Command, Condition, Direction, Operator, OrderBy};

/// Parse one trimmed request line into a Command
pub fn parse(request: &str) -> Command {
    let request = request.trim();
    if request.is_empty() {
        return invalid("empty request");
    }

    if let Some(rest) = strip_keyword(request, "CREATE") {
        return parse_create(rest);
    }
    if let Some(rest) = strip_keyword(request, "INSERT") {
        return parse_insert(rest);
    }
    if let Some(rest) = strip_keyword(request, "SELECT") {
        return parse_select(rest);
    }
    if let Some(rest) = strip_keyword(request, "DELETE") {
        return parse_delete(rest);
    }
    if let Some(rest) = strip_keyword(request, "SHOW") {
        return parse_show(rest);
    }

    invalid(format!("unrecognized command: {request}"))
}

fn invalid(reason: impl Into<String>) -> Command {
    Command::Invalid {
        reason: reason.into(),
    }
}

// =============================================================================
// Per-command parsers
// =============================================================================

fn parse_create(rest: &str) -> Command {
    let Some(rest) = strip_keyword(rest, "TABLE") else {
        return invalid("expected TABLE after CREATE");
    };
    match table_name(rest) {
        Ok(table) => Command::CreateTable { table },
        Err(command) => command,
    }
}

fn parse_delete(rest: &str) -> Command {
    let Some(rest) = strip_keyword(rest, "TABLE") else {
        return invalid("expected TABLE after DELETE");
    };
    match table_name(rest) {
        Ok(table) => Command::DeleteTable { table },
        Err(command) => command,
    }
}

fn parse_show(rest: &str) -> Command {
    if rest.trim().eq_ignore_ascii_case("TABLES") {
        Command::ShowTables
    } else {
        invalid("expected TABLES after SHOW")
    }
}

fn parse_insert(rest: &str) -> Command {
    let Some(rest) = strip_keyword(rest, "INTO") else {
        return invalid("expected INTO after INSERT");
    };
    let (name, payload) = split_token(rest);
    if name.is_empty() {
        return invalid("INSERT INTO is missing a table name");
    }
    if payload.is_empty() {
        return invalid("INSERT INTO is missing a row payload");
    }
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(row)) => Command::Insert {
            table: name.to_string(),
            row,
        },
        Ok(other) => invalid(format!("row payload must be a JSON object, got: {other}")),
        Err(e) => invalid(format!("row payload is not valid JSON: {e}")),
    }
}

fn parse_select(rest: &str) -> Command {
    let Some(rest) = strip_keyword(rest, "*") else {
        return invalid("expected * after SELECT");
    };
    let Some(rest) = strip_keyword(rest, "FROM") else {
        return invalid("expected FROM after SELECT *");
    };
    let (name, clauses) = split_token(rest);
    if name.is_empty() {
        return invalid("SELECT is missing a table name");
    }

    let mut tokens = clauses.split_whitespace().peekable();
    let mut conditions = Vec::new();
    let mut order_by = None;
    let mut limit = None;

    if next_is(&mut tokens, "WHERE") {
        loop {
            let Some(condition) = parse_condition(&mut tokens) else {
                return invalid("WHERE clause must be <column> <operator> <value> triples");
            };
            conditions.push(condition);
            if !next_is(&mut tokens, "AND") {
                break;
            }
        }
    }

    if next_is(&mut tokens, "ORDER") {
        if !next_is(&mut tokens, "BY") {
            return invalid("expected BY after ORDER");
        }
        let Some(column) = tokens.next() else {
            return invalid("ORDER BY is missing a column");
        };
        let direction = parse_direction(&mut tokens, column);
        order_by = Some(OrderBy {
            column: column.to_string(),
            direction,
        });
    }

    if next_is(&mut tokens, "LIMIT") {
        let Some(count) = tokens.next() else {
            return invalid("LIMIT is missing a count");
        };
        match count.parse::<usize>() {
            Ok(n) => limit = Some(n),
            Err(_) => {
                return invalid(format!(
                    "LIMIT count must be a non-negative integer, got: {count}"
                ))
            }
        }
    }

    if let Some(extra) = tokens.next() {
        return invalid(format!("unexpected input after query: {extra}"));
    }

    Command::Select {
        table: name.to_string(),
        conditions,
        order_by,
        limit,
    }
}

// =============================================================================
// Clause helpers
// =============================================================================

fn parse_condition<'a, I>(tokens: &mut Peekable<I>) -> Option<Condition>
where
    I: Iterator<Item = &'a str>,
{
    let column = tokens.next()?;
    let op = Operator::from_token(tokens.next()?)?;
    let value = parse_literal(tokens.next()?);
    Some(Condition {
        column: column.to_string(),
        op,
        value,
    })
}

fn parse_direction<'a, I>(tokens: &mut Peekable<I>, column: &str) -> Direction
where
    I: Iterator<Item = &'a str>,
{
    match tokens.peek() {
        None => Direction::Ascending,
        Some(t) if t.eq_ignore_ascii_case("ASC") => {
            tokens.next();
            Direction::Ascending
        }
        Some(t) if t.eq_ignore_ascii_case("DESC") => {
            tokens.next();
            Direction::Descending
        }
        // LIMIT starts the next clause, not a direction token
        Some(t) if t.eq_ignore_ascii_case("LIMIT") => Direction::Ascending,
        Some(t) => {
            tracing::warn!(
                column = %column,
                token = %t,
                "unrecognized ORDER BY direction, defaulting to ascending"
            );
            tokens.next();
            Direction::Ascending
        }
    }
}

/// Lex a WHERE literal: integer when it parses as one, string otherwise.
/// Quoted literals (single or double) always compare as the bare string.
fn parse_literal(token: &str) -> Value {
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return Value::String(token[1..token.len() - 1].to_string());
        }
    }
    match token.parse::<i64>() {
        Ok(n) => Value::Number(n.into()),
        Err(_) => Value::String(token.to_string()),
    }
}

// =============================================================================
// Tokenization helpers
// =============================================================================

/// Case-insensitively strip a leading keyword and the whitespace after it.
/// The keyword must end at a word boundary: `SELECT *FROM t` does not match.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let input = input.trim_start();
    let head = input.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &input[keyword.len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Split off the first whitespace-delimited token, returning it and the
/// trimmed remainder
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn table_name(rest: &str) -> std::result::Result<String, Command> {
    let (name, trailing) = split_token(rest);
    if name.is_empty() {
        return Err(invalid("missing table name"));
    }
    if !trailing.is_empty() {
        return Err(invalid(format!(
            "unexpected input after table name: {trailing}"
        )));
    }
    Ok(name.to_string())
}

fn next_is<'a, I>(tokens: &mut Peekable<I>, keyword: &str) -> bool
where
    I: Iterator<Item = &'a str>,
{
    if tokens
        .peek()
        .map_or(false, |t| t.eq_ignore_ascii_case(keyword))
    {
        tokens.next();
        true
    } else {
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
