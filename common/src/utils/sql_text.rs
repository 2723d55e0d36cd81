//! Textual helpers for SQL statements.
//!
//! Nothing here parses SQL. Statements are inspected and rewritten as plain
//! text, which is all the console needs.

use crate::models::query::RowLimit;

/// Helpers operating on raw statement text.
pub struct SqlText;

impl SqlText {
    /// Checks if the statement starts with `select` (case-insensitive).
    pub fn is_select(sql: &str) -> bool {
        sql.trim_start()
            .get(..6)
            .is_some_and(|head| head.eq_ignore_ascii_case("select"))
    }

    /// Returns the statement that is actually sent to the server.
    ///
    /// `select` statements get ` LIMIT <n>` appended when a limit is chosen.
    /// Trailing semicolons are dropped first, and a statement that already
    /// ends in a `LIMIT` clause is left alone. Anything else is returned
    /// unmodified.
    pub fn with_row_limit(sql: &str, limit: RowLimit) -> String {
        let Some(rows) = limit.rows() else {
            return sql.to_string();
        };
        if !Self::is_select(sql) {
            return sql.to_string();
        }

        let statement = sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        if Self::has_trailing_limit(statement) {
            return statement.to_string();
        }
        format!("{} LIMIT {}", statement, rows)
    }

    /// Checks whether the statement ends with `LIMIT n`, `LIMIT n, m` or
    /// `LIMIT n OFFSET m`.
    pub fn has_trailing_limit(sql: &str) -> bool {
        let tokens: Vec<&str> = sql.split_whitespace().collect();
        let Some(pos) = tokens.iter().rposition(|t| t.eq_ignore_ascii_case("limit")) else {
            return false;
        };
        let tail = &tokens[pos + 1..];
        !tail.is_empty()
            && tail.iter().all(|t| {
                t.eq_ignore_ascii_case("offset")
                    || t.split(',')
                        .all(|part| part.is_empty() || part.chars().all(|c| c.is_ascii_digit()))
            })
            && tail.iter().any(|t| t.chars().any(|c| c.is_ascii_digit()))
    }

    /// Checks whether the leading keyword is one that answers with a result
    /// set.
    pub fn returns_rows(sql: &str) -> bool {
        const KEYWORDS: [&str; 14] = [
            "SELECT", "WITH", "TABLE", "VALUES", "SHOW", "DESC", "DESCRIBE", "EXPLAIN", "HELP",
            "CHECK", "CHECKSUM", "ANALYZE", "OPTIMIZE", "REPAIR",
        ];
        sql.split(|c: char| c.is_whitespace() || c == '(' || c == ';')
            .find(|word| !word.is_empty())
            .is_some_and(|word| KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word)))
    }

    /// Renders an identifier for statement text.
    ///
    /// Always wrapped in backticks, with embedded backticks doubled, so
    /// reserved words such as `order` stay valid names.
    pub fn identifier(name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }
}
