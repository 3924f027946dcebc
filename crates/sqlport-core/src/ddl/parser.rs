//! Recursive-descent parser for `CREATE TABLE` and `CREATE INDEX`.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::ParseError;
use crate::lexer::{Cursor, Keyword, Lexer, Span, Token, TokenKind};
use crate::schema::{Column, ForeignKey, SqlTable};

/// A statement the parser keeps.
enum Statement {
    Table(SqlTable),
    Index { name: String, table: String },
}

/// A table-level constraint fragment.
enum Constraint {
    PrimaryKey(Vec<String>),
    ForeignKey {
        columns: Vec<String>,
        table: String,
        references: Vec<String>,
    },
    Unique(Vec<String>),
    Check,
}

/// DDL parser over one script.
pub struct DdlParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    dialect: Dialect,
}

impl<'a> DdlParser<'a> {
    /// Tokenizes `source`. Tables are tagged with `dialect`.
    #[must_use]
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).tokenize(),
            dialect,
        }
    }

    /// Parses every table in the script, in order of appearance.
    ///
    /// Never fails: a statement that cannot be parsed is skipped and parsing
    /// resumes after its `CREATE` keyword.
    #[must_use]
    pub fn parse(&self) -> Vec<SqlTable> {
        let mut cursor = Cursor::new(self.source, &self.tokens);
        let mut tables = Vec::new();
        let mut indexes = Vec::new();

        while !cursor.is_eof() {
            if !cursor.check_keyword(Keyword::Create) {
                cursor.advance();
                continue;
            }
            let start = cursor.position();
            match self.parse_create(&mut cursor) {
                Ok(Some(Statement::Table(table))) => tables.push(table),
                Ok(Some(Statement::Index { name, table })) => indexes.push((name, table)),
                Ok(None) => {}
                Err(err) => {
                    debug!(error = %err, "skipping unparseable CREATE statement");
                    cursor.seek(start + 1);
                }
            }
        }

        attach_indexes(&mut tables, indexes);
        resolve_references(&mut tables);
        debug!(tables = tables.len(), "parsed DDL");
        tables
    }

    /// Parses a `CREATE ...` statement. Returns `None` for statements other
    /// than tables and indexes.
    fn parse_create(&self, c: &mut Cursor<'a, '_>) -> Result<Option<Statement>, ParseError> {
        let start = c.peek().span;
        c.expect_keyword(Keyword::Create)?;
        if c.eat_keyword(Keyword::Or) {
            c.expect_keyword(Keyword::Replace)?;
        }
        c.eat_keyword(Keyword::Global);
        c.eat_keyword(Keyword::Temporary);

        if c.eat_keyword(Keyword::Table) {
            return self
                .parse_table(c, start)
                .map(|table| Some(Statement::Table(table)));
        }

        c.eat_keyword(Keyword::Unique);
        if c.check_word("BITMAP") {
            c.advance();
        }
        if c.eat_keyword(Keyword::Index) {
            return parse_index(c).map(Some);
        }
        Ok(None)
    }

    /// Parses `[IF NOT EXISTS] name ( body )` after `CREATE TABLE`.
    fn parse_table(&self, c: &mut Cursor<'a, '_>, start: Span) -> Result<SqlTable, ParseError> {
        if c.eat_keyword(Keyword::If) {
            c.expect_keyword(Keyword::Not)?;
            c.expect_keyword(Keyword::Exists)?;
        }
        let name = c.expect_qualified_name("table name")?;
        let (parts, close) = c.split_group()?;

        let mut table = SqlTable::new(name, self.dialect);
        table.original_sql = start.to(close).slice(self.source).to_string();

        let mut table_primary_key = None;
        let mut unique_columns = Vec::new();
        for (from, to) in parts {
            let tokens = c.tokens(from, to);
            let mut fragment = Cursor::new(self.source, tokens);
            let is_constraint = fragment
                .peek()
                .as_keyword()
                .is_some_and(|kw| kw.starts_constraint());

            if is_constraint {
                match parse_constraint(&mut fragment) {
                    Ok(Constraint::PrimaryKey(columns)) => {
                        if table_primary_key.is_none() {
                            table_primary_key = columns.into_iter().next();
                        }
                    }
                    Ok(Constraint::ForeignKey {
                        columns,
                        table: references_table,
                        references,
                    }) => {
                        for (i, column) in columns.into_iter().enumerate() {
                            table.foreign_keys.push(ForeignKey {
                                column,
                                references_table: references_table.clone(),
                                references_column: references.get(i).cloned().unwrap_or_default(),
                            });
                        }
                    }
                    Ok(Constraint::Unique(columns)) => {
                        if let [column] = columns.as_slice() {
                            unique_columns.push(column.clone());
                        }
                    }
                    Ok(Constraint::Check) => {}
                    Err(err) => {
                        debug!(table = %table.name, error = %err, "skipping constraint");
                    }
                }
                continue;
            }

            match parse_column(&mut fragment) {
                Ok((column, reference)) => {
                    table.foreign_keys.extend(reference);
                    table.columns.push(column);
                }
                Err(err) => {
                    debug!(table = %table.name, error = %err, "skipping column fragment");
                }
            }
        }

        for name in unique_columns {
            if let Some(column) = table
                .columns
                .iter_mut()
                .find(|column| column.name.eq_ignore_ascii_case(&name))
            {
                column.is_unique = true;
            }
        }
        table.primary_key = table_primary_key.or_else(|| {
            table
                .columns
                .iter()
                .find(|column| column.is_primary_key)
                .map(|column| column.name.clone())
        });
        Ok(table)
    }
}

/// Parses a column definition: `name type [attributes]`.
fn parse_column(c: &mut Cursor<'_, '_>) -> Result<(Column, Option<ForeignKey>), ParseError> {
    let name = c.expect_word("column name")?;
    let data_type = parse_data_type(c)?;
    let mut column = Column::new(name, data_type);
    let mut reference = None;

    while !c.is_eof() {
        match c.peek().as_keyword() {
            Some(Keyword::Not) if c.peek_at(1).is_keyword(Keyword::Null) => {
                column.nullable = false;
                c.advance();
                c.advance();
            }
            Some(Keyword::Primary) if c.peek_at(1).is_keyword(Keyword::Key) => {
                column.is_primary_key = true;
                c.advance();
                c.advance();
            }
            Some(Keyword::Unique) => {
                column.is_unique = true;
                c.advance();
            }
            Some(Keyword::Default) => {
                c.advance();
                column.default = Some(parse_default(c)?);
            }
            Some(Keyword::References) => {
                c.advance();
                let references_table = c.expect_qualified_name("referenced table")?;
                let references_column = if c.check(&TokenKind::LeftParen) {
                    c.expect_name_list()?.into_iter().next().unwrap_or_default()
                } else {
                    String::new()
                };
                reference = Some(ForeignKey {
                    column: column.name.clone(),
                    references_table,
                    references_column,
                });
            }
            Some(Keyword::Constraint) => {
                c.advance();
                c.expect_word("constraint name")?;
            }
            _ if c.check(&TokenKind::LeftParen) => {
                c.skip_group()?;
            }
            _ => c.advance(),
        }
    }
    Ok((column, reference))
}

/// Words that may continue a multi-word type after `base`.
fn type_suffixes(base: &str) -> &'static [&'static str] {
    match base {
        "DOUBLE" => &["PRECISION"],
        "LONG" => &["RAW"],
        "CHARACTER" => &["VARYING"],
        "TIMESTAMP" | "TIME" => &["WITH", "WITHOUT", "LOCAL", "TIME", "ZONE"],
        "INTERVAL" => &["YEAR", "MONTH", "DAY", "SECOND", "TO"],
        _ => &[],
    }
}

/// Parses a type name with its argument lists and returns it verbatim.
fn parse_data_type(c: &mut Cursor<'_, '_>) -> Result<String, ParseError> {
    if !matches!(
        c.peek().kind,
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
    ) {
        return Err(c.unexpected("data type"));
    }
    let start = c.peek().span.start;
    let base = c.expect_word("data type")?.to_ascii_uppercase();
    let suffixes = type_suffixes(&base);
    loop {
        if c.check(&TokenKind::LeftParen) {
            c.skip_group()?;
        } else if suffixes.iter().any(|word| c.check_word(word)) {
            c.advance();
        } else {
            break;
        }
    }
    let end = c.previous().span.end;
    Ok(Span::new(start, end).slice(c.source()).to_string())
}

/// Parses the expression after `DEFAULT`: one token or parenthesised group,
/// extended by directly adjacent tokens (`-1`, `seq.NEXTVAL`, `SYS_GUID()`).
fn parse_default(c: &mut Cursor<'_, '_>) -> Result<String, ParseError> {
    if c.is_eof() {
        return Err(c.unexpected("default value"));
    }
    let start = c.peek().span;
    let mut end = start;
    if c.check(&TokenKind::LeftParen) {
        end = c.skip_group()?;
    } else {
        c.advance();
    }
    while !c.is_eof() && c.peek().span.start == end.end {
        if c.check(&TokenKind::LeftParen) {
            end = c.skip_group()?;
        } else {
            end = c.peek().span;
            c.advance();
        }
    }
    Ok(start.to(end).slice(c.source()).to_string())
}

/// Parses a table-level constraint fragment.
fn parse_constraint(c: &mut Cursor<'_, '_>) -> Result<Constraint, ParseError> {
    if c.eat_keyword(Keyword::Constraint) {
        c.expect_word("constraint name")?;
    }
    match c.peek().as_keyword() {
        Some(Keyword::Primary) => {
            c.advance();
            c.expect_keyword(Keyword::Key)?;
            Ok(Constraint::PrimaryKey(c.expect_name_list()?))
        }
        Some(Keyword::Foreign) => {
            c.advance();
            c.expect_keyword(Keyword::Key)?;
            let columns = c.expect_name_list()?;
            c.expect_keyword(Keyword::References)?;
            let table = c.expect_qualified_name("referenced table")?;
            let references = if c.check(&TokenKind::LeftParen) {
                c.expect_name_list()?
            } else {
                Vec::new()
            };
            Ok(Constraint::ForeignKey {
                columns,
                table,
                references,
            })
        }
        Some(Keyword::Unique) => {
            c.advance();
            if !c.eat_keyword(Keyword::Key) {
                c.eat_keyword(Keyword::Index);
            }
            if !c.check(&TokenKind::LeftParen) {
                c.expect_word("constraint name")?;
            }
            Ok(Constraint::Unique(c.expect_name_list()?))
        }
        Some(Keyword::Check) => Ok(Constraint::Check),
        _ => Err(c.unexpected("PRIMARY KEY, FOREIGN KEY, UNIQUE or CHECK")),
    }
}

/// Parses `[IF NOT EXISTS] name ON table ( ... )` after `CREATE INDEX`.
fn parse_index(c: &mut Cursor<'_, '_>) -> Result<Statement, ParseError> {
    if c.eat_keyword(Keyword::If) {
        c.expect_keyword(Keyword::Not)?;
        c.expect_keyword(Keyword::Exists)?;
    }
    let name = c.expect_qualified_name("index name")?;
    c.expect_keyword(Keyword::On)?;
    let table = c.expect_qualified_name("table name")?;
    c.skip_group()?;
    Ok(Statement::Index { name, table })
}

fn unqualified(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn same_table(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || unqualified(a).eq_ignore_ascii_case(unqualified(b))
}

fn attach_indexes(tables: &mut [SqlTable], indexes: Vec<(String, String)>) {
    for (name, on) in indexes {
        match tables.iter_mut().find(|table| same_table(&table.name, &on)) {
            Some(table) => table.indexes.push(name),
            None => debug!(index = %name, table = %on, "index on a table not in this script"),
        }
    }
}

/// Column assumed for `REFERENCES t` when `t` is not declared in the script.
const DEFAULT_REFERENCED_COLUMN: &str = "id";

/// Fills in the referenced column of `REFERENCES t` clauses that named no
/// column, using the primary key of `t` when it is in the same script and
/// [`DEFAULT_REFERENCED_COLUMN`] otherwise.
fn resolve_references(tables: &mut [SqlTable]) {
    let primary_keys: Vec<(String, Option<String>)> = tables
        .iter()
        .map(|table| (table.name.clone(), table.primary_key.clone()))
        .collect();
    for table in tables.iter_mut() {
        for fk in &mut table.foreign_keys {
            if !fk.references_column.is_empty() {
                continue;
            }
            let primary_key = primary_keys
                .iter()
                .find(|(name, _)| same_table(name, &fk.references_table))
                .and_then(|(_, pk)| pk.as_deref());
            fk.references_column = primary_key
                .unwrap_or(DEFAULT_REFERENCED_COLUMN)
                .to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ddl::{parse_create_table, parse_create_table_with_dialect};
    use crate::dialect::Dialect;
    use crate::schema::ForeignKey;

    #[test]
    fn test_orders_table() {
        let tables = parse_create_table(
            "CREATE TABLE orders (order_id NUMBER PRIMARY KEY, customer_id NUMBER NOT NULL, \
             total NUMBER(10,2) DEFAULT 0)",
        );
        assert_eq!(tables.len(), 1);
        let orders = &tables[0];
        assert_eq!(orders.name, "orders");
        assert_eq!(orders.columns.len(), 3);
        assert_eq!(orders.primary_key.as_deref(), Some("order_id"));
        assert!(orders.columns[0].is_primary_key);
        assert!(!orders.columns[1].nullable);
        assert!(orders.columns[2].nullable);
        assert_eq!(orders.columns[2].data_type, "NUMBER(10,2)");
        assert_eq!(orders.columns[2].default.as_deref(), Some("0"));
        assert_eq!(orders.dialect, Dialect::PostgreSql);
    }

    #[test]
    fn test_no_statement_yields_empty() {
        assert!(parse_create_table("SELECT 1 FROM dual").is_empty());
        assert!(parse_create_table("").is_empty());
        assert!(parse_create_table("CREATE SEQUENCE s START WITH 1").is_empty());
    }

    #[test]
    fn test_table_level_primary_key_wins() {
        let tables = parse_create_table(
            "CREATE TABLE t (a NUMBER PRIMARY KEY, b NUMBER, c NUMBER, PRIMARY KEY (b, c))",
        );
        assert_eq!(tables[0].columns.len(), 3);
        assert_eq!(tables[0].primary_key.as_deref(), Some("b"));
    }

    #[test]
    fn test_foreign_keys_are_all_kept() {
        let tables = parse_create_table(
            "CREATE TABLE order_items (
                id NUMBER,
                order_id NUMBER,
                product_id NUMBER,
                CONSTRAINT pk_items PRIMARY KEY (id),
                CONSTRAINT fk_order FOREIGN KEY (order_id) REFERENCES orders (order_id),
                FOREIGN KEY (product_id) REFERENCES products(id)
            )",
        );
        let table = &tables[0];
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.primary_key.as_deref(), Some("id"));
        assert_eq!(
            table.foreign_keys,
            vec![
                ForeignKey {
                    column: "order_id".into(),
                    references_table: "orders".into(),
                    references_column: "order_id".into(),
                },
                ForeignKey {
                    column: "product_id".into(),
                    references_table: "products".into(),
                    references_column: "id".into(),
                },
            ]
        );
    }

    #[test]
    fn test_nested_commas_do_not_split_columns() {
        let tables = parse_create_table(
            "CREATE TABLE t (
                price NUMBER(10,2) CHECK (price IN (1, 2, 3)),
                status VARCHAR2(10) DEFAULT 'A,B',
                CHECK (price > 0)
            )",
        );
        let table = &tables[0];
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].data_type, "NUMBER(10,2)");
        assert_eq!(table.columns[1].default.as_deref(), Some("'A,B'"));
    }

    #[test]
    fn test_defaults() {
        let tables = parse_create_table(
            "CREATE TABLE t (
                a DATE DEFAULT SYSDATE NOT NULL,
                b NUMBER DEFAULT -1,
                c RAW(16) DEFAULT SYS_GUID(),
                d NUMBER DEFAULT (0),
                e NUMBER DEFAULT t_seq.NEXTVAL
            )",
        );
        let defaults: Vec<Option<&str>> = tables[0]
            .columns
            .iter()
            .map(|c| c.default.as_deref())
            .collect();
        assert_eq!(
            defaults,
            vec![
                Some("SYSDATE"),
                Some("-1"),
                Some("SYS_GUID()"),
                Some("(0)"),
                Some("t_seq.NEXTVAL")
            ]
        );
        assert!(!tables[0].columns[0].nullable);
    }

    #[test]
    fn test_multi_word_types() {
        let tables = parse_create_table(
            "CREATE TABLE t (
                a TIMESTAMP(6) WITH LOCAL TIME ZONE NOT NULL,
                b DOUBLE PRECISION,
                c LONG RAW,
                d INTERVAL DAY(2) TO SECOND(6),
                e CHARACTER VARYING(20)
            )",
        );
        let types: Vec<&str> = tables[0]
            .columns
            .iter()
            .map(|c| c.data_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                "TIMESTAMP(6) WITH LOCAL TIME ZONE",
                "DOUBLE PRECISION",
                "LONG RAW",
                "INTERVAL DAY(2) TO SECOND(6)",
                "CHARACTER VARYING(20)"
            ]
        );
        assert!(!tables[0].columns[0].nullable);
    }

    #[test]
    fn test_multiple_statements_and_name_forms() {
        let sql = "CREATE TABLE IF NOT EXISTS hr.employees (id INT);\n\
                   create global temporary table \"Session Data\" (key VARCHAR2(10));\n\
                   CREATE OR REPLACE PROCEDURE p IS BEGIN NULL; END;";
        let tables = parse_create_table_with_dialect(sql, Dialect::Oracle);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "hr.employees");
        assert_eq!(tables[1].name, "Session Data");
        assert_eq!(tables[1].columns[0].name, "key");
        assert_eq!(tables[1].dialect, Dialect::Oracle);
    }

    #[test]
    fn test_original_sql_is_verbatim() {
        let sql = "-- orders\nCREATE TABLE orders (\n  id NUMBER\n) TABLESPACE users;";
        let tables = parse_create_table(sql);
        assert_eq!(tables[0].original_sql, "CREATE TABLE orders (\n  id NUMBER\n)");
    }

    #[test]
    fn test_unbalanced_statement_is_skipped() {
        let tables = parse_create_table("CREATE TABLE broken (id NUMBER(10;");
        assert!(tables.is_empty());

        let tables = parse_create_table("CREATE TABLE AS; CREATE TABLE ok (id NUMBER)");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "ok");
    }

    #[test]
    fn test_odd_fragments_are_skipped() {
        let tables = parse_create_table("CREATE TABLE t (id NUMBER, 42, NOT NULL, name TEXT)");
        let names: Vec<&str> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn test_inline_references_and_unique() {
        let tables = parse_create_table(
            "CREATE TABLE customers (id NUMBER PRIMARY KEY, email VARCHAR2(200));
             CREATE TABLE orders (
                id NUMBER PRIMARY KEY,
                customer_id NUMBER REFERENCES customers,
                code VARCHAR2(10) UNIQUE,
                UNIQUE (customer_id)
             );",
        );
        let orders = &tables[1];
        assert_eq!(
            orders.foreign_keys,
            vec![ForeignKey {
                column: "customer_id".into(),
                references_table: "customers".into(),
                references_column: "id".into(),
            }]
        );
        assert!(orders.column("code").unwrap().is_unique);
        assert!(orders.column("customer_id").unwrap().is_unique);
    }

    #[test]
    fn test_references_to_undeclared_table_default_to_id() {
        let tables = parse_create_table(
            "CREATE TABLE a (
                id NUMBER PRIMARY KEY,
                b_id NUMBER REFERENCES b,
                c_code VARCHAR2(5),
                FOREIGN KEY (c_code) REFERENCES c
             );",
        );
        let fks = &tables[0].foreign_keys;
        assert_eq!(fks.len(), 2);
        assert!(fks.iter().all(|fk| fk.references_column == "id"), "{fks:?}");
        assert_eq!(fks[0].references_table, "b");
    }

    #[test]
    fn test_indexes_are_attached() {
        let tables = parse_create_table(
            "CREATE TABLE hr.orders (id NUMBER);
             CREATE INDEX idx_orders_id ON orders (id);
             CREATE UNIQUE INDEX hr.uq_orders ON hr.orders (id);
             CREATE INDEX idx_other ON other (x);",
        );
        assert_eq!(tables[0].indexes, vec!["idx_orders_id", "hr.uq_orders"]);
    }
}
