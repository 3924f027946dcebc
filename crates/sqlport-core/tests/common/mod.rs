#![allow(dead_code)]

use std::collections::BTreeMap;

use sqlport_core::{parse_create_table, parse_create_table_with_dialect, Dialect, SqlTable};

/// Two related Oracle tables with a sequence, storage clauses and comments.
pub const ORACLE_SCHEMA: &str = "\
-- Customer schema
CREATE SEQUENCE customers_seq START WITH 1;

CREATE TABLE customers (
    id NUMBER(19) DEFAULT customers_seq.NEXTVAL,
    email VARCHAR2(200) NOT NULL,
    status CHAR(1) DEFAULT 'A',
    created_at DATE DEFAULT SYSDATE,
    CONSTRAINT pk_customers PRIMARY KEY (id)
) TABLESPACE users PCTFREE 10;

CREATE TABLE orders (
    id NUMBER(10),
    customer_id NUMBER(19) NOT NULL,
    total NUMBER(10,2) DEFAULT 0,
    notes CLOB,
    PRIMARY KEY (id),
    CONSTRAINT fk_orders_customer FOREIGN KEY (customer_id) REFERENCES customers (id)
);
";

/// A MySQL table using `ENUM`, `TINYINT(1)` and `JSON`.
pub const MYSQL_SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS events (
    id BIGINT NOT NULL,
    kind ENUM('click', 'view') NOT NULL,
    active TINYINT(1) DEFAULT 1,
    payload JSON,
    happened DATETIME,
    PRIMARY KEY (id)
);
";

/// A PL/SQL procedure with anchored, IN OUT and OUT parameters.
pub const ORACLE_PROCEDURE: &str = "\
CREATE OR REPLACE PROCEDURE hr.SP_UPDATE_USER_EMAIL (
    p_user_id   IN  users.id%TYPE,
    p_email     IN  VARCHAR2,
    p_count     IN OUT NUMBER,
    p_updated   OUT DATE
) AS
BEGIN
    UPDATE users SET email = p_email WHERE id = p_user_id;
    p_count := p_count + 1;
    p_updated := SYSDATE;
END;
";

pub fn parse_one(sql: &str) -> SqlTable {
    let mut tables = parse_create_table(sql);
    assert_eq!(tables.len(), 1, "Expected one table in: {sql}");
    tables.remove(0)
}

pub fn parse_oracle(sql: &str) -> Vec<SqlTable> {
    parse_create_table_with_dialect(sql, Dialect::Oracle)
}

pub fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn names(tables: &[SqlTable]) -> Vec<&str> {
    tables.iter().map(|t| t.name.as_str()).collect()
}
