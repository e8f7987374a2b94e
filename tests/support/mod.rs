#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tempfile::TempDir;

/// Five users; Eve has no age and no email. Ages 30, 25, 35, 35 average 31.25.
pub const SAMPLE_SQL: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        age INTEGER,
        email TEXT
    );
    INSERT INTO users (name, age, email) VALUES
        ('Alice', 30, 'alice@example.com'),
        ('Bob', 25, 'bob@example.com'),
        ('Carol', 35, 'carol@test.org'),
        ('Dave', 35, 'dave@example.com'),
        ('Eve', NULL, NULL);

    CREATE TABLE orders (
        id INTEGER PRIMARY KEY,
        user_id INTEGER REFERENCES users (id),
        total REAL,
        note TEXT
    );
    CREATE INDEX idx_orders_user ON orders (user_id);
    INSERT INTO orders (user_id, total, note) VALUES
        (1, 19.99, 'first order'),
        (1, 5.0, NULL),
        (2, 42.5, 'gift for Alice, wrapped');

    CREATE TABLE files (
        id INTEGER PRIMARY KEY,
        name TEXT,
        data BLOB
    );
    INSERT INTO files (name, data) VALUES ('logo.png', x'89504E47');
";

/// SQLite database file in its own temporary directory, removed on drop.
pub struct TempDb {
    dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn with_sql(sql: &str) -> Result<Self> {
        let dir = TempDir::new().context("create temp dir")?;
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).context("create database")?;
        conn.execute_batch(sql).context("seed database")?;
        conn.close().map_err(|(_, err)| err).context("close database")?;
        Ok(Self { dir, path })
    }

    pub fn sample() -> Result<Self> {
        Self::with_sql(SAMPLE_SQL)
    }

    /// Valid database with no tables.
    pub fn empty() -> Result<Self> {
        Self::with_sql("PRAGMA user_version = 1;")
    }

    /// Sample database with free pages left behind by a dropped table.
    pub fn fragmented() -> Result<Self> {
        let db = Self::sample()?;
        db.execute(
            "CREATE TABLE filler (payload TEXT);
             WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 500)
             INSERT INTO filler SELECT hex(randomblob(200)) FROM n;
             DROP TABLE filler;",
        )?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn execute(&self, sql: &str) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).context("read database file")
    }
}

/// Minimal CSV reader for checking exports: quoted fields, doubled quotes,
/// `\n` record endings.
pub fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if field.is_empty() => quoted = true,
            (',', false) => record.push(std::mem::take(&mut field)),
            ('\n', false) => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            (other, _) => field.push(other),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}
