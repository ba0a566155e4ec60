use crate::registration::{Category, Course};
use anyhow::{anyhow, Context};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub const DB_FILE: &str = "ffcs.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)
        .with_context(|| format!("failed to create workspace {}", workspace.to_string_lossy()))?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.to_string_lossy()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            credits INTEGER NOT NULL,
            faculty TEXT NOT NULL,
            slot TEXT NOT NULL,
            venue TEXT NOT NULL,
            enrolled INTEGER NOT NULL DEFAULT 0,
            capacity INTEGER NOT NULL DEFAULT 0,
            category TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_courses_sort ON courses(sort_order)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value_json TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

/// Courses in catalog order.
pub fn load_courses(conn: &Connection) -> anyhow::Result<Vec<Course>> {
    let mut stmt = conn.prepare(
        "SELECT code, name, credits, faculty, slot, venue, enrolled, capacity, category
         FROM courses
         ORDER BY sort_order, code",
    )?;
    let rows = stmt
        .query_map([], |r| {
            Ok((
                Course {
                    code: r.get(0)?,
                    name: r.get(1)?,
                    credits: r.get(2)?,
                    faculty: r.get(3)?,
                    slot: r.get(4)?,
                    venue: r.get(5)?,
                    enrolled: r.get(6)?,
                    capacity: r.get(7)?,
                    category: Category::Core,
                },
                r.get::<_, String>(8)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(mut course, category)| {
            course.category = category
                .parse::<Category>()
                .map_err(|e| anyhow!("course {}: {}", course.code, e))?;
            Ok(course)
        })
        .collect()
}

/// Replaces the stored catalog wholesale. Sort order follows `courses`.
pub fn replace_courses(conn: &Connection, courses: &[Course]) -> anyhow::Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM courses", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO courses(
                code, name, credits, faculty, slot, venue, enrolled, capacity, category, sort_order
             ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        for (i, c) in courses.iter().enumerate() {
            stmt.execute((
                &c.code,
                &c.name,
                c.credits,
                &c.faculty,
                &c.slot,
                &c.venue,
                c.enrolled,
                c.capacity,
                c.category.as_str(),
                i as i64,
            ))
            .with_context(|| format!("failed to insert course {}", c.code))?;
        }
    }
    tx.commit()?;
    Ok(courses.len())
}

pub fn settings_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value_json FROM settings WHERE key = ?",
            [key],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => Ok(Some(
            serde_json::from_str(&s).with_context(|| format!("bad settings value for {}", key))?,
        )),
        None => Ok(None),
    }
}

pub fn settings_set_json(
    conn: &Connection,
    key: &str,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value_json) VALUES(?, ?)
         ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
        (key, value.to_string()),
    )?;
    Ok(())
}
