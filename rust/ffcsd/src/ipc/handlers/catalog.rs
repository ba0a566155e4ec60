use crate::catalog::Catalog;
use crate::db;
use crate::ipc::error::ok;
use crate::ipc::helpers::{course_json, db_err, get_optional_str, require_db, session_for, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::registration::{filter_catalog, CategoryFilter, Course};
use crate::roles::Operation;
use serde_json::json;

fn catalog_filter(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = session_for(state, params, Operation::FilterCatalog)?;
    let search = get_optional_str(params, "search")?.unwrap_or("");
    let category = match get_optional_str(params, "category")? {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|e| HandlerErr::new("bad_params", e))?,
        None => CategoryFilter::All,
    };

    let courses: Vec<serde_json::Value> =
        filter_catalog(session.catalog.courses(), search, category)
            .map(course_json)
            .collect();
    Ok(json!({ "courses": courses }))
}

fn catalog_stats(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = session_for(state, params, Operation::ViewCourseStats)?;
    let courses = session.catalog.courses();

    let rows: Vec<serde_json::Value> = courses
        .iter()
        .map(|c| {
            json!({
                "code": c.code,
                "name": c.name,
                "faculty": c.faculty,
                "slot": c.slot,
                "enrolled": c.enrolled,
                "capacity": c.capacity,
                "seatsLeft": c.seats_left(),
                "fillPercent": c.fill_percent(),
            })
        })
        .collect();
    let total_enrolled: u64 = courses.iter().map(|c| u64::from(c.enrolled)).sum();
    let total_capacity: u64 = courses.iter().map(|c| u64::from(c.capacity)).sum();

    Ok(json!({
        "courses": rows,
        "courseCount": courses.len(),
        "totalEnrolled": total_enrolled,
        "totalCapacity": total_capacity,
    }))
}

fn catalog_import(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let session = session_for(state, params, Operation::ImportCatalog)?;
    let Some(raw) = params.get("courses") else {
        return Err(HandlerErr::new("bad_params", "missing courses"));
    };
    let courses: Vec<Course> = serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::new("bad_params", format!("invalid courses: {}", e)))?;
    let catalog = Catalog::new(courses).map_err(|e| HandlerErr::new("bad_catalog", e.to_string()))?;

    let conn = require_db(state)?;
    let imported = db::replace_courses(conn, catalog.courses())
        .map_err(|e| db_err("db_insert_failed", e))?;
    tracing::info!(
        session_id = %session.id,
        imported,
        fingerprint = %catalog.fingerprint(),
        "catalog replaced"
    );

    Ok(json!({
        "imported": imported,
        "catalogFingerprint": catalog.fingerprint(),
    }))
}

fn handle_catalog_filter(state: &mut AppState, req: &Request) -> serde_json::Value {
    match catalog_filter(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_catalog_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    match catalog_stats(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_catalog_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    match catalog_import(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "catalog.filter" => Some(handle_catalog_filter(state, req)),
        "catalog.stats" => Some(handle_catalog_stats(state, req)),
        "catalog.import" => Some(handle_catalog_import(state, req)),
        _ => None,
    }
}
