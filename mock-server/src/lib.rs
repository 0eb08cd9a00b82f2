//! In-memory stand-in for the slice of the Maximo OSLC API the activities
//! use. The same routes are mounted under `/oslc` and `/api`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// `maxauth` value accepted by the mock: base64 of `maxadmin:maxadmin`.
pub const MAXAUTH_TOKEN: &str = "bWF4YWRtaW46bWF4YWRtaW4=";
/// `apikey` value accepted by the mock.
pub const API_KEY: &str = "test-api-key";

#[derive(Clone, Debug)]
pub struct Record {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Records per object structure, in insertion order.
pub type Db = Arc<RwLock<HashMap<String, Vec<Record>>>>;

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .nest("/oslc", oslc_routes(db.clone()))
        .nest("/api", oslc_routes(db))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Two `mxasset` records at site BEDFORD.
pub fn seed() -> Db {
    let assets = vec![
        Record {
            id: "_QkVERk9SRC8xMTQzMA--".to_string(),
            fields: object(json!({
                "assetid": 21,
                "assetnum": "11430",
                "siteid": "BEDFORD",
                "description": "Centrifugal Pump 100GPM/60FT HD",
                "status": "OPERATING",
                "location": "BR430",
                "isrunning": true
            })),
        },
        Record {
            id: "_QkVERk9SRC8xMTQ1MA--".to_string(),
            fields: object(json!({
                "assetid": 22,
                "assetnum": "11450",
                "siteid": "BEDFORD",
                "description": "Pump Motor 10HP",
                "status": "NOT READY",
                "location": "BR450",
                "isrunning": false
            })),
        },
    ];
    let mut db = HashMap::new();
    db.insert("mxasset".to_string(), assets);
    Arc::new(RwLock::new(db))
}

fn oslc_routes(db: Db) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/whoami", get(whoami))
        .route("/systeminfo", get(system_info))
        .route("/os/{resource}", get(list_resources).post(create_resources))
        .route(
            "/os/{resource}/{id}",
            get(get_resource).post(update_resource).delete(delete_resource),
        )
        .layer(middleware::from_fn(require_auth))
        .with_state(db)
}

/// Maximo's JSON error envelope.
pub fn maximo_error(status: StatusCode, reason_code: &str, message: &str) -> Response {
    let body = json!({
        "Error": {
            "message": message,
            "reasonCode": reason_code,
            "statusCode": status.as_u16().to_string()
        }
    });
    (status, Json(body)).into_response()
}

async fn require_auth(request: Request, next: Next) -> Response {
    let headers = request.headers();
    let maxauth_ok = header_value(headers, "maxauth") == Some(MAXAUTH_TOKEN);
    let apikey_ok = header_value(headers, "apikey") == Some(API_KEY);
    if maxauth_ok || apikey_ok {
        next.run(request).await
    } else {
        maximo_error(
            StatusCode::UNAUTHORIZED,
            "BMXAA7901E",
            "BMXAA7901E - You cannot log in at this time. Contact the system administrator.",
        )
    }
}

async fn login() -> StatusCode {
    StatusCode::OK
}

async fn whoami() -> Json<Value> {
    Json(json!({
        "userName": "MAXADMIN",
        "loginID": "maxadmin",
        "personId": "MAXADMIN",
        "displayName": "Max Admin",
        "defaultSite": "BEDFORD",
        "defaultOrg": "EAGLENA",
        "langcode": "EN"
    }))
}

async fn system_info() -> Json<Value> {
    Json(json!({
        "appServer": "WebSphere Liberty",
        "appVersion": {"rdfs:member": [{"spi:versionKey": "V7610-721"}]},
        "database": {"dbProductName": "DB2"},
        "os": {"osName": "Linux"}
    }))
}

async fn list_resources(
    State(db): State<Db>,
    Path(resource): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let db = db.read().await;
    let records = db.get(&resource).map(Vec::as_slice).unwrap_or_default();

    let filters = query
        .get("oslc.where")
        .map(String::as_str)
        .map(parse_where)
        .unwrap_or_default();
    let mut matching: Vec<&Record> = records
        .iter()
        .filter(|r| {
            filters
                .iter()
                .all(|(attr, value)| field_text(&r.fields, attr).as_deref() == Some(value.as_str()))
        })
        .collect();

    if query.get("count").map(String::as_str) == Some("1") {
        return Json(json!({"totalCount": matching.len()})).into_response();
    }

    if let Some(order_by) = query.get("oslc.orderBy") {
        sort_records(&mut matching, order_by);
    }
    if let Some(size) = query.get("oslc.pageSize").and_then(|s| s.parse::<usize>().ok()) {
        matching.truncate(size);
    }

    let base = absolute(&headers, uri.path());
    let select = query.get("oslc.select").map(String::as_str);
    let member: Vec<Value> = matching
        .iter()
        .map(|r| {
            let href = format!("{base}/{}", r.id);
            match select {
                Some(select) => project(&r.fields, select, &href),
                None => json!({"href": href}),
            }
        })
        .collect();

    Json(json!({"member": member, "href": base})).into_response()
}

async fn create_resources(
    State(db): State<Db>,
    Path(resource): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => return bad_payload(),
    };
    let base = absolute(&headers, uri.path());

    if header_value(&headers, "x-method-override") == Some("SYNC") {
        let items = match payload {
            Value::Array(items) => items,
            other => vec![other],
        };
        let mut db = db.write().await;
        let records = db.entry(resource).or_default();
        for item in items {
            if let Value::Object(fields) = item {
                records.push(Record {
                    id: Uuid::new_v4().simple().to_string(),
                    fields,
                });
            }
        }
        return StatusCode::NO_CONTENT.into_response();
    }

    let Value::Object(fields) = payload else {
        return bad_payload();
    };
    let record = Record {
        id: Uuid::new_v4().simple().to_string(),
        fields,
    };
    let href = format!("{base}/{}", record.id);
    let response = match header_value(&headers, "properties") {
        Some(properties) => (
            StatusCode::CREATED,
            [(header::LOCATION, href.clone())],
            Json(project(&record.fields, properties, &href)),
        )
            .into_response(),
        None => (StatusCode::CREATED, [(header::LOCATION, href.clone())]).into_response(),
    };
    db.write().await.entry(resource).or_default().push(record);
    response
}

async fn get_resource(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let db = db.read().await;
    let Some(record) = find(&db, &resource, &id) else {
        return not_found(&resource);
    };
    let href = absolute(&headers, uri.path());
    let select = query.get("oslc.select").map(String::as_str).unwrap_or("*");
    Json(project(&record.fields, select, &href)).into_response()
}

async fn update_resource(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if header_value(&headers, "x-method-override") != Some("PATCH") {
        return maximo_error(
            StatusCode::BAD_REQUEST,
            "BMXAA8727E",
            "BMXAA8727E - The OSLC operation failed because the request method is not supported.",
        );
    }
    let Ok(Value::Object(changes)) = serde_json::from_slice::<Value>(&body) else {
        return bad_payload();
    };

    let mut db = db.write().await;
    let Some(record) = db
        .get_mut(&resource)
        .and_then(|records| records.iter_mut().find(|r| r.id == id))
    else {
        return not_found(&resource);
    };
    // Top-level attributes always merge; `patchtype` only affects child
    // collections, which the mock does not model.
    record.fields.extend(changes);

    match header_value(&headers, "properties") {
        Some(properties) => {
            let href = absolute(&headers, uri.path());
            Json(project(&record.fields, properties, &href)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn delete_resource(
    State(db): State<Db>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    let mut db = db.write().await;
    let Some(records) = db.get_mut(&resource) else {
        return not_found(&resource);
    };
    match records.iter().position(|r| r.id == id) {
        Some(idx) => {
            records.remove(idx);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(&resource),
    }
}

fn find<'a>(db: &'a HashMap<String, Vec<Record>>, resource: &str, id: &str) -> Option<&'a Record> {
    db.get(resource)?.iter().find(|r| r.id == id)
}

fn not_found(resource: &str) -> Response {
    maximo_error(
        StatusCode::NOT_FOUND,
        "BMXAA8727E",
        &format!("BMXAA8727E - The OSLC resource {} with the ID was not found as it does not exist in the system.", resource.to_uppercase()),
    )
}

fn bad_payload() -> Response {
    maximo_error(
        StatusCode::BAD_REQUEST,
        "BMXAA1306E",
        "BMXAA1306E - The request body is not a valid JSON object.",
    )
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn absolute(headers: &HeaderMap, path: &str) -> String {
    let host = header_value(headers, "host").unwrap_or("localhost");
    format!("http://{host}{path}")
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Apply an `oslc.select`/`properties` list (`*` for all) and attach `href`.
fn project(fields: &Map<String, Value>, select: &str, href: &str) -> Value {
    let mut out = Map::new();
    if select.trim() == "*" {
        out.extend(fields.clone());
    } else {
        for attr in select.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            if let Some(value) = fields.get(attr) {
                out.insert(attr.to_string(), value.clone());
            }
        }
    }
    out.insert("href".to_string(), Value::String(href.to_string()));
    Value::Object(out)
}

/// Parse `attr="value" and attr2=value2` into equality filters.
fn parse_where(clause: &str) -> Vec<(String, String)> {
    clause
        .split(" and ")
        .filter_map(|term| {
            let (attr, value) = term.split_once('=')?;
            Some((attr.trim().to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

fn field_text(fields: &Map<String, Value>, attr: &str) -> Option<String> {
    match fields.get(attr)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Sort by the first `+attr`/`-attr` key of an `oslc.orderBy` list.
fn sort_records(records: &mut [&Record], order_by: &str) {
    let Some(key) = order_by.split(',').next().map(str::trim) else {
        return;
    };
    let (descending, attr) = match key.strip_prefix('-') {
        Some(attr) => (true, attr),
        None => (false, key.trim_start_matches('+')),
    };
    records.sort_by(|a, b| {
        let ordering = compare_values(a.fields.get(attr), b.fields.get(attr));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
