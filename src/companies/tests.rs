//! Router-level tests for the companies API.
//!
//! These drive the real `axum::Router` end-to-end against the in-memory store,
//! so routing, extraction, the error translator and JSON shapes are all covered
//! without a database.

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use super::{memory::InMemoryCompanyStore, resource::CompanyResource, router, storage::CompanyStore};

fn app(store: &InMemoryCompanyStore) -> Router {
    router(CompanyResource::new(Arc::new(store.clone())))
}

/// Sends one request through a fresh clone of the router and returns status + JSON body.
/// Empty bodies decode to `Value::Null`.
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .context("read response body")?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("decode response json")?
    };

    Ok((status, json))
}

async fn seeded_store() -> Result<InMemoryCompanyStore> {
    let store = InMemoryCompanyStore::new();
    store.insert_company("apple", "Apple Computer").await?;
    store.insert_industry("tech", "Technology").await?;
    store.insert_industry("fin", "Finance").await?;
    store.link_industry("apple", "tech").await?;
    store.link_industry("apple", "fin").await?;
    Ok(store)
}

#[tokio::test]
async fn list_returns_code_and_name_only() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/companies/apple",
        Some(json!({"name": "Apple", "description": "Maker of OSX."})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send(&app, Method::GET, "/companies", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"companies": [{"code": "apple", "name": "Apple"}]})
    );
    Ok(())
}

#[tokio::test]
async fn list_includes_created_companies_after_existing_rows() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    for (code, name) in [("ibm", "IBM"), ("msft", "Microsoft")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/companies",
            Some(json!({"code": code, "name": name})),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, Method::GET, "/companies", None).await?;
    let codes: Vec<&str> = body["companies"]
        .as_array()
        .context("companies array")?
        .iter()
        .filter_map(|company| company["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["apple", "ibm", "msft"]);
    Ok(())
}

#[tokio::test]
async fn create_then_get_has_no_industries() -> Result<()> {
    let store = InMemoryCompanyStore::new();
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies",
        Some(json!({"code": "ibm", "name": "IBM"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"company": {"code": "ibm", "name": "IBM"}}));

    let (status, body) = send(&app, Method::GET, "/companies/ibm", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "company_code": "ibm",
            "company_name": "IBM",
            "company_description": null,
            "industries": []
        })
    );
    Ok(())
}

#[tokio::test]
async fn get_collects_every_linked_industry_once() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(&app, Method::GET, "/companies/apple", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company_code"], "apple");
    assert_eq!(body["company_name"], "Apple Computer");
    assert_eq!(body["industries"], json!(["Technology", "Finance"]));
    Ok(())
}

#[tokio::test]
async fn unknown_code_is_404_for_get_patch_delete() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    for (method, body) in [
        (Method::GET, None),
        (Method::PATCH, Some(json!({"name": "Ghost"}))),
        (Method::DELETE, None),
    ] {
        let (status, json) = send(&app, method.clone(), "/companies/ghost", body).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} /companies/ghost");
        assert_eq!(json["error"]["status"], 404);
        assert_eq!(
            json["error"]["message"],
            "There is no company with code of 'ghost'"
        );
    }
    Ok(())
}

#[tokio::test]
async fn patch_with_code_is_rejected() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/companies/apple",
        Some(json!({"code": "x", "name": "y"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": {"message": "Not allowed", "status": 400}})
    );

    // The rejected patch must not have touched the row.
    let (_, body) = send(&app, Method::GET, "/companies/apple", None).await?;
    assert_eq!(body["company_name"], "Apple Computer");
    Ok(())
}

#[tokio::test]
async fn patch_with_code_on_unknown_company_is_still_400() -> Result<()> {
    let store = InMemoryCompanyStore::new();
    let app = app(&store);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/companies/ghost",
        Some(json!({"code": "ghost"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patch_updates_name_and_description() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/companies/apple",
        Some(json!({"name": "Apple Inc.", "description": "Phones."})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"company": {"code": "apple", "name": "Apple Inc.", "description": "Phones."}})
    );

    let (_, body) = send(&app, Method::GET, "/companies/apple", None).await?;
    assert_eq!(body["company_description"], "Phones.");
    assert_eq!(body["industries"], json!(["Technology", "Finance"]));
    Ok(())
}

#[tokio::test]
async fn delete_twice_returns_404_second_time() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(&app, Method::DELETE, "/companies/apple", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted"}));

    let (status, _) = send(&app, Method::DELETE, "/companies/apple", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/companies/apple", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_create_is_500_with_json_body() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies",
        Some(json!({"code": "apple", "name": "Again"})),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["status"], 500);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_500_for_create_and_patch() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies",
        Some(json!({"code": "apple2", "name": "Apple Computer"})),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": {"message": "Internal Server Error", "status": 500}})
    );

    let (status, _) = send(
        &app,
        Method::POST,
        "/companies",
        Some(json!({"code": "ibm", "name": "IBM"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/companies/ibm",
        Some(json!({"name": "Apple Computer"})),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["status"], 500);

    let (_, body) = send(&app, Method::GET, "/companies/ibm", None).await?;
    assert_eq!(body["company_name"], "IBM");
    Ok(())
}

#[tokio::test]
async fn create_without_name_is_400() -> Result<()> {
    let store = InMemoryCompanyStore::new();
    let app = app(&store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies",
        Some(json!({"code": "ibm"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
    Ok(())
}

#[tokio::test]
async fn industries_are_listed_read_only() -> Result<()> {
    let store = seeded_store().await?;
    let app = app(&store);

    let (status, body) = send(&app, Method::GET, "/industries", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"industries": [
            {"code": "tech", "industry": "Technology"},
            {"code": "fin", "industry": "Finance"}
        ]})
    );
    Ok(())
}

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let store = InMemoryCompanyStore::new();
    let app = app(&store);

    let (status, body) = send(&app, Method::GET, "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));

    let (status, body) = send(&app, Method::OPTIONS, "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    Ok(())
}

#[tokio::test]
async fn request_id_is_echoed() -> Result<()> {
    let store = InMemoryCompanyStore::new();
    let app = app(&store);

    let request = Request::builder()
        .uri("/companies")
        .header("x-request-id", "req-123")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("req-123")
    );
    Ok(())
}

#[test]
fn openapi_documents_every_route() {
    let spec = super::openapi();
    for path in ["/companies", "/companies/{code}", "/industries", "/health"] {
        assert!(spec.paths.paths.contains_key(path), "missing {path}");
    }
}
