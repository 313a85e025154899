mod common;

use assert2::check;
use common::CatalogFixture;
use edunexus::tools::{
    BrowseCurriculumRequest, CatalogStatsRequest, ListResourcesRequest, handle_browse_curriculum,
    handle_catalog_stats, handle_list_resources,
};
use serde_json::Value;

async fn browse(fixture: &CatalogFixture, request: BrowseCurriculumRequest) -> Value {
    let raw = handle_browse_curriculum(&fixture.state, request)
        .await
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn values(response: &Value) -> Vec<String> {
    response["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

/// Test: the hierarchy descends year → semester → subject → unit, each
/// level computed from what actually exists in the catalog.
#[tokio::test]
async fn browse_descends_the_hierarchy() {
    let fixture = CatalogFixture::seeded().await;

    let years = browse(
        &fixture,
        BrowseCurriculumRequest {
            branch: Some("CSE".to_string()),
            regulation: Some("R23".to_string()),
            ..BrowseCurriculumRequest::default()
        },
    )
    .await;
    check!(years["level"] == "years");
    check!(values(&years) == vec!["1", "2", "3", "4"]);

    let semesters = browse(
        &fixture,
        BrowseCurriculumRequest {
            branch: Some("CSE".to_string()),
            regulation: Some("R23".to_string()),
            year: Some(2),
            ..BrowseCurriculumRequest::default()
        },
    )
    .await;
    check!(semesters["level"] == "semesters");
    check!(values(&semesters) == vec!["1", "2"]);

    let subjects = browse(
        &fixture,
        BrowseCurriculumRequest {
            branch: Some("CSE".to_string()),
            regulation: Some("R23".to_string()),
            year: Some(2),
            semester: Some(1),
            ..BrowseCurriculumRequest::default()
        },
    )
    .await;
    check!(subjects["level"] == "subjects");
    check!(values(&subjects) == vec!["CS301", "CS302"]);

    let units = browse(
        &fixture,
        BrowseCurriculumRequest {
            branch: Some("CSE".to_string()),
            regulation: Some("R23".to_string()),
            year: Some(2),
            semester: Some(1),
            subject: Some("CS301".to_string()),
            ..BrowseCurriculumRequest::default()
        },
    )
    .await;
    check!(units["level"] == "units");
    // "all" leads, numbered units follow in order.
    check!(values(&units) == vec!["all", "1"]);
}

/// Test: browsing a scope with no resources yields an empty level, not
/// an error.
#[tokio::test]
async fn browse_empty_scope_is_empty() {
    let fixture = CatalogFixture::seeded().await;

    let years = browse(
        &fixture,
        BrowseCurriculumRequest {
            branch: Some("MECH".to_string()),
            ..BrowseCurriculumRequest::default()
        },
    )
    .await;
    check!(values(&years).is_empty());
}

/// Test: list_resources returns the slot's resources newest first and
/// every record sits in the requested curriculum slot.
#[tokio::test]
async fn list_resources_scopes_to_one_slot() {
    let fixture = CatalogFixture::seeded().await;

    let raw = handle_list_resources(
        &fixture.state,
        ListResourcesRequest {
            branch: "CSE".to_string(),
            regulation: "R23".to_string(),
            year: 2,
            semester: 1,
            subject: "CS301".to_string(),
            document_type: None,
            unit: None,
            page: None,
        },
    )
    .await
    .unwrap();
    let page: edunexus::search::SearchResultPage = serde_json::from_str(&raw).unwrap();

    check!(page.total == 2);
    let slot = page.resources[0].slot();
    for resource in &page.resources {
        check!(resource.slot() == slot);
        check!(resource.subject_code == "CS301");
    }
    for pair in page.resources.windows(2) {
        check!(pair[0].uploaded_at >= pair[1].uploaded_at);
    }
}

/// Test: stats aggregate counts across the catalog.
#[tokio::test]
async fn stats_aggregate_the_catalog() {
    let fixture = CatalogFixture::seeded().await;

    let raw = handle_catalog_stats(&fixture.state, CatalogStatsRequest::default())
        .await
        .unwrap();
    let stats: Value = serde_json::from_str(&raw).unwrap();

    check!(stats["total_resources"] == 12);
    check!(stats["by_branch"]["CSE"] == 9);
    check!(stats["by_branch"]["ECE"] == 3);
    check!(stats["by_document_type"]["Notes"] == 7);
    check!(stats["by_document_type"]["Question Paper"] == 2);
    check!(stats["by_document_type"]["Syllabus"] == 1);
    check!(stats["by_file_type"]["PDF"] == 10);
    // Newest seeded upload is base + 1200s.
    check!(
        stats["latest_upload"]
            .as_str()
            .unwrap()
            .starts_with("2026-01-01T00:20:00")
    );
}
