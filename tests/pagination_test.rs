mod common;

use assert2::check;
use common::{CatalogFixture, ResourceBuilder};
use edunexus::config::Config;
use edunexus::model::SortSpec;
use edunexus::search::{
    FilterPlan, ResultAccumulator, SearchFilters, execute_search, normalize,
};
use uuid::Uuid;

fn small_pages() -> Config {
    Config {
        page_size: 3,
        ..Config::default()
    }
}

async fn seeded_small_pages() -> CatalogFixture {
    let fixture = CatalogFixture::with_config(small_pages()).await;
    for resource in common::seed_resources() {
        fixture.insert(resource).await;
    }
    fixture
}

fn page_ids(resources: &[edunexus::model::Resource]) -> Vec<Uuid> {
    resources.iter().map(|r| r.id).collect()
}

/// Test: pages are disjoint and concatenating pages 1..K reproduces the
/// order of a single unpaginated query.
#[tokio::test]
async fn pages_are_disjoint_and_order_preserving() {
    let fixture = seeded_small_pages().await;
    let store = fixture.state.store().as_ref();
    let config = fixture.state.config();
    let plan = FilterPlan::default();

    let mut concatenated: Vec<Uuid> = Vec::new();
    let mut page_no = 1;
    loop {
        let page = execute_search(store, config, &plan, SortSpec::default(), page_no)
            .await
            .unwrap();

        let ids = page_ids(&page.resources);
        for id in &ids {
            check!(!concatenated.contains(id), "Page {} repeats {}", page_no, id);
        }
        concatenated.extend(ids);

        if !page.has_more {
            break;
        }
        page_no += 1;
    }

    // Compare against one big query.
    let unpaginated = execute_search(
        store,
        &Config {
            page_size: 100,
            ..small_pages()
        },
        &plan,
        SortSpec::default(),
        1,
    )
    .await
    .unwrap();

    check!(concatenated == page_ids(&unpaginated.resources));
    check!(concatenated.len() == 12);
}

/// Test: has_more is true for every page except the last.
#[tokio::test]
async fn has_more_is_true_exactly_until_the_last_page() {
    let fixture = seeded_small_pages().await;
    let store = fixture.state.store().as_ref();
    let config = fixture.state.config();
    let plan = FilterPlan::default();

    // 12 resources, 3 per page: pages 1-3 have more, page 4 is last.
    for page_no in 1..=4u32 {
        let page = execute_search(store, config, &plan, SortSpec::default(), page_no)
            .await
            .unwrap();
        check!(page.total == 12);
        if page_no < 4 {
            check!(page.resources.len() == 3);
            check!(page.has_more, "Page {} should have more", page_no);
        } else {
            check!(page.resources.len() == 3);
            check!(!page.has_more, "Last page should not have more");
        }
    }
}

/// Test: a filtered set that ends mid-page reports has_more correctly.
#[tokio::test]
async fn has_more_with_partial_last_page() {
    let fixture = seeded_small_pages().await;
    let store = fixture.state.store().as_ref();
    let config = fixture.state.config();

    // Five seeded year-2 resources with page size 3: page 2 holds two.
    let plan = normalize(
        &SearchFilters {
            year: Some("2".to_string()),
            ..SearchFilters::default()
        },
        config.min_term_len,
    );

    let page1 = execute_search(store, config, &plan, SortSpec::default(), 1)
        .await
        .unwrap();
    check!(page1.total == 5);
    check!(page1.resources.len() == 3);
    check!(page1.has_more);

    let page2 = execute_search(store, config, &plan, SortSpec::default(), 2)
        .await
        .unwrap();
    check!(page2.resources.len() == 2);
    check!(!page2.has_more);
}

/// Test: free-text pagination stays inside the candidate window and
/// remains disjoint and ordered.
#[tokio::test]
async fn free_text_pagination_is_consistent() {
    let fixture = seeded_small_pages().await;
    let store = fixture.state.store().as_ref();
    let config = fixture.state.config();

    // Seven seeded titles contain "notes".
    let plan = normalize(
        &SearchFilters {
            query: Some("notes".to_string()),
            ..SearchFilters::default()
        },
        config.min_term_len,
    );

    let page1 = execute_search(store, config, &plan, SortSpec::default(), 1)
        .await
        .unwrap();
    let page2 = execute_search(store, config, &plan, SortSpec::default(), 2)
        .await
        .unwrap();
    let page3 = execute_search(store, config, &plan, SortSpec::default(), 3)
        .await
        .unwrap();

    check!(page1.total == 7);
    check!(page1.resources.len() == 3);
    check!(page1.has_more);
    check!(page2.resources.len() == 3);
    check!(page2.has_more);
    check!(page3.resources.len() == 1);
    check!(!page3.has_more);

    let mut all = page_ids(&page1.resources);
    all.extend(page_ids(&page2.resources));
    all.extend(page_ids(&page3.resources));
    check!(all.len() == 7);
    let mut deduped = all.clone();
    deduped.sort();
    deduped.dedup();
    check!(deduped.len() == all.len(), "Pages must be disjoint");
}

/// Test: the client-side accumulator drives the engine end to end —
/// load more appends, a filter change resets.
#[tokio::test]
async fn accumulator_load_more_flow() {
    let fixture = seeded_small_pages().await;
    let store = fixture.state.store().as_ref();
    let config = fixture.state.config();

    let mut accumulator = ResultAccumulator::new();
    let plan = FilterPlan::default();

    let seq = accumulator.begin_search(plan.cache_key());
    let page = execute_search(store, config, &plan, SortSpec::default(), 1)
        .await
        .unwrap();
    check!(accumulator.complete(seq, page));
    check!(accumulator.resources().len() == 3);

    while accumulator.has_more() {
        let (seq, page_no) = accumulator.begin_load_more().unwrap();
        let page = execute_search(store, config, &plan, SortSpec::default(), page_no)
            .await
            .unwrap();
        check!(accumulator.complete(seq, page));
    }
    check!(accumulator.resources().len() == 12);
    check!(accumulator.page() == 4);

    // Filter change resets the accumulation to page 1.
    let narrowed = normalize(
        &SearchFilters {
            branch: Some("ECE".to_string()),
            ..SearchFilters::default()
        },
        config.min_term_len,
    );
    let seq = accumulator.begin_search(narrowed.cache_key());
    check!(accumulator.resources().is_empty());
    let page = execute_search(store, config, &narrowed, SortSpec::default(), 1)
        .await
        .unwrap();
    check!(accumulator.complete(seq, page));
    check!(accumulator.resources().len() == 3);
    check!(accumulator.page() == 1);
}

/// Test: beyond-the-end pages are empty with has_more false, not an
/// error.
#[tokio::test]
async fn past_the_end_page_is_empty() {
    let fixture = CatalogFixture::with_config(small_pages()).await;
    fixture
        .insert(ResourceBuilder::new("Lone resource").build())
        .await;

    let page = execute_search(
        fixture.state.store().as_ref(),
        fixture.state.config(),
        &FilterPlan::default(),
        SortSpec::default(),
        5,
    )
    .await
    .unwrap();

    check!(page.resources.is_empty());
    check!(page.total == 1);
    check!(!page.has_more);
}
