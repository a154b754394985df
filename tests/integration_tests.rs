//! Integration tests over the in-memory repository
//!
//! Tests the full flow: raw query string → composed query → page envelope → next link

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use solidafy_query::{
    EntitySchema, Error, MemoryRepository, PaginateConfig, Paginator, QueryParams, Record,
};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Post {
    id: i64,
    title: String,
    like_count: i64,
    created_at: DateTime<Utc>,
}

impl Record for Post {
    fn id(&self) -> i64 {
        self.id
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const SCHEMA_YAML: &str = r"
name: posts
fields:
  - name: id
    type: integer
  - name: title
    type: text
  - name: likeCount
    type: integer
  - name: createdAt
    type: timestamp
";

fn repository(count: i64) -> Arc<MemoryRepository<Post>> {
    let schema = EntitySchema::from_yaml(SCHEMA_YAML).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let posts = (1..=count)
        .map(|id| Post {
            id,
            title: if id % 2 == 0 {
                format!("Rust tips #{id}")
            } else {
                format!("Gardening #{id}")
            },
            like_count: (id * 7) % 50,
            created_at: start + Duration::minutes(id),
        })
        .collect();
    Arc::new(MemoryRepository::with_records(schema, posts))
}

fn paginator() -> Paginator {
    Paginator::new(PaginateConfig::new("https", "blog.example.com"))
}

/// Follow `next` links until the walk ends; returns every visited id
async fn walk(repo: &Arc<MemoryRepository<Post>>, query: &str) -> (Vec<i64>, usize) {
    let paginator = paginator();
    let mut params = QueryParams::from_query_string(query);
    let mut seen = Vec::new();
    let mut pages = 0;

    loop {
        let page = paginator.paginate(&params, repo, "posts").await.unwrap();
        pages += 1;
        seen.extend(page.data().iter().map(|p| p.id));
        match page.next_url() {
            Some(next) => {
                let url = url::Url::parse(next).unwrap();
                params = QueryParams::from_query_string(url.query().unwrap_or_default());
            }
            None => break,
        }
        assert!(pages < 100, "walk did not terminate");
    }
    (seen, pages)
}

// ============================================================================
// Cursor Walks
// ============================================================================

#[tokio::test]
async fn test_cursor_walk_visits_every_record_once() {
    init_tracing();
    let repo = repository(23);

    let (seen, pages) = walk(&repo, "take=5&order__createdAt=ASC").await;

    assert_eq!(seen, (1..=23).collect::<Vec<_>>());
    // 5 full pages, then the empty page that ends the walk
    assert_eq!(pages, 6);
}

#[tokio::test]
async fn test_cursor_walk_descending_with_filter() {
    init_tracing();
    let repo = repository(12);

    let (seen, _) = walk(
        &repo,
        "?take=2&order__createdAt=DESC&where__title__i_like=RUST",
    )
    .await;

    assert_eq!(seen, vec![12, 10, 8, 6, 4, 2]);
}

#[tokio::test]
async fn test_cursor_walk_with_default_take() {
    init_tracing();
    let repo = repository(45);

    let page = paginator()
        .paginate(&QueryParams::from_query_string("order__id=ASC"), &repo, "posts")
        .await
        .unwrap();
    assert_eq!(page.data().len(), 20);

    let next = page.next_url().unwrap();
    assert_eq!(
        next,
        "https://blog.example.com/posts?order__id=ASC&take=20&where__id__less_than=20"
    );
}

// ============================================================================
// Offset Pages
// ============================================================================

#[tokio::test]
async fn test_offset_pages_share_total() {
    init_tracing();
    let repo = repository(30);
    let paginator = paginator();

    let mut totals = Vec::new();
    let mut seen = Vec::new();
    for page in 1..=4 {
        let query = format!("page={page}&take=8&where__likeCount__more_than_or_equal=10");
        let page = paginator
            .paginate(&QueryParams::from_query_string(&query), &repo, "posts")
            .await
            .unwrap();
        totals.push(page.as_offset().unwrap().total);
        seen.extend(page.into_data().into_iter().map(|p| p.id));
    }

    let expected: Vec<i64> = (1..=30).filter(|id| (id * 7) % 50 >= 10).collect();
    assert!(totals.iter().all(|t| *t == expected.len() as u64));
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_envelope_json() {
    init_tracing();
    let repo = repository(3);

    let page = paginator()
        .paginate(
            &QueryParams::from_query_string("page=1&take=1&where__id=2"),
            &repo,
            "posts",
        )
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({
            "data": [{
                "id": 2,
                "title": "Rust tips #2",
                "likeCount": 14,
                "createdAt": "2024-06-01T00:02:00Z"
            }],
            "total": 1
        })
    );
}

// ============================================================================
// Rejected Requests
// ============================================================================

#[tokio::test]
async fn test_rejected_requests() {
    init_tracing();
    let repo = repository(3);
    let paginator = paginator();

    let cases = [
        ("where__title__sounds_like=x", "Unknown filter operator"),
        ("where__id__between=1,2,3", "expects"),
        ("where__rating=5", "Unknown field"),
        ("order__createdAt=sideways", "Invalid order direction"),
        ("where__likeCount=lots", "Invalid value"),
        ("take=-1", "take"),
    ];

    for (query, fragment) in cases {
        let err = paginator
            .paginate(&QueryParams::from_query_string(query), &repo, "posts")
            .await
            .unwrap_err();
        assert!(err.is_client_error(), "{query}: {err}");
        assert!(err.to_string().contains(fragment), "{query}: {err}");
    }
    assert_eq!(repo.query_count(), 0);

    let page = paginator
        .paginate(
            &QueryParams::from_query_string("where__title__like=x"),
            &repo,
            "posts",
        )
        .await
        .unwrap();
    assert!(page.data().is_empty());

    let err = paginator
        .paginate(
            &QueryParams::from_query_string("where__likeCount__like=1"),
            &repo,
            "posts",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OperatorNotSupported { .. }));
}
