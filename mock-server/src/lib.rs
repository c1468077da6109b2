use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const POST_TYPES: [&str; 8] = ["text", "quote", "link", "answer", "video", "audio", "photo", "chat"];

const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub blog_name: String,
    pub post_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: u64,
    pub tags: Vec<String>,
    pub note_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct BlogRecord {
    pub posts: Vec<Post>,
    pub likes: Vec<Post>,
}

#[derive(Deserialize)]
pub struct PostsQuery {
    pub id: Option<u64>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Deserialize)]
pub struct LikesQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Blogs keyed by hostname.
pub type Db = Arc<RwLock<HashMap<String, BlogRecord>>>;

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/v2/blog/{hostname}/posts", get(list_posts))
        .route("/v2/blog/{hostname}/posts/{kind}", get(list_posts_by_type))
        .route("/v2/blog/{hostname}/likes", get(list_likes))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// One blog, `example.tumblr.com`, with a post of each of a few types and a
/// single like from another blog.
pub fn seed() -> Db {
    let post = |id: u64, kind: &str, tags: &[&str]| Post {
        id,
        blog_name: "example".to_string(),
        post_url: format!("http://example.tumblr.com/post/{id}"),
        kind: kind.to_string(),
        timestamp: 1_300_000_000 + id,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        note_count: id * 3,
        title: (kind == "text").then(|| format!("Post {id}")),
        body: (kind == "text").then(|| format!("<p>Body of post {id}</p>")),
        caption: (kind == "photo" || kind == "video").then(|| format!("<p>Caption {id}</p>")),
    };

    let record = BlogRecord {
        posts: vec![
            post(101, "text", &["cats", "daily"]),
            post(102, "photo", &["cats"]),
            post(103, "quote", &[]),
            post(104, "photo", &["dogs"]),
            post(105, "video", &["cats", "video"]),
        ],
        likes: vec![Post {
            id: 9001,
            blog_name: "other".to_string(),
            post_url: "http://other.tumblr.com/post/9001".to_string(),
            kind: "link".to_string(),
            timestamp: 1_299_999_999,
            tags: Vec::new(),
            note_count: 12,
            title: Some("A link".to_string()),
            body: None,
            caption: None,
        }],
    };

    let mut blogs = HashMap::new();
    blogs.insert("example.tumblr.com".to_string(), record);
    Arc::new(RwLock::new(blogs))
}

fn envelope(status: StatusCode, response: Value) -> (StatusCode, Json<Value>) {
    let body = json!({
        "meta": {
            "status": status.as_u16(),
            "msg": status.canonical_reason().unwrap_or_default(),
        },
        "response": response,
    });
    (status, Json(body))
}

fn page(len: usize, limit: Option<usize>, offset: Option<usize>) -> Result<(usize, usize), StatusCode> {
    let limit = match limit {
        None | Some(0) => DEFAULT_LIMIT,
        Some(n) if n <= DEFAULT_LIMIT => n,
        Some(_) => return Err(StatusCode::BAD_REQUEST),
    };
    let start = offset.unwrap_or(0).min(len);
    Ok((start, (start + limit).min(len)))
}

async fn list_posts(
    State(db): State<Db>,
    Path(hostname): Path<String>,
    Query(query): Query<PostsQuery>,
) -> (StatusCode, Json<Value>) {
    posts_matching(&db, &hostname, None, query).await
}

async fn list_posts_by_type(
    State(db): State<Db>,
    Path((hostname, kind)): Path<(String, String)>,
    Query(query): Query<PostsQuery>,
) -> (StatusCode, Json<Value>) {
    if !POST_TYPES.contains(&kind.as_str()) {
        return envelope(StatusCode::BAD_REQUEST, json!([]));
    }
    posts_matching(&db, &hostname, Some(kind.as_str()), query).await
}

async fn posts_matching(
    db: &Db,
    hostname: &str,
    kind: Option<&str>,
    query: PostsQuery,
) -> (StatusCode, Json<Value>) {
    debug!(hostname = %hostname, ?kind, id = ?query.id, tag = ?query.tag, "posts");
    let blogs = db.read().await;
    let Some(record) = blogs.get(hostname) else {
        return envelope(StatusCode::NOT_FOUND, json!([]));
    };

    let matching: Vec<&Post> = record
        .posts
        .iter()
        .filter(|p| kind.is_none_or(|k| p.kind == k))
        .filter(|p| query.id.is_none_or(|id| p.id == id))
        .filter(|p| query.tag.as_ref().is_none_or(|tag| p.tags.contains(tag)))
        .collect();

    let (start, end) = match page(matching.len(), query.limit, query.offset) {
        Ok(bounds) => bounds,
        Err(status) => return envelope(status, json!([])),
    };
    let posts = &matching[start..end];
    envelope(
        StatusCode::OK,
        json!({
            "total_posts": matching.len(),
            "posts": posts,
        }),
    )
}

async fn list_likes(
    State(db): State<Db>,
    Path(hostname): Path<String>,
    Query(query): Query<LikesQuery>,
) -> (StatusCode, Json<Value>) {
    debug!(hostname = %hostname, "likes");
    let blogs = db.read().await;
    let Some(record) = blogs.get(&hostname) else {
        return envelope(StatusCode::NOT_FOUND, json!([]));
    };
    let (start, end) = match page(record.likes.len(), query.limit, query.offset) {
        Ok(bounds) => bounds,
        Err(status) => return envelope(status, json!([])),
    };
    let liked = &record.likes[start..end];
    envelope(
        StatusCode::OK,
        json!({
            "liked_count": record.likes.len(),
            "liked_posts": liked,
        }),
    )
}
