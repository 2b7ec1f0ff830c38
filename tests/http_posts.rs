use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{
    Request, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
};
use axum::response::Response;
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tower::ServiceExt;

use postdesk::application::admin::posts::AdminPostService;
use postdesk::application::auth::AdminGate;
use postdesk::application::posts::PostService;
use postdesk::application::repos::{
    CreatePostParams, HealthRepo, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use postdesk::domain::entities::{PostListing, PostRecord};
use postdesk::infra::http::{
    ADMIN_SESSION_COOKIE, AdminState, HttpState, RouterState, build_router,
};

const TOKEN: &str = "test-admin-token";
const FORM: &str = "application/x-www-form-urlencoded";

#[derive(Default)]
struct MemoryPosts {
    rows: Mutex<BTreeMap<String, PostRecord>>,
    writes: Mutex<Vec<&'static str>>,
}

impl MemoryPosts {
    fn seeded(posts: &[(&str, &str, &str)]) -> Arc<Self> {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for (slug, title, markdown) in posts {
                rows.insert(slug.to_string(), record(slug, title, markdown));
            }
        }
        Arc::new(store)
    }

    fn writes(&self) -> Vec<&'static str> {
        self.writes.lock().unwrap().clone()
    }

    fn get(&self, slug: &str) -> Option<PostRecord> {
        self.rows.lock().unwrap().get(slug).cloned()
    }
}

fn record(slug: &str, title: &str, markdown: &str) -> PostRecord {
    let now = OffsetDateTime::now_utc();
    PostRecord {
        slug: slug.to_string(),
        title: title.to_string(),
        markdown: markdown.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn duplicate() -> RepoError {
    RepoError::Duplicate {
        constraint: "post_pkey".into(),
    }
}

#[async_trait]
impl PostsRepo for MemoryPosts {
    async fn list_summaries(&self) -> Result<Vec<PostListing>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .map(PostListing::from)
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.get(slug))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryPosts {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        self.writes.lock().unwrap().push("create");
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&params.slug) {
            return Err(duplicate());
        }
        let post = record(&params.slug, &params.title, &params.markdown);
        rows.insert(params.slug, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        current_slug: &str,
        params: UpdatePostParams,
    ) -> Result<PostRecord, RepoError> {
        self.writes.lock().unwrap().push("update");
        let mut rows = self.rows.lock().unwrap();
        if params.slug != current_slug && rows.contains_key(&params.slug) {
            return Err(duplicate());
        }
        let existing = rows.remove(current_slug).ok_or(RepoError::NotFound)?;
        let post = PostRecord {
            slug: params.slug.clone(),
            title: params.title,
            markdown: params.markdown,
            created_at: existing.created_at,
            updated_at: OffsetDateTime::now_utc(),
        };
        rows.insert(params.slug, post.clone());
        Ok(post)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        self.writes.lock().unwrap().push("delete");
        self.rows.lock().unwrap().remove(slug);
        Ok(())
    }
}

#[async_trait]
impl HealthRepo for MemoryPosts {
    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

fn app_with_token(store: Arc<MemoryPosts>, token: Option<&str>) -> Router {
    let reader: Arc<dyn PostsRepo> = store.clone();
    let writer: Arc<dyn PostsWriteRepo> = store.clone();
    let health: Arc<dyn HealthRepo> = store;

    build_router(RouterState {
        http: HttpState {
            posts: Arc::new(PostService::new(reader.clone())),
            health,
        },
        admin: AdminState {
            posts: Arc::new(AdminPostService::new(reader, writer)),
            gate: Arc::new(AdminGate::new(token)),
            cookie_secure: false,
        },
    })
}

fn app(store: Arc<MemoryPosts>) -> Router {
    app_with_token(store, Some(TOKEN))
}

fn admin_post(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_get(path: &str) -> Request<Body> {
    Request::get(path)
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn create_redirects_to_admin_index() {
    let store = MemoryPosts::seeded(&[]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/new",
            "title=Hello&slug=hello&markdown=%23+Hi&intent=create",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");
    assert_eq!(store.writes(), vec!["create"]);

    let post = store.get("hello").expect("post stored");
    assert_eq!(post.title, "Hello");
    assert_eq!(post.markdown, "# Hi");
}

#[tokio::test]
async fn missing_intent_on_new_route_creates() {
    let store = MemoryPosts::seeded(&[]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/new",
            "title=Hello&slug=hello&markdown=body",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.writes(), vec!["create"]);
}

#[tokio::test]
async fn blank_title_rerenders_form_without_writing() {
    let store = MemoryPosts::seeded(&[]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/new",
            "title=&slug=x&markdown=y&intent=create",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Title is required"), "{html}");
    assert!(!html.contains("Slug is required"), "{html}");
    assert!(!html.contains("Markdown is required"), "{html}");
    assert!(html.contains(r#"name="slug" value="x""#), "{html}");
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn validation_errors_as_json_when_requested() {
    let store = MemoryPosts::seeded(&[]);
    let mut request = admin_post(
        "/posts/admin/new",
        "title=&slug=x&markdown=y&intent=create",
    );
    request
        .headers_mut()
        .insert(ACCEPT, "application/json".parse().unwrap());

    let response = app(store.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        payload,
        serde_json::json!({
            "title": "Title is required",
            "slug": null,
            "markdown": null,
        })
    );
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn update_replaces_all_fields_and_may_rename() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "old body")]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/hello",
            "title=Renamed&slug=renamed&markdown=new+body&intent=update",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.writes(), vec!["update"]);
    assert!(store.get("hello").is_none());
    let post = store.get("renamed").expect("renamed post");
    assert_eq!(post.title, "Renamed");
    assert_eq!(post.markdown, "new body");
}

#[tokio::test]
async fn delete_then_loader_reports_not_found() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "body")]);
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(admin_post("/posts/admin/hello", "intent=delete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");
    assert_eq!(store.writes(), vec!["delete"]);

    let response = router
        .oneshot(admin_get("/posts/admin/hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("There was an error loading this post:"), "{html}");
}

#[tokio::test]
async fn deleting_absent_post_still_redirects() {
    let store = MemoryPosts::seeded(&[]);
    let response = app(store.clone())
        .oneshot(admin_post("/posts/admin/ghost", "intent=delete"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.writes(), vec!["delete"]);
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict_and_keeps_original() {
    let store = MemoryPosts::seeded(&[("hello", "Original", "first")]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/new",
            "title=Second&slug=hello&markdown=second&intent=create",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let html = body_text(response).await;
    assert!(html.contains("post_pkey"), "{html}");
    assert_eq!(store.get("hello").expect("original").title, "Original");
}

#[tokio::test]
async fn create_intent_on_existing_route_updates_that_post() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "body")]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/hello",
            "title=New&slug=hello&markdown=x&intent=create",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");
    assert_eq!(store.writes(), vec!["update"]);
    let stored = store.get("hello").expect("post kept");
    assert_eq!(stored.title, "New");
    assert_eq!(stored.markdown, "x");
}

#[tokio::test]
async fn delete_intent_on_new_route_deletes_by_route_slug() {
    let store = MemoryPosts::seeded(&[("new", "Literal", "body")]);
    let response = app(store.clone())
        .oneshot(admin_post("/posts/admin/new", "intent=delete"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");
    assert_eq!(store.writes(), vec!["delete"]);
    assert!(store.get("new").is_none());
}

#[tokio::test]
async fn update_intent_on_new_route_creates() {
    let store = MemoryPosts::seeded(&[]);
    let response = app(store.clone())
        .oneshot(admin_post(
            "/posts/admin/new",
            "title=a&slug=b&markdown=c&intent=update",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.writes(), vec!["create"]);
    assert!(store.get("b").is_some());
}

#[tokio::test]
async fn unknown_intents_or_fields_are_bad_requests() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "body")]);
    let router = app(store.clone());

    for body in [
        "title=a&slug=b&markdown=c&intent=publish",
        "title=a&slug=b&markdown=c&extra=1",
    ] {
        let response = router
            .clone()
            .oneshot(admin_post("/posts/admin/hello", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }

    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn padded_values_are_stored_verbatim() {
    let store = MemoryPosts::seeded(&[]);
    let router = app(store.clone());

    let response = router
        .clone()
        .oneshot(admin_post(
            "/posts/admin/new",
            "title=+Hello+&slug=hello&markdown=x",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.get("hello").expect("stored").title, " Hello ");

    let response = router
        .oneshot(admin_post("/posts/admin/new", "title=+&slug=spaced&markdown=x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.get("spaced").expect("stored").title, " ");
    assert_eq!(store.writes(), vec!["create", "create"]);
}

#[tokio::test]
async fn links_percent_encode_slugs() {
    let store = MemoryPosts::seeded(&[("a/b?c#d", "Odd", "body")]);
    let router = app(store.clone());

    let admin = body_text(
        router
            .clone()
            .oneshot(admin_get("/posts/admin"))
            .await
            .unwrap(),
    )
    .await;
    assert!(admin.contains(r#"href="/posts/admin/a%2Fb%3Fc%23d""#), "{admin}");

    let public = body_text(
        router
            .clone()
            .oneshot(Request::get("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert!(public.contains(r#"href="/posts/a%2Fb%3Fc%23d""#), "{public}");

    let editor = router
        .oneshot(admin_get("/posts/admin/a%2Fb%3Fc%23d"))
        .await
        .unwrap();
    assert_eq!(editor.status(), StatusCode::OK);
    let editor = body_text(editor).await;
    assert!(editor.contains(r#"action="/posts/admin/a%2Fb%3Fc%23d""#), "{editor}");
}

#[tokio::test]
async fn unauthenticated_requests_never_reach_the_repository() {
    let store = MemoryPosts::seeded(&[]);
    let router = app(store.clone());

    let browser = Request::post("/posts/admin/new")
        .header(ACCEPT, "text/html,application/xhtml+xml")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from("title=a&slug=b&markdown=c"))
        .unwrap();
    let response = router.clone().oneshot(browser).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let client = Request::post("/posts/admin/new")
        .header(AUTHORIZATION, "Bearer wrong")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from("title=a&slug=b&markdown=c"))
        .unwrap();
    let response = router.oneshot(client).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn unconfigured_token_denies_admin_access() {
    let store = MemoryPosts::seeded(&[]);
    let response = app_with_token(store, None)
        .oneshot(admin_get("/posts/admin"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_cookie_grants_admin_access() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "body")]);
    let router = app(store);

    let login = Request::post("/login")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(format!("token={TOKEN}")))
        .unwrap();
    let response = router.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/admin");

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie")
        .to_string();
    assert!(set_cookie.starts_with(&format!("{ADMIN_SESSION_COOKIE}=")));
    assert!(set_cookie.contains("HttpOnly"));
    let pair = set_cookie.split(';').next().unwrap().to_string();

    let index = Request::get("/posts/admin")
        .header(COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(index).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"href="/posts/admin/hello""#), "{html}");
    assert!(html.contains(r#"href="/posts/admin/new""#), "{html}");
}

#[tokio::test]
async fn wrong_login_token_is_unauthorized() {
    let store = MemoryPosts::seeded(&[]);
    let login = Request::post("/login")
        .header(CONTENT_TYPE, FORM)
        .body(Body::from("token=nope"))
        .unwrap();

    let response = app(store).oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Invalid admin token"), "{html}");
}

#[tokio::test]
async fn loader_prefills_existing_post() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "# Body")]);
    let response = app(store)
        .oneshot(admin_get("/posts/admin/hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"name="title" value="Hello""#), "{html}");
    assert!(html.contains("# Body"), "{html}");
}

#[tokio::test]
async fn public_listing_links_titles_without_markdown() {
    let store = MemoryPosts::seeded(&[
        ("b-post", "Second", "secret second body"),
        ("a-post", "First", "secret first body"),
    ]);
    let response = app(store)
        .oneshot(Request::get("/posts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<a href="/posts/a-post">First</a>"#), "{html}");
    assert!(html.contains(r#"<a href="/posts/b-post">Second</a>"#), "{html}");
    assert!(!html.contains("secret"), "{html}");
}

#[tokio::test]
async fn public_detail_renders_markdown() {
    let store = MemoryPosts::seeded(&[("hello", "Hello", "# Heading\n\n*soft*")]);
    let router = app(store);

    let response = router
        .clone()
        .oneshot(Request::get("/posts/hello").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<h1>Heading</h1>"), "{html}");
    assert!(html.contains("<em>soft</em>"), "{html}");

    let response = router
        .oneshot(Request::get("/posts/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_reports_no_content() {
    let response = app(MemoryPosts::seeded(&[]))
        .oneshot(Request::get("/_health/db").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
