//! End-to-end session flows for the `stockpath` library.
//!
//! The router is wired in as the client's navigator and the session lives in
//! a file, so these tests exercise the same composition the console uses:
//! a persisted session, the route guard, and the refresh protocol against a
//! mock inventory API.

use anyhow::{bail, Result};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::{Arc, Mutex};
use stockpath::{
    session::FileStorage, AuthenticatedClient, ClientConfig, ClientError, Guard, Notifier,
    OutboundRequest, Role, Router, Session, SessionStore,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Notices(Mutex<Vec<String>>);

impl Notifier for Notices {
    fn notify(&self, message: &str) {
        if let Ok(mut notices) = self.0.lock() {
            notices.push(message.to_string());
        }
    }
}

impl Notices {
    fn count(&self) -> usize {
        self.0.lock().map(|notices| notices.len()).unwrap_or_default()
    }
}

struct TestContext {
    _dir: tempfile::TempDir,
    store: SessionStore,
    router: Arc<Router>,
    notices: Arc<Notices>,
    client: AuthenticatedClient,
}

impl TestContext {
    fn new(base_url: &str, session: &Session) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let store = SessionStore::new(Arc::new(FileStorage::new(dir.path().join("session.json"))));
        store.set(session);

        let router = Arc::new(Router::new(Guard::standard(), store.clone()));
        let notices = Arc::new(Notices::default());
        let client = AuthenticatedClient::new(
            ClientConfig::new(base_url)?,
            store.clone(),
            notices.clone(),
            router.clone(),
        )?;

        Ok(Self {
            _dir: dir,
            store,
            router,
            notices,
            client,
        })
    }
}

fn manager_session() -> Session {
    Session::new(Some("A1"), Some("R1"), Some(Role::Manager))
}

#[tokio::test]
async fn expired_credential_is_refreshed_and_request_succeeds() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .and(body_json(json!("R1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "A2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": "bolt" }])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new(&server.uri(), &manager_session())?;

    let navigation = ctx.router.navigate("/product-list")?;
    assert_eq!(navigation.location, "/product-list");

    let response = ctx.client.send(OutboundRequest::get("/api/products")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    // the new credential reached the file
    let reopened = ctx.store.get();
    assert_eq!(reopened.access_token(), Some("A2"));
    assert_eq!(ctx.router.location(), "/product-list");
    assert_eq!(ctx.notices.count(), 0);
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_logs_out_and_lands_on_login() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new(&server.uri(), &manager_session())?;
    ctx.router.navigate("/product-list")?;

    match ctx.client.send(OutboundRequest::get("/api/products")).await {
        Err(ClientError::AuthExpired) => {}
        other => bail!("expected AuthExpired, got {other:?}"),
    }

    assert!(!ctx.store.get().is_authenticated());
    assert_eq!(ctx.router.location(), "/login");
    assert_eq!(ctx.notices.count(), 1);

    // protected pages are closed until the next login
    let navigation = ctx.router.navigate("/dashboard-manager")?;
    assert_eq!(navigation.location, "/login");
    Ok(())
}

#[tokio::test]
async fn login_then_entry_page_redirects_to_landing() -> Result<()> {
    let server = MockServer::start().await;
    // header.payload.signature with payload {"role":"supplier"}
    let token = "eyJhbGciOiJIUzI1NiJ9.eyJyb2xlIjoic3VwcGxpZXIifQ.sig";
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": token, "token_type": "bearer" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new(&server.uri(), &Session::default())?;
    assert_eq!(ctx.router.navigate("/login")?.location, "/login");

    let session = ctx.client.login("s@example.com", "password123").await?;
    assert_eq!(session.role(), Some(Role::Supplier));

    assert_eq!(ctx.router.navigate("/login")?.location, "/dashboard-supplier");
    assert_eq!(ctx.router.navigate("/register")?.location, "/dashboard-supplier");
    assert_eq!(ctx.router.navigate("/product-list")?.location, "/dashboard-supplier");

    ctx.client.logout();
    assert_eq!(ctx.router.location(), "/login");
    assert_eq!(ctx.router.navigate("/product-catalog")?.location, "/login");
    Ok(())
}
