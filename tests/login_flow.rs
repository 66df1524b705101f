use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nowplaying_pkce::{
    ApiError, App, AppState, ClientConfig, EphemeralStore, MemoryStore, NowPlaying, OAuthConfig,
    PageLoad, PlaybackAction, Role,
};

const PAGE: &str = "https://example.com/app/";

/// Token endpoint and Web API that only honour playback control for tokens
/// issued to a login that asked for `user-modify-playback-state`.
async fn spotify() -> MockServer {
    let server = MockServer::start().await;

    for (code, token) in [("read-code", "read-token"), ("write-code", "write-token")] {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains(format!("code={code}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": token })),
            )
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .and(header("Authorization", "Bearer expired-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    for token in ["read-token", "write-token"] {
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .and(header("Authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "is_playing": true,
                "item": {
                    "name": "Song",
                    "artists": [{ "name": "Band" }],
                    "album": { "name": "Record", "images": [] }
                }
            })))
            .mount(&server)
            .await;
    }

    for action in ["play", "pause"] {
        Mock::given(method("PUT"))
            .and(path(format!("/v1/me/player/{action}")))
            .and(header("Authorization", "Bearer write-token"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/v1/me/player/{action}")))
            .and(header("Authorization", "Bearer read-token"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
    }

    server
}

fn app(server: &MockServer) -> (App<MemoryStore>, Arc<MemoryStore>) {
    let oauth = OAuthConfig::new("test-client", PAGE.parse().unwrap())
        .with_token_url(format!("{}/api/token", server.uri()).parse().unwrap())
        .with_api_url(format!("{}/v1", server.uri()).parse().unwrap());
    let config = ClientConfig::new(oauth).with_settle_delay(Duration::ZERO);
    let store = Arc::new(MemoryStore::new());
    (App::new(config, store.clone()), store)
}

/// Plays the authorization server: reads the login URL and redirects back
/// with a code whose power matches the requested scope.
fn authorize(login_url: &Url, code_override: Option<&str>) -> Url {
    let params: HashMap<String, String> = login_url.query_pairs().into_owned().collect();
    let code = code_override.unwrap_or(if params["scope"].contains("user-modify-playback-state") {
        "write-code"
    } else {
        "read-code"
    });

    let mut page: Url = params["redirect_uri"].parse().unwrap();
    page.query_pairs_mut()
        .append_pair("code", code)
        .append_pair("state", &params["state"]);
    page
}

async fn sign_in(app: &mut App<MemoryStore>, role: Role) {
    let page = authorize(&app.login(role), None);
    let PageLoad::SignedIn { role: signed_in, location } = app.on_page_load(&page).await.unwrap()
    else {
        panic!("expected a completed login");
    };
    assert_eq!(signed_in, role);
    assert_eq!(location.as_str(), PAGE);
}

#[tokio::test]
async fn fresh_page_load_stays_logged_out() {
    let server = spotify().await;
    let (mut app, _) = app(&server);

    let outcome = app.on_page_load(&PAGE.parse().unwrap()).await.unwrap();

    assert!(matches!(outcome, PageLoad::Idle));
    assert_eq!(app.state(), AppState::LoggedOut);
    assert!(matches!(app.refresh().await, Err(ApiError::NotAuthenticated)));
}

#[tokio::test]
async fn viewer_can_read_but_not_control() {
    let server = spotify().await;
    let (mut app, store) = app(&server);

    sign_in(&mut app, Role::Viewer).await;

    assert_eq!(app.state(), AppState::Authenticated(Role::Viewer));
    assert!(!app.controls_enabled());
    assert_eq!(store.get("pkce_verifier"), None);
    assert_eq!(store.get("auth_state"), None);

    let NowPlaying::Track(track) = app.refresh().await.unwrap() else {
        panic!("expected a track");
    };
    assert_eq!(track.name, "Song");

    let err = app.control(PlaybackAction::Pause).await.unwrap_err();
    assert!(matches!(err, ApiError::InsufficientPrivilege));
    assert_eq!(app.state(), AppState::Authenticated(Role::Viewer));
}

#[tokio::test]
async fn manager_controls_playback() {
    let server = spotify().await;
    let (mut app, _) = app(&server);

    sign_in(&mut app, Role::Manager).await;

    assert!(app.controls_enabled());
    let now = app.control(PlaybackAction::Pause).await.unwrap();
    assert!(matches!(now, NowPlaying::Track(_)));
}

#[tokio::test]
async fn replayed_callback_is_rejected() {
    let server = spotify().await;
    let (mut app, _) = app(&server);

    let page = authorize(&app.login(Role::Manager), None);
    app.on_page_load(&page).await.unwrap();

    let err = app.on_page_load(&page).await.unwrap_err();
    assert!(matches!(err, nowplaying_pkce::AuthError::CsrfMismatch));
}

#[tokio::test]
async fn expired_token_logs_out() {
    let server = spotify().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=stale-code"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access_token": "expired-token" })),
        )
        .mount(&server)
        .await;
    let (mut app, store) = app(&server);

    let page = authorize(&app.login(Role::Manager), Some("stale-code"));
    app.on_page_load(&page).await.unwrap();
    assert_eq!(app.state(), AppState::Authenticated(Role::Manager));

    let err = app.refresh().await.unwrap_err();

    assert!(matches!(err, ApiError::TokenExpired));
    assert_eq!(app.state(), AppState::LoggedOut);
    assert!(store.is_empty());
}

#[tokio::test]
async fn logout_returns_remote_logout_page() {
    let server = spotify().await;
    let (mut app, store) = app(&server);
    sign_in(&mut app, Role::Manager).await;

    let url = app.logout();

    assert_eq!(url.as_str(), "https://www.spotify.com/logout/");
    assert_eq!(app.state(), AppState::LoggedOut);
    assert!(store.is_empty());
}
