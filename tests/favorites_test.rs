use axum::http::{Method, StatusCode};
use bulletin_board_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_favorite_lifecycle() {
    let app = TestApp::new();
    app.seed_game("g1", "Celeste", "2018-01-25").await;
    let (alice_id, alice) = app.sign_up("alice@example.com", false).await;
    let check_uri = format!("/favorites/check/{}/g1", alice_id);
    let remove_uri = format!("/favorites/{}/g1", alice_id);

    let (status, added) = app
        .send(Method::POST, "/favorites", Some(&alice), Some(json!({ "gameId": "g1" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["favoriteId"], format!("{}_g1", alice_id));

    let (status, body) = app
        .send(Method::POST, "/favorites", Some(&alice), Some(json!({ "gameId": "g1" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["category"], "conflict");

    let (_, check) = app.get(&check_uri, Some(&alice)).await;
    assert_eq!(check["isFavorited"], true);

    let (status, listed) = app
        .get(&format!("/favorites/user/{}", alice_id), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["game"]["title"], "Celeste");

    let (status, _) = app.send(Method::DELETE, &remove_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, check) = app.get(&check_uri, Some(&alice)).await;
    assert_eq!(check["isFavorited"], false);

    let (status, body) = app.send(Method::DELETE, &remove_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["category"], "not_found");
}

#[tokio::test]
async fn test_favorites_are_private() {
    let app = TestApp::new();
    app.seed_game("g1", "Celeste", "2018-01-25").await;
    let (alice_id, alice) = app.sign_up("alice@example.com", false).await;
    let (_, bob) = app.sign_up("bob@example.com", false).await;
    app.send(Method::POST, "/favorites", Some(&alice), Some(json!({ "gameId": "g1" })))
        .await;

    let (status, body) = app
        .get(&format!("/favorites/user/{}", alice_id), Some(&bob))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["category"], "forbidden");

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/favorites/{}/g1", alice_id),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/favorites/user/{}", alice_id), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorite_of_missing_game_is_not_found() {
    let app = TestApp::new();
    let (_, alice) = app.sign_up("alice@example.com", false).await;

    let (status, body) = app
        .send(Method::POST, "/favorites", Some(&alice), Some(json!({ "gameId": "nope" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["category"], "not_found");
}
