mod common;

use common::{artist_json, client_for, track_json};
use genrify::{
    Error,
    spotify::{
        artists::{ArtistGenreResolver, get_artist_details},
        filter::{count_genres, filter_songs_by_genre},
    },
    types::Track,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn track(id: &str, artist_ids: &[&str]) -> Track {
    serde_json::from_value(track_json(id, artist_ids)).unwrap()
}

async fn mount_artist(server: &MockServer, id: &str, genres: &[&str], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/artists/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(artist_json(id, genres)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_keeps_tracks_whose_first_artist_has_genre() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze"], 1).await;
    mount_artist(&server, "y", &["pop"], 1).await;

    let tracks = vec![track("a", &["x"]), track("b", &["y"])];
    let ids = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap();

    assert_eq!(ids, vec!["a".to_string()]);
}

#[tokio::test]
async fn test_only_first_artist_counts() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["pop"], 1).await;
    mount_artist(&server, "y", &["shoegaze"], 0).await;

    let tracks = vec![track("a", &["x", "y"])];
    let ids = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap();

    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_genre_match_is_exact() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["Shoegaze", "nu gaze", "shoegaze revival"], 1).await;

    let tracks = vec![track("a", &["x"])];
    let ids = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap();

    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_output_keeps_input_order() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze"], 1).await;
    mount_artist(&server, "y", &["shoegaze", "dream pop"], 1).await;

    let tracks = vec![
        track("c", &["y"]),
        track("a", &["x"]),
        track("b", &["y"]),
    ];
    let ids = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap();

    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_shared_artist_is_fetched_once() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze"], 1).await;

    let tracks = vec![track("a", &["x"]), track("b", &["x"]), track("c", &["x"])];
    let ids = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap();

    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_tracks_without_artists_are_skipped() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze"], 1).await;

    let tracks = vec![track("lonely", &[]), track("a", &["x"])];
    let ids = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap();

    assert_eq!(ids, vec!["a"]);
}

#[tokio::test]
async fn test_failed_lookup_aborts_without_partial_output() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze"], 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/artists/broken"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"not found\"}"))
        .expect(1)
        .mount(&server)
        .await;
    mount_artist(&server, "z", &["shoegaze"], 0).await;

    let tracks = vec![
        track("a", &["x"]),
        track("b", &["broken"]),
        track("c", &["z"]),
    ];
    let err = filter_songs_by_genre(&client_for(&server), &tracks, "shoegaze")
        .await
        .unwrap_err();

    match err {
        Error::Api { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("not found"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_artist_details_decodes_genres() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze", "dream pop"], 1).await;

    let artist = get_artist_details(&client_for(&server), "x").await.unwrap();
    assert_eq!(artist.id, "x");
    assert!(artist.has_genre("shoegaze"));
    assert!(artist.has_genre("dream pop"));
    assert!(!artist.has_genre("pop"));
}

#[tokio::test]
async fn test_resolver_does_not_cache_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_artist(&server, "flaky", &["pop"], 1).await;

    let client = client_for(&server);
    let mut resolver = ArtistGenreResolver::new(&client);

    assert!(resolver.resolve("flaky").await.is_err());
    assert!(resolver.resolve("flaky").await.unwrap().has_genre("pop"));
    assert!(resolver.resolve("flaky").await.unwrap().has_genre("pop"));
    assert_eq!(resolver.lookups(), 1);
}

#[tokio::test]
async fn test_count_genres_tallies_first_artists() {
    let server = MockServer::start().await;
    mount_artist(&server, "x", &["shoegaze", "dream pop"], 1).await;
    mount_artist(&server, "y", &["shoegaze"], 1).await;

    let tracks = vec![
        track("a", &["x"]),
        track("b", &["y", "x"]),
        track("c", &[]),
        track("d", &["x"]),
    ];
    let counts = count_genres(&client_for(&server), &tracks).await.unwrap();

    assert_eq!(counts.get("shoegaze"), Some(&3));
    assert_eq!(counts.get("dream pop"), Some(&2));
    assert_eq!(counts.len(), 2);
}
