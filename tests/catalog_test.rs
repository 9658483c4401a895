//! Catalog client tests
//!
//! Tests request shape (path, ordered query, auth headers), typed decoding
//! and the failure taxonomy.

use mockito::{Matcher, Server};
use cinedeck::api::{Catalog, CatalogClient, NetworkError};
use cinedeck::models::MovieList;

fn mock_list_response() -> &'static str {
    r#"{
        "page": 1,
        "results": [
            {
                "id": 268,
                "title": "Batman",
                "poster_path": "/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg",
                "backdrop_path": "/frDS8A5vIP927KYAxTVVKRIbqZw.jpg",
                "vote_average": 7.2
            },
            {
                "id": 414906,
                "title": "The Batman",
                "poster_path": null,
                "backdrop_path": null,
                "vote_average": 7.7
            }
        ],
        "total_pages": 1,
        "total_results": 2
    }"#
}

// =============================================================================
// Request Shape
// =============================================================================

#[tokio::test]
async fn test_search_sends_bearer_and_query() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "batman".into()))
        .match_header("authorization", "Bearer test_token")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_list_response())
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("test_token", server.url());
    let results = client.search("batman").await.unwrap();

    mock.assert_async().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 268);
    assert_eq!(results[0].title, "Batman");
    assert_eq!(
        results[0].poster_url("w500").as_deref(),
        Some("https://image.tmdb.org/t/p/w500/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg")
    );
    assert!(results[1].poster_path.is_none());
}

#[tokio::test]
async fn test_search_encodes_keyword() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "dark knight & co".into()))
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let results = client.search("dark knight & co").await.unwrap();

    mock.assert_async().await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_discover_uses_genre_param() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("with_genres".into(), "28".into()))
        .with_status(200)
        .with_body(mock_list_response())
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let results = client.discover(28).await.unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_feed_paths() {
    let mut server = Server::new_async().await;

    let now_playing = server
        .mock("GET", "/movie/now_playing")
        .with_status(200)
        .with_body(mock_list_response())
        .create_async()
        .await;
    let top_rated = server
        .mock("GET", "/movie/top_rated")
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    assert_eq!(client.movie_list(MovieList::NowPlaying).await.unwrap().len(), 2);
    assert!(client.movie_list(MovieList::TopRated).await.unwrap().is_empty());

    now_playing.assert_async().await;
    top_rated.assert_async().await;
}

// =============================================================================
// Detail, Recommendations, Genres
// =============================================================================

#[tokio::test]
async fn test_movie_detail() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/550")
        .with_status(200)
        .with_body(
            r#"{
                "id": 550,
                "title": "Fight Club",
                "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
                "vote_average": 8.4,
                "overview": "A ticking-time-bomb insomniac and a slippery soap salesman...",
                "original_language": "en",
                "release_date": "1999-10-15",
                "popularity": 61.416,
                "vote_count": 26280,
                "runtime": 139
            }"#,
        )
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let detail = client.movie_detail(550).await.unwrap();

    mock.assert_async().await;

    assert_eq!(detail.id, 550);
    assert_eq!(detail.title, "Fight Club");
    assert_eq!(detail.original_language, "en");
    assert_eq!(detail.year(), Some(1999));
    assert_eq!(detail.vote_count, 26280);
    assert!((detail.popularity - 61.416).abs() < 1e-9);
}

#[tokio::test]
async fn test_recommendations_path() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/550/recommendations")
        .with_status(200)
        .with_body(mock_list_response())
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let recs = client.recommendations(550).await.unwrap();

    mock.assert_async().await;
    assert_eq!(recs.len(), 2);
}

#[tokio::test]
async fn test_genres() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/genre/movie/list")
        .with_status(200)
        .with_body(r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let genres = client.genres().await.unwrap();

    mock.assert_async().await;
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].name, "Adventure");
}

#[tokio::test]
async fn test_fetch_returns_raw_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/configuration")
        .with_status(200)
        .with_body(r#"{"images": {"base_url": "http://image.tmdb.org/t/p/"}}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let body = client.fetch("configuration", &[]).await.unwrap();
    assert_eq!(body["images"]["base_url"], "http://image.tmdb.org/t/p/");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_not_found_is_http_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/999999999")
        .with_status(404)
        .with_body(r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let err = client.movie_detail(999999999).await.unwrap_err();
    assert_eq!(err, NetworkError::Http { status: 404 });
}

#[tokio::test]
async fn test_unauthorized_is_http_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/genre/movie/list")
        .with_status(401)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("bad", server.url());
    let err = client.genres().await.unwrap_err();
    assert_eq!(err, NetworkError::Http { status: 401 });
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/popular")
        .with_status(429)
        .with_header("Retry-After", "1")
        .expect(1)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let err = client.movie_list(MovieList::Popular).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err, NetworkError::Http { status: 429 });
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let err = client.search("x").await.unwrap_err();
    assert!(matches!(err, NetworkError::Decode(_)));
}

#[tokio::test]
async fn test_wrong_envelope_is_decode_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/upcoming")
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url());
    let err = client.movie_list(MovieList::Upcoming).await.unwrap_err();
    assert!(matches!(err, NetworkError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Nothing listens on port 1
    let client = CatalogClient::with_base_url("k", "http://127.0.0.1:1/3");
    let err = client.genres().await.unwrap_err();
    assert!(matches!(err, NetworkError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_bounds_unanswered_request() {
    // Accepts connections into the backlog but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let client = CatalogClient::with_base_url("k", format!("http://{}", addr))
        .with_timeout(std::time::Duration::from_millis(100))
        .unwrap();
    let err = client.genres().await.unwrap_err();
    assert!(matches!(err, NetworkError::Transport(_)));
    drop(listener);
}

#[tokio::test]
async fn test_timeout_client_still_answers() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/genre/movie/list")
        .with_status(200)
        .with_body(r#"{"genres": []}"#)
        .create_async()
        .await;

    let client = CatalogClient::with_base_url("k", server.url())
        .with_timeout(std::time::Duration::from_secs(5))
        .unwrap();
    assert!(client.genres().await.unwrap().is_empty());
}
