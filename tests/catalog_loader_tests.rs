//! # Catalog Loader Tests
//!
//! Exercises the loader against a small in-process HTTP server and local
//! catalog files.

use anyhow::Result;
use meal_planner::catalog_loader::CatalogLoader;
use meal_planner::planner_config::{CatalogSource, PlannerConfig, RecoveryConfig};
use meal_planner::planner_errors::CatalogError;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_recipes.json");

/// Serve canned responses; request N gets `responses[min(N, last)]`
async fn serve(responses: Vec<(u16, String)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let hit = counter.fetch_add(1, Ordering::SeqCst);
            let (status, body) = responses[hit.min(responses.len() - 1)].clone();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}/recipes.json"), hits)
}

fn http_config(url: &str, max_retries: u32) -> PlannerConfig {
    PlannerConfig {
        source: CatalogSource::Http(url.to_string()),
        use_system_proxy: false,
        recovery: RecoveryConfig {
            max_retries,
            base_retry_delay_ms: 1,
            max_retry_delay_ms: 5,
            request_timeout_secs: 5,
            circuit_breaker_threshold: 2,
            circuit_breaker_reset_secs: 60,
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_http_load_success() -> Result<()> {
    let (url, hits) = serve(vec![(200, SAMPLE_CATALOG.to_string())]).await;
    let loader = CatalogLoader::new(&http_config(&url, 0))?;

    let (recipes, report) = loader.load().await?;
    assert_eq!(recipes.len(), 4);
    assert!(recipes.iter().all(|recipe| !recipe.selected));
    assert_eq!(report.accepted, 4);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].recipe_name.as_deref(), Some("Mystery Dish"));
    assert_eq!(report.attempts, 1);
    assert_eq!(report.source, url);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_retried() -> Result<()> {
    let (url, hits) = serve(vec![
        (503, "{}".to_string()),
        (200, SAMPLE_CATALOG.to_string()),
    ])
    .await;
    let loader = CatalogLoader::new(&http_config(&url, 2))?;

    let (recipes, report) = loader.load().await?;
    assert_eq!(recipes.len(), 4);
    assert_eq!(report.attempts, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_retries_are_bounded() -> Result<()> {
    let (url, hits) = serve(vec![(500, "oops".to_string())]).await;
    let loader = CatalogLoader::new(&http_config(&url, 2))?;

    let err = loader.load().await.unwrap_err();
    assert_eq!(err, CatalogError::HttpStatus { status: 500, url: url.clone() });
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_not_retried() -> Result<()> {
    let (url, hits) = serve(vec![(404, "missing".to_string())]).await;
    let loader = CatalogLoader::new(&http_config(&url, 3))?;

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, CatalogError::HttpStatus { status: 404, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_non_array_body_fails_the_load() -> Result<()> {
    let (url, _hits) = serve(vec![(200, r#"{"recipes": []}"#.to_string())]).await;
    let loader = CatalogLoader::new(&http_config(&url, 0))?;

    assert!(matches!(loader.load().await, Err(CatalogError::Parse(_))));
    Ok(())
}

#[tokio::test]
async fn test_circuit_opens_after_failed_loads() -> Result<()> {
    let (url, hits) = serve(vec![(500, "down".to_string())]).await;
    let loader = CatalogLoader::new(&http_config(&url, 0))?;

    assert!(loader.load().await.is_err());
    assert!(loader.load().await.is_err());
    assert!(loader.circuit_breaker().is_open());

    // Fails fast without reaching the server
    assert!(matches!(loader.load().await, Err(CatalogError::CircuitOpen(_))));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_file_source() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(SAMPLE_CATALOG.as_bytes())?;

    let config = PlannerConfig {
        source: CatalogSource::File(file.path().to_path_buf()),
        ..Default::default()
    };
    let loader = CatalogLoader::new(&config)?;

    let (recipes, report) = loader.load().await?;
    assert_eq!(recipes.len(), 4);
    assert!(report.source.starts_with("file://"));
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_an_io_error() -> Result<()> {
    let config = PlannerConfig {
        source: CatalogSource::File("/nonexistent/meal-planner/recipes.json".into()),
        ..Default::default()
    };
    let loader = CatalogLoader::new(&config)?;

    assert!(matches!(loader.load().await, Err(CatalogError::Io(_))));
    Ok(())
}
