#![allow(dead_code)]

use book_service::config::{BookConfig, ErrorContract, MongoConfig};
use book_service::services::{BookStore, InMemoryBookStore};
use book_service::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn BookStore>,
    pub client: reqwest::Client,
}

pub fn test_config(error_contract: ErrorContract) -> BookConfig {
    BookConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: Secret::new("mongodb://localhost:27017".to_string()),
            database: "book_test".to_string(),
        },
        error_contract,
    }
}

impl TestApp {
    /// Legacy contract over a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(ErrorContract::Legacy, Arc::new(InMemoryBookStore::new())).await
    }

    pub async fn spawn_with(error_contract: ErrorContract, store: Arc<dyn BookStore>) -> Self {
        let app = Application::build_with_store(test_config(error_contract), store)
            .await
            .expect("Failed to build test application");
        Self::serve(app).await
    }

    /// Run an already built application in the background.
    pub async fn serve(app: Application) -> Self {
        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_book(&self, title: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/books"))
            .form(&[("title", title)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn add_comment(&self, id: &str, comment: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/books/{}", id)))
            .form(&[("comment", comment)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}
