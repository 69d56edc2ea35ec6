//! # Live Server Tests
//!
//! Binds a real listener on an ephemeral port and talks to it over HTTP,
//! covering what `oneshot` cannot: peer-address resolution, the background
//! sweep task and graceful shutdown.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{submission, valid_submission};
    use contact_gateway::{ContactGatewayService, GatewayConfig, ManualClock, RecordingMailer};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::Arc;
    use std::time::Duration;

    fn local_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.http.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.http.port = 0;
        config
    }

    async fn start(
        config: GatewayConfig,
    ) -> (ContactGatewayService, SocketAddr, Arc<RecordingMailer>, Arc<ManualClock>) {
        let mailer = Arc::new(RecordingMailer::configured());
        let clock = Arc::new(ManualClock::new());
        let mut service = ContactGatewayService::new(config, mailer.clone(), clock.clone())
            .expect("valid config");
        let addr = service.start().await.expect("listener binds");
        (service, addr, mailer, clock)
    }

    async fn post(client: &reqwest::Client, addr: SocketAddr, body: String) -> reqwest::Response {
        client
            .post(format!("http://{addr}/api/contact"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("request sent")
    }

    #[tokio::test]
    async fn test_submission_over_http() {
        let (mut service, addr, mailer, _clock) = start(local_config()).await;
        let client = reqwest::Client::new();

        let response = post(&client, addr, valid_submission()).await;

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(mailer.sent_count(), 1);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_peer_address_is_the_source_by_default() {
        let (mut service, addr, _mailer, _clock) = start(local_config()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{addr}/api/contact"))
            .header("content-type", "application/json")
            .header("x-forwarded-for", "203.0.113.99")
            .body(submission("", "", ""))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let store = service.rate_limit_store();
        assert_eq!(store.count_for("127.0.0.1"), Some(1));
        assert_eq!(store.count_for("203.0.113.99"), None);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_background_sweep_clears_expired_sources() {
        let mut config = local_config();
        config.rate_limit.window = Duration::from_secs(60);
        config.rate_limit.sweep_interval = Duration::from_millis(20);
        let (mut service, addr, _mailer, clock) = start(config).await;
        let client = reqwest::Client::new();

        post(&client, addr, valid_submission()).await;
        let store = service.rate_limit_store();
        assert_eq!(store.tracked_sources(), 1);

        clock.advance(Duration::from_secs(61));

        let mut cleared = false;
        for _ in 0..50 {
            if store.tracked_sources() == 0 {
                cleared = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(cleared, "sweep task should remove the expired record");

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_listener() {
        let (mut service, addr, _mailer, _clock) = start(local_config()).await;

        let status = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::OK);

        service.shutdown().await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert!(client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .is_err());
    }
}
