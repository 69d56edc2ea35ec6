//! # Contact Flow Tests
//!
//! Drives the router in-process with `oneshot`, using a manual clock so
//! window expiry needs no sleeping and a recording mailer so sends can be
//! counted.
//!
//! ## Test Categories
//!
//! 1. **Happy Path**: valid submission is relayed
//! 2. **Validation**: each field rule maps to its 400 message
//! 3. **Rate Limiting**: per-source window, Retry-After, expiry and sweep
//! 4. **Failure Modes**: missing credentials, transport errors
//! 5. **HTTP Surface**: CORS, methods, malformed bodies
//! 6. **Form Agreement**: the form's banner reads the endpoint's replies

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{proxied_config, submission, valid_submission, Fixture};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use contact_gateway::{Clock, GatewayConfig, MailError, RecordingMailer, SUCCESS_MESSAGE};
    use shared_types::{prepare_submission, FormAction, StatusBanner, SubmissionRequest};
    use std::time::Duration;

    const CLIENT: &str = "203.0.113.10";
    const HOUR: Duration = Duration::from_secs(3600);

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[tokio::test]
    async fn test_valid_submission_is_relayed() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let reply = fixture.post(&valid_submission(), CLIENT).await;

        assert_eq!(reply.status, StatusCode::OK);
        let body = reply.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], SUCCESS_MESSAGE);

        let sent = fixture.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "grace@example.com");
        assert_eq!(sent[0].subject, "Portfolio Contact: Grace Hopper");
        assert!(sent[0].text_body.contains("Would love to talk about compilers."));
    }

    #[tokio::test]
    async fn test_fields_are_trimmed_before_relay() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let reply = fixture
            .post(
                &submission("  Grace  ", " grace@example.com ", "  Ten chars at least  "),
                CLIENT,
            )
            .await;

        assert_eq!(reply.status, StatusCode::OK);
        let sent = fixture.mailer.sent();
        assert_eq!(sent[0].reply_to, "grace@example.com");
        assert_eq!(sent[0].subject, "Portfolio Contact: Grace");
    }

    #[tokio::test]
    async fn test_honeypot_gets_success_but_no_mail() {
        let fixture = Fixture::new(RecordingMailer::configured());
        let body = serde_json::json!({
            "name": "Bot",
            "email": "bot@example.com",
            "message": "Buy cheap things today!",
            "honeypot": "https://spam.example",
        })
        .to_string();

        let reply = fixture.post(&body, CLIENT).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["success"], true);
        assert_eq!(fixture.mailer.attempts(), 0);
    }

    // =============================================================================
    // VALIDATION
    // =============================================================================

    #[tokio::test]
    async fn test_validation_messages() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let cases = [
            (submission("", "a@b.com", "1234567890"), "All fields are required"),
            (
                submission("A", "not-an-email", "1234567890"),
                "Invalid email format",
            ),
            (submission("A", "a@b.com", "short"), "Message is too short"),
            ("{}".to_string(), "All fields are required"),
            (
                r#"{"name":null,"email":"a@b.com","message":"1234567890"}"#.to_string(),
                "All fields are required",
            ),
        ];

        for (index, (body, expected)) in cases.iter().enumerate() {
            // separate sources so the limiter stays out of the way
            let client = format!("198.51.100.{}", index + 1);
            let reply = fixture.post(body, &client).await;

            assert_eq!(reply.status, StatusCode::BAD_REQUEST, "case {index}");
            assert_eq!(reply.json()["error"], *expected, "case {index}");
        }
        assert_eq!(fixture.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_exactly_ten_characters_is_enough() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let reply = fixture
            .post(&submission("A", "a@b.com", "1234567890"), CLIENT)
            .await;

        assert_eq!(reply.status, StatusCode::OK);
    }

    // =============================================================================
    // RATE LIMITING
    // =============================================================================

    #[tokio::test]
    async fn test_sixth_request_in_window_is_denied() {
        let fixture = Fixture::new(RecordingMailer::configured());

        for _ in 0..5 {
            let reply = fixture.post(&valid_submission(), CLIENT).await;
            assert_eq!(reply.status, StatusCode::OK);
        }

        let reply = fixture.post(&valid_submission(), CLIENT).await;
        assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            reply.json()["error"],
            "Too many requests. Please try again later."
        );
        assert_eq!(reply.headers.get("retry-after").unwrap(), "3600");
        assert_eq!(fixture.mailer.sent_count(), 5);
    }

    #[tokio::test]
    async fn test_invalid_attempts_count_too() {
        let fixture = Fixture::new(RecordingMailer::configured());

        for _ in 0..5 {
            let reply = fixture.post(&submission("", "", ""), CLIENT).await;
            assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        }

        let reply = fixture.post(&valid_submission(), CLIENT).await;
        assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(fixture.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_window_expiry_allows_again() {
        let fixture = Fixture::new(RecordingMailer::configured());

        for _ in 0..5 {
            fixture.post(&valid_submission(), CLIENT).await;
        }
        fixture.clock.advance(Duration::from_secs(1800));
        let reply = fixture.post(&valid_submission(), CLIENT).await;
        assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(reply.headers.get("retry-after").unwrap(), "1800");

        fixture.clock.advance(Duration::from_secs(1801));
        let reply = fixture.post(&valid_submission(), CLIENT).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sources_are_limited_independently() {
        let mut config = proxied_config();
        config.rate_limit.max_requests = 1;
        let fixture = Fixture::with_config(config, RecordingMailer::configured());

        assert_eq!(
            fixture.post(&valid_submission(), "203.0.113.1").await.status,
            StatusCode::OK
        );
        assert_eq!(
            fixture.post(&valid_submission(), "203.0.113.1").await.status,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            fixture.post(&valid_submission(), "203.0.113.2").await.status,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_requests_without_origin_share_a_bucket() {
        let mut config = proxied_config();
        config.rate_limit.max_requests = 1;
        let fixture = Fixture::with_config(config, RecordingMailer::configured());

        let anonymous = || {
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("content-type", "application/json")
                .body(Body::from(valid_submission()))
                .unwrap()
        };

        assert_eq!(fixture.send(anonymous()).await.status, StatusCode::OK);
        assert_eq!(
            fixture.send(anonymous()).await.status,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            fixture.service.rate_limit_store().count_for("unknown"),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_default_config_ignores_forwarded_headers() {
        let fixture = Fixture::with_config(GatewayConfig::default(), RecordingMailer::configured());

        // a fresh spoofed address per request must not buy a fresh bucket
        for index in 0..5 {
            let reply = fixture
                .post(&valid_submission(), &format!("198.51.100.{}", index + 1))
                .await;
            assert_eq!(reply.status, StatusCode::OK);
        }
        let reply = fixture.post(&valid_submission(), "198.51.100.99").await;

        assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(fixture.mailer.sent_count(), 5);
        let store = fixture.service.rate_limit_store();
        assert_eq!(store.tracked_sources(), 1);
        assert_eq!(store.count_for("198.51.100.1"), None);
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_source() {
        let fixture = Fixture::new(RecordingMailer::configured());
        let store = fixture.service.rate_limit_store();

        fixture.post(&valid_submission(), CLIENT).await;
        assert_eq!(store.count_for(CLIENT), Some(1));

        fixture.clock.advance(HOUR);
        assert_eq!(store.sweep(fixture.clock.now()), 0);

        fixture.clock.advance(Duration::from_secs(1));
        assert_eq!(store.sweep(fixture.clock.now()), 1);
        assert_eq!(store.count_for(CLIENT), None);
        assert_eq!(store.tracked_sources(), 0);
    }

    // =============================================================================
    // FAILURE MODES
    // =============================================================================

    #[tokio::test]
    async fn test_missing_credentials_is_configuration_error() {
        let fixture = Fixture::new(RecordingMailer::unconfigured());

        let reply = fixture.post(&valid_submission(), CLIENT).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.json()["error"],
            "Server configuration error. Please try again later."
        );
        assert_eq!(fixture.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        let detail = "535 5.7.8 Username and Password not accepted for owner@example.com";
        let fixture = Fixture::new(RecordingMailer::failing(MailError::Transport(
            detail.to_string(),
        )));

        let reply = fixture.post(&valid_submission(), CLIENT).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.json()["error"],
            "Failed to send message. Please try again later."
        );
        assert!(!reply.body.contains("535"));
        assert!(!reply.body.contains("owner@example.com"));
        assert_eq!(fixture.mailer.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_relay_times_out() {
        let mut config = proxied_config();
        config.timeouts.send = Duration::from_secs(2);
        let fixture = Fixture::with_config(
            config,
            RecordingMailer::configured().with_delay(Duration::from_secs(20)),
        );

        let reply = fixture.post(&valid_submission(), CLIENT).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fixture.mailer.sent_count(), 0);
    }

    // =============================================================================
    // HTTP SURFACE
    // =============================================================================

    #[tokio::test]
    async fn test_cors_preflight() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let reply = fixture
            .send(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/contact")
                    .header("origin", "https://portfolio.example")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.headers.get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(reply.headers.get("access-control-max-age").unwrap(), "86400");
        assert_eq!(fixture.service.rate_limit_store().tracked_sources(), 0);
    }

    #[tokio::test]
    async fn test_error_responses_carry_cors_headers() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let reply = fixture
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header("origin", "https://portfolio.example")
                    .header("content-type", "application/json")
                    .body(Body::from(submission("", "", "")))
                    .unwrap(),
            )
            .await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.headers.get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_other_methods_are_405() {
        let fixture = Fixture::new(RecordingMailer::configured());

        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let reply = fixture
                .send(
                    Request::builder()
                        .method(method)
                        .uri("/api/contact")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await;

            assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(reply.json()["error"], "Method not allowed");
        }
        assert_eq!(fixture.service.rate_limit_store().tracked_sources(), 0);
    }

    #[tokio::test]
    async fn test_malformed_bodies() {
        let fixture = Fixture::new(RecordingMailer::configured());

        for (index, body) in ["not json", "[1, 2, 3]", "\"text\"", "{\"name\": 5}"]
            .iter()
            .enumerate()
        {
            let client = format!("192.0.2.{}", index + 1);
            let reply = fixture.post(body, &client).await;

            assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(reply.json()["error"], "Invalid request body");
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = proxied_config();
        config.limits.max_body_size = 256;
        let fixture = Fixture::with_config(config, RecordingMailer::configured());

        let body = submission("Ada", "ada@example.com", &"x".repeat(1024));
        let request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("content-type", "application/json")
            .header("origin", "https://folio.example")
            .header("x-forwarded-for", CLIENT)
            .body(Body::from(body))
            .unwrap();
        let reply = fixture.send(request).await;

        assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(reply.json()["error"], "Invalid request body");
        // the body limit sits inside the CORS layer
        assert_eq!(
            reply.headers.get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(fixture.mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let fixture = Fixture::new(RecordingMailer::configured());
        fixture.post(&valid_submission(), CLIENT).await;
        fixture.post(&submission("", "", ""), "192.0.2.50").await;

        let health = fixture
            .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(health.status, StatusCode::OK);
        assert_eq!(health.json()["status"], "ok");
        assert_eq!(health.json()["tracked_sources"], 2);

        let metrics = fixture
            .send(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await;
        let metrics = metrics.json();
        assert_eq!(metrics["submissions"]["total"], 2);
        assert_eq!(metrics["submissions"]["accepted"], 1);
        assert_eq!(metrics["rejected"]["validation"], 1);
    }

    // =============================================================================
    // FORM AGREEMENT
    // =============================================================================

    #[tokio::test]
    async fn test_form_banner_reads_endpoint_replies() {
        let fixture = Fixture::new(RecordingMailer::configured());

        let form = SubmissionRequest::new("Ada", "ada@example.com", "Hello from the form!")
            .with_honeypot("");
        let FormAction::Submit(payload) = prepare_submission(&form) else {
            panic!("form should submit");
        };
        let body = serde_json::to_string(&payload).unwrap();

        let reply = fixture.post(&body, CLIENT).await;
        let banner = StatusBanner::from_response(reply.status.as_u16(), &reply.body);
        assert!(banner.is_success());
        assert_eq!(fixture.mailer.sent_count(), 1);

        let reply = fixture
            .post(&submission("A", "a@b.com", "short"), CLIENT)
            .await;
        let banner = StatusBanner::from_response(reply.status.as_u16(), &reply.body);
        assert_eq!(
            banner,
            StatusBanner::Error("Message is too short".to_string())
        );
    }

    #[tokio::test]
    async fn test_form_and_endpoint_agree_on_invalid_email() {
        let request = SubmissionRequest::new("Ada", "ada@example", "Long enough message");
        assert!(matches!(
            prepare_submission(&request),
            FormAction::ShowErrors(_)
        ));

        let fixture = Fixture::new(RecordingMailer::configured());
        let reply = fixture
            .post(&serde_json::to_string(&request).unwrap(), CLIENT)
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json()["error"], "Invalid email format");
    }
}
