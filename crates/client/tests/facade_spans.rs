//! Verifies the facade's span-per-operation contract: one named span per
//! call, closed on success and failure alike.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt as _};
use tracing_subscriber::registry::LookupSpan;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cartwheel_client::http::ApiClient;
use cartwheel_client::services::OrderService;
use cartwheel_core::CouponCode;

/// Counts open/close events for spans with a given name.
#[derive(Clone)]
struct SpanCounter {
    name: &'static str,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl SpanCounter {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<S> Layer<S> for SpanCounter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: Context<'_, S>,
    ) {
        if attrs.metadata().name() == self.name {
            self.opened.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            if span.name() == self.name {
                self.closed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

async fn bare_service(server: &MockServer) -> OrderService {
    let client = ApiClient::builder(server.uri().parse().expect("server uri"))
        .build()
        .expect("build client");
    OrderService::new(client)
}

#[tokio::test]
async fn list_products_opens_and_closes_one_span() {
    let counter = SpanCounter::new("list_products");
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(counter.clone()),
    );

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let service = bare_service(&server).await;
    service.list_products().await.expect("list products");

    assert_eq!(counter.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counter.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_operation_still_closes_its_span() {
    let counter = SpanCounter::new("validate_coupon");
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(counter.clone()),
    );

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/coupons/validate"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"error": "boom"})),
        )
        .mount(&server)
        .await;

    let service = bare_service(&server).await;
    service
        .validate_coupon(&CouponCode::new("SAVE10"))
        .await
        .expect_err("must fail");

    assert_eq!(counter.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counter.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_input_closes_span_without_a_request() {
    let counter = SpanCounter::new("create_order");
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(counter.clone()),
    );

    let server = MockServer::start().await;
    let service = bare_service(&server).await;
    service
        .create_order(Vec::new(), None)
        .await
        .expect_err("empty cart");

    assert_eq!(counter.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counter.closed.load(Ordering::SeqCst), 1);
    assert!(server.received_requests().await.expect("requests").is_empty());
}
