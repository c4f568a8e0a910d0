use std::{
    sync::{Arc, mpsc},
    thread,
    time::Duration,
};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crypta_api::{HttpApi, RunnerApiAdapter};
use crypta_core::{EngineRouter, EngineSummary, JobRunner, RunnerConfig};
use crypta_exec::FnEngine;
use crypta_model::{Found, JobKind, JobSpec};

/// Solver that reports two assignments; generator that echoes the joined words.
fn engines() -> EngineRouter {
    let solver = FnEngine::new(|spec, sink| {
        if let JobSpec::Solve(s) = spec {
            sink.accept(Found::new(&s.cryptarithm, "A=1 B=2 C=3"))?;
            sink.accept(Found::new(&s.cryptarithm, "A=2 B=1 C=3"))?;
        }
        Ok(EngineSummary::exhausted())
    })
    .with_name("solver")
    .with_kinds([JobKind::Solve]);

    let generator = FnEngine::new(|spec, sink| {
        if let JobSpec::Generate(g) = spec {
            sink.accept(Found::new(g.words.join("+"), "generated"))?;
        }
        Ok(EngineSummary::exhausted())
    })
    .with_name("generator")
    .with_kinds([JobKind::Generate]);

    EngineRouter::new()
        .with_engine(Arc::new(solver))
        .with_engine(Arc::new(generator))
}

fn app_with(runner: JobRunner) -> Router {
    HttpApi::new(Arc::new(RunnerApiAdapter::new(runner))).router()
}

fn app(capacity: usize) -> (Router, JobRunner) {
    let runner = JobRunner::new(
        Arc::new(engines()),
        RunnerConfig::default().with_max_concurrent(capacity),
    )
    .unwrap();
    (app_with(runner.clone()), runner)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("request failed");
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_capacity() {
    let (router, _) = app(3);
    let (status, body) = send(router, get("/api/v1/cryptator/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["capacity"], 3);
    assert_eq!(body["available"], 3);
    assert_eq!(body["runningTasks"], 0);
    assert!(body["uptimeSeconds"].is_u64());
    assert!(body["platform"].is_string());
}

#[tokio::test]
async fn solve_returns_solutions() {
    let (router, runner) = app(2);
    let (status, body) = send(
        router,
        post(
            "/api/v1/cryptator/solve",
            json!({ "taskId": "s-1", "cryptarithm": "a+b=c", "solutionLimit": 0 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["outcome"], "success");
    assert_eq!(body["taskId"], "s-1");
    assert_eq!(body["cryptarithm"], "a+b=c");
    assert_eq!(body["solutionCount"], 2);
    assert_eq!(body["solutions"][0]["assignment"], "A=1 B=2 C=3");
    assert_eq!(body["solutions"][0]["evaluation"], "a+b=c = A=1 B=2 C=3");
    assert_eq!(body["solutions"][0]["valid"], true);
    assert!(body["error"].is_null());
    assert_eq!(runner.load(), 0);
}

#[tokio::test]
async fn solve_honors_solution_limit() {
    let (router, _) = app(1);
    let (_, body) = send(
        router,
        post(
            "/api/v1/cryptator/solve",
            json!({ "cryptarithm": "a+b=c", "solutionLimit": 1 }),
        ),
    )
    .await;

    assert_eq!(body["solutionCount"], 1);
    assert_eq!(body["success"], true);
    assert!(body["taskId"].is_string());
}

#[tokio::test]
async fn invalid_job_is_a_failed_outcome_not_a_transport_error() {
    let (router, _) = app(1);
    let (status, body) = send(
        router,
        post("/api/v1/cryptator/solve", json!({ "cryptarithm": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["outcome"], "failed");
    assert_eq!(
        body["error"],
        "invalid request: cryptarithm cannot be empty"
    );
}

#[tokio::test]
async fn generate_returns_cryptarithms() {
    let (router, _) = app(1);
    let (status, body) = send(
        router,
        post(
            "/api/v1/cryptagen/generate",
            json!({ "words": ["send", "more", "money"], "operatorSymbol": "+" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["cryptarithms"][0]["cryptarithm"], "send+more+money");
    assert_eq!(body["cryptarithms"][0]["solution"], "generated");
}

#[tokio::test]
async fn doubly_true_requires_bounds() {
    let (router, _) = app(1);
    let (status, body) = send(
        router,
        post(
            "/api/v1/cryptagen/generate-doubly-true",
            json!({ "countryCode": "FR", "langCode": "fr" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("doubly-true"));
}

#[tokio::test]
async fn doubly_true_ignores_words() {
    let (router, _) = app(1);
    let (status, body) = send(
        router,
        post(
            "/api/v1/cryptagen/generate-doubly-true",
            json!({
                "words": ["ignored"],
                "countryCode": "FR",
                "langCode": "fr",
                "lowerBound": 1,
                "upperBound": 10
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cryptarithms"][0]["cryptarithm"], "");
}

#[tokio::test]
async fn full_capacity_is_429() {
    let (router, runner) = app(1);
    let _held = runner.admission().try_acquire().expect("slot should be free");

    let (status, body) = send(
        router,
        post("/api/v1/cryptator/solve", json!({ "cryptarithm": "a+b=c" })),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Too many concurrent requests");
    assert_eq!(
        body["message"],
        "Server is currently handling maximum allowed concurrent requests (1). Please try again later."
    );
    assert_eq!(runner.load(), 0);
}

#[tokio::test]
async fn unknown_task_endpoints() {
    let (router, _) = app(1);

    let (status, body) = send(router.clone(), post("/api/v1/tasks/ghost/cancel", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Task not found or already completed");
    assert_eq!(body["taskId"], "ghost");

    let (status, body) = send(router.clone(), get("/api/v1/tasks/ghost/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["status"], "NOT_FOUND");
    assert!(body.get("type").is_none());

    let (status, _) = send(router, get("/api/v1/tasks/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_and_listing() {
    let (router, runner) = app(4);
    runner.registry().register(JobKind::Solve, Some("s"));
    runner.registry().register(JobKind::Generate, Some("g"));

    let (status, body) = send(router.clone(), get("/api/v1/tasks/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["runningTasks"], 2);
    assert_eq!(body["capacity"], 4);

    let (status, body) = send(router.clone(), get("/api/v1/tasks?kind=generate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["tasks"][0]["id"], "g");
    assert_eq!(body["tasks"][0]["type"], "GENERATE");

    let (status, body) = send(router.clone(), get("/api/v1/tasks/s")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "REGISTERED");

    let (status, _) = send(router, get("/api/v1/tasks?kind=bogus")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn running_job_can_be_cancelled_over_http() {
    let (reached_tx, reached_rx) = mpsc::channel::<()>();
    let endless = FnEngine::new(move |_spec, sink| {
        for i in 0..10_000 {
            sink.accept(Found::new(format!("n{i}"), "s"))?;
            if i == 0 {
                let _ = reached_tx.send(());
            }
            thread::sleep(Duration::from_millis(2));
        }
        Ok(EngineSummary::exhausted())
    });
    let runner = JobRunner::new(Arc::new(endless), RunnerConfig::default()).unwrap();
    let router = app_with(runner.clone());

    let job = tokio::spawn(send(
        router.clone(),
        post(
            "/api/v1/cryptator/solve",
            json!({ "taskId": "http-cancel", "cryptarithm": "a+b=c" }),
        ),
    ));
    tokio::task::spawn_blocking(move || reached_rx.recv())
        .await
        .unwrap()
        .unwrap();

    let (_, body) = send(router.clone(), get("/api/v1/tasks/http-cancel/status")).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["status"], "RUNNING");
    assert_eq!(body["type"], "SOLVE");

    let (_, body) = send(router.clone(), post("/api/v1/tasks/http-cancel/cancel", json!({}))).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Task cancelled successfully");

    let (status, body) = job.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["outcome"], "cancelled");
    assert_eq!(body["error"], "task cancelled by user");
    assert!(body["solutionCount"].as_u64().unwrap() >= 1);
    assert_eq!(runner.load(), 0);
    assert_eq!(runner.admission().available(), runner.admission().capacity());
}
