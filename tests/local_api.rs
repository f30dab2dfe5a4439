use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};

use reqwest::StatusCode;
use sd35_serverless::{
    app::envy::Envy,
    client::{errors::ClientError, service::RunpodClient},
    engine::{config::EngineConfig, runner::ProcessRunner, service::Engine},
    jobs::{
        dtos::job_input_dto::JobInputDto,
        queue::{self, JobQueue},
    },
    router, AppState,
};
use tempfile::TempDir;

const API_KEY: &str = "local-key";

/// PNG signature plus an IHDR chunk for a 2x3 image.
const PNG_2X3: [u8; 33] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R', 0, 0, 0,
    2, 0, 0, 0, 3, 8, 6, 0, 0, 0, 0x9D, 0x9B, 0x1F, 0x8F,
];

/// Stands in for the diffusion script: copies a fixed PNG into `--output-dir`
/// and exits 7 when the prompt is "explode".
fn fake_diffusion_script(dir: &Path) -> String {
    let image = dir.join("fixture.png");
    std::fs::write(&image, PNG_2X3).expect("fixture");

    let script = dir.join("demo_txt2img_sd35.sh");
    let body = format!(
        r#"if [ "$1" = "explode" ]; then exit 7; fi
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output-dir" ]; then out="$2"; fi
  shift
done
if [ -n "$out" ]; then cp "{}" "$out/sd35-0001.png"; fi
"#,
        image.display()
    );
    std::fs::write(&script, body).expect("script");

    script.display().to_string()
}

async fn serve(dir: &TempDir) -> SocketAddr {
    let config = EngineConfig {
        python: "sh".to_string(),
        script: fake_diffusion_script(dir.path()),
        working_dir: dir.path().to_path_buf(),
        model_version: "3.5-large".to_string(),
        onnx_dir: dir.path().join("onnx").display().to_string(),
        engine_dir: dir.path().join("engine").display().to_string(),
        output_root: dir.path().join("output"),
        hf_token: Some("hf_test".to_string()),
    };
    let engine = Arc::new(Engine::new(config, ProcessRunner));

    let envy: Envy = envy::from_iter(vec![("API_KEY".to_string(), API_KEY.to_string())])
        .expect("envy");

    let (queue, receiver) = JobQueue::new();
    let queue = Arc::new(queue);
    queue::spawn_consumer(queue.clone(), receiver, engine);

    let state = AppState {
        queue,
        envy: Arc::new(envy),
    };
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(router(Arc::new(state)).into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);

    addr
}

fn client(addr: SocketAddr) -> RunpodClient {
    RunpodClient::new(&format!("http://{}", addr), API_KEY)
        .with_poll_interval(Duration::from_millis(20))
        .with_max_polls(Some(250))
}

#[tokio::test]
async fn client_receives_generated_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = serve(&dir).await;

    let image = client(addr)
        .try_submit_and_wait(&JobInputDto::default())
        .await
        .expect("image");

    assert_eq!(image.data.as_ref(), &PNG_2X3[..]);
    assert_eq!((image.width, image.height), (2, 3));

    let leftovers = std::fs::read_dir(dir.path().join("output"))
        .expect("output root")
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn failed_generation_is_reported_as_failed_job() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = serve(&dir).await;
    let request = JobInputDto {
        prompt: "explode".to_string(),
        ..JobInputDto::default()
    };

    let result = client(addr).try_submit_and_wait(&request).await;

    let Err(ClientError::JobFailed(reason)) = &result else {
        panic!("expected a failed job, got {:?}", result);
    };
    assert_eq!(reason, "image generation failed (exit code 7)");
}

#[tokio::test]
async fn runsync_returns_the_finished_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = serve(&dir).await;

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("http://{}/runsync", addr))
        .bearer_auth(API_KEY)
        .json(&serde_json::json!({ "input": { "prompt": "a red fox", "seed": 42 } }))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");

    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["output"]["prompt"], "a red fox");
    assert_eq!(body["output"]["seed"], 42);
    assert_eq!(body["output"]["image"], base64::encode(PNG_2X3));
}

#[tokio::test]
async fn health_counts_jobs_by_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = serve(&dir).await;
    let http = reqwest::Client::new();

    let record: serde_json::Value = http
        .post(format!("http://{}/runsync", addr))
        .bearer_auth(API_KEY)
        .json(&serde_json::json!({ "input": { "prompt": "a quiet harbor" } }))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    assert_eq!(record["status"], "COMPLETED");

    let counts: serde_json::Value = http
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");

    assert_eq!(
        counts,
        serde_json::json!({
            "in_queue": 0,
            "in_progress": 0,
            "completed": 1,
            "failed": 0,
        })
    );
}

#[tokio::test]
async fn requests_without_the_api_key_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = serve(&dir).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({ "input": {} }))
        .send()
        .await
        .expect("send");

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = serve(&dir).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/status/nope", addr))
        .bearer_auth(API_KEY)
        .send()
        .await
        .expect("send");

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
