use sd35_serverless::{
    app::util,
    client::{envy::ClientEnvy, models::generated_image::GeneratedImage, service::RunpodClient},
    jobs::dtos::job_input_dto::JobInputDto,
};

async fn save(image: &GeneratedImage, path: &str) {
    match tokio::fs::write(path, &image.data).await {
        Ok(_) => tracing::info!("image saved as {}", path),
        Err(e) => tracing::error!("failed to save {}: {}", path, e),
    }
}

#[tokio::main]
async fn main() {
    // tracing
    util::logging::init();

    // environment
    util::dotenv::load();
    let envy = match envy::from_env::<ClientEnvy>() {
        Ok(config) => config,
        Err(e) => panic!("{:#?}", e),
    };

    let client = RunpodClient::from_envy(&envy);
    tracing::info!("sd3.5 tensorrt test client, endpoint {}", envy.endpoint_url());

    tracing::info!("test 1: first generation, engines may still be building");
    let lion = JobInputDto {
        prompt: "A majestic lion standing on a cliff at sunset, photorealistic".to_string(),
        negative_prompt: "blurry, low quality, distorted".to_string(),
        steps: 30,
        guidance_scale: 3.5,
        ..JobInputDto::default()
    };

    let Some(image) = client.submit_and_wait(&lion).await else {
        tracing::error!("first generation failed");
        return;
    };
    save(&image, "test_1_lion.png").await;

    tracing::info!("test 2: second generation, engines are warm");
    let cyberpunk = JobInputDto {
        prompt: "A futuristic cyberpunk city at night with neon lights".to_string(),
        negative_prompt: "daylight, rural".to_string(),
        steps: 30,
        guidance_scale: 4.0,
        ..JobInputDto::default()
    };

    if let Some(image) = client.submit_and_wait(&cyberpunk).await {
        save(&image, "test_2_cyberpunk.png").await;
    }

    tracing::info!("testing complete");
}
