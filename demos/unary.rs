use dotenv::dotenv;
use inferline::{CompletionOptions, EndpointClient, GenerationParams, HttpTransport, JsonOutputsCodec};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let url = env::var("INFERLINE_ENDPOINT_URL")
        .unwrap_or_else(|_| "http://localhost:8080/invocations".to_string());

    let transport = HttpTransport::builder(url).build()?;
    let client = EndpointClient::builder(transport, JsonOutputsCodec)
        .defaults(GenerationParams::new().set("max_new_tokens", 256))
        .stop(vec!["\n\n".to_string()])
        .build()?;

    let text = client
        .complete("Share a fun fact about Rust programming.", &CompletionOptions::new())
        .await?;

    println!("Model:\n{text}");

    Ok(())
}
