use std::env;
use std::io::Write;

use dotenv::dotenv;
use inferline::{CompletionOptions, EndpointClient, HttpTransport, JsonOutputsCodec};
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = env::var("INFERLINE_ENDPOINT_URL")
        .unwrap_or_else(|_| "http://localhost:8080/invocations".to_string());

    let transport = HttpTransport::builder(url).build()?;
    let client = EndpointClient::builder(transport, JsonOutputsCodec).build()?;

    let options = CompletionOptions::new().stop(vec!["<|end|>".to_string()]);
    let stream = client
        .stream("Write a haiku about byte streams.", &options)
        .await?;
    let mut stream = std::pin::pin!(stream);

    while let Some(increment) = stream.next().await {
        print!("{}", increment?);
        std::io::stdout().flush()?;
    }
    println!();

    Ok(())
}
