#[tokio::main]
async fn main() {
    if let Err(err) = wc_api::run().await {
        tracing::error!(error = %err, "wc-api failed");
        std::process::exit(1);
    }
}
