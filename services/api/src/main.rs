use immunise::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    immunise_api::run().await
}
