mod cli;
mod demo;
mod infra;
mod orders;
mod routes;
mod server;

use post_purchase_rules::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
