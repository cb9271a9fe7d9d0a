mod check;
mod cli;
mod infra;
mod routes;
mod server;

use pawd_forms::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
