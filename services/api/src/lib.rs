mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use agri_credit::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
