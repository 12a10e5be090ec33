use std::process::ExitCode;

#[actix_web::main]
async fn main() -> ExitCode {
    match authflow::cli::run_cli().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
