use social_login::{config::Config, preview, tracing::error, AppError, TracingLogger};

fn main() -> Result<(), AppError> {
    let config = Config::load("./config")?;
    let _logger = TracingLogger::from_config(&config);

    match preview::run(&config) {
        Ok(outcomes) => {
            for outcome in outcomes {
                println!("{}", outcome);
            }
            Ok(())
        }
        Err(e) => {
            error!("Preview failed: {}", e);
            Err(e)
        }
    }
}
