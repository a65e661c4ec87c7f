use crate::cli::actions::Action;
use crate::companies::new;
use anyhow::{anyhow, Result};
use tracing::info;
use url::Url;

/// Handle the server action
/// # Errors
/// Returns an error if the DSN is not a valid URL or the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            max_connections,
        } => {
            let dsn = Url::parse(&dsn)?;

            if !matches!(dsn.scheme(), "postgres" | "postgresql") {
                return Err(anyhow!(
                    "Unsupported DSN scheme '{}', expected postgres://",
                    dsn.scheme()
                ));
            }

            info!("Connecting to database: {}", redact(&dsn));

            new(port, dsn.to_string(), max_connections).await?;
        }
    }

    Ok(())
}

/// Copy of the DSN safe to log: the password is replaced.
fn redact(dsn: &Url) -> String {
    let mut redacted = dsn.clone();
    if redacted.password().is_some() && redacted.set_password(Some("****")).is_err() {
        return format!("{}://****", redacted.scheme());
    }
    redacted.to_string()
}
