use anyhow::Result;
use tracing::{info, trace};

use super::initdb::{connect, run_migrations};
use super::serve::serve;
use crate::config::AppConfig;

pub async fn migrate_and_serve(config: AppConfig) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let db = connect(&config.database_url).await?;
    run_migrations(&db).await?;
    // The server opens its own pool; this one was only needed for migrating
    db.close().await?;

    serve(config).await
}
