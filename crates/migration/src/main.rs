use config::Config;
use sea_orm_migration::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    // DATABASE_URL wins; otherwise fall back to the config.yaml the
    // application itself reads.
    if env::var("DATABASE_URL").is_err() {
        if let Ok(settings) = Config::builder()
            .add_source(config::File::with_name("config.yaml"))
            .build()
        {
            if let Ok(url) = settings.get_string("database_url") {
                env::set_var("DATABASE_URL", url);
            }
        }
    }
    cli::run_cli(migration::Migrator).await;
}
