//! Serves the product API over HTTP.

use log::info;
use r2d2::Pool;

use product_crud::{router, ProductMapper, ProductRepository, ProductService, Repo, Settings};

/// Start a server and use a `Router` to dispatch requests
fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let settings = Settings::from_env()?;
    let repo = Repo::from_pool_builder(
        &settings.database_url,
        Pool::builder().max_size(settings.pool_size),
    )?;
    repo.migrate()?;

    let service = ProductService::new(ProductRepository::new(repo), ProductMapper);

    info!("Listening for requests at http://{}", settings.addr);
    gotham::start(settings.addr, router(service))?;
    Ok(())
}
