//! The routing table for the product API.

use gotham::middleware::logger::RequestLogger;
use gotham::middleware::state::StateMiddleware;
use gotham::pipeline::{new_pipeline, single_pipeline};
use gotham::router::builder::{build_router, DefineSingleRoute, DrawRoutes};
use gotham::router::Router;
use log::Level;

use crate::handlers::{self, ProductIdExtractor, ProductNameExtractor};
use crate::service::ProductService;

/// Builds the `Router`, with a pipeline that logs every request and places a clone of `service`
/// in each request's `State`.
pub fn router(service: ProductService) -> Router {
    let (chain, pipelines) = single_pipeline(
        new_pipeline()
            .add(RequestLogger::new(Level::Info))
            .add(StateMiddleware::new(service))
            .build(),
    );

    build_router(chain, pipelines, |route| {
        route
            .get("/api/products")
            .to_async_borrowing(handlers::list_products);
        route
            .post("/api/products")
            .to_async_borrowing(handlers::create_product);

        route
            .get("/api/products/name/:name")
            .with_path_extractor::<ProductNameExtractor>()
            .to_async_borrowing(handlers::get_products_by_name);

        route
            .get("/api/products/:id")
            .with_path_extractor::<ProductIdExtractor>()
            .to_async_borrowing(handlers::get_product);
        route
            .put("/api/products/:id")
            .with_path_extractor::<ProductIdExtractor>()
            .to_async_borrowing(handlers::update_product);
        route
            .delete("/api/products/:id")
            .with_path_extractor::<ProductIdExtractor>()
            .to_async_borrowing(handlers::delete_product);
    })
}
