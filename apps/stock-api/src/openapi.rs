//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Stock API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stock API",
        version = "0.1.0",
        description = "Inventory API: product catalog, stock levels and stock movements"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/stock", api = domain_stock::ApiDoc),
        (path = "/api/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Stock", description = "Stock levels and movements"),
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;
