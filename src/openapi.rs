use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::handlers;

/// OpenAPI document for the storefront API, served by Swagger UI at `/docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Product catalog, sale recording with price snapshots, reporting, and customer surveys"
    ),
    paths(
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::deactivate_product,
        handlers::products::activate_product,
        handlers::reports::top_products,
        handlers::reports::top_sales,
        handlers::reports::statistics,
        handlers::reports::login_logs,
        handlers::surveys::submit_survey,
        handlers::surveys::list_surveys,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::users::create_user,
    ),
    components(schemas(
        ErrorResponse,
        handlers::sales::CreateSalePayload,
        handlers::sales::SaleItemPayload,
        handlers::sales::SaleDto,
        handlers::sales::SaleLineDto,
        handlers::products::CreateProductPayload,
        handlers::products::UpdateProductPayload,
        handlers::products::ProductDto,
        handlers::products::ProductPageDto,
        handlers::reports::TopProductDto,
        handlers::reports::StatisticsDto,
        handlers::reports::SaleStatsDto,
        handlers::reports::ProductStatsDto,
        handlers::reports::SurveyStatsDto,
        handlers::reports::LoginLogDto,
        handlers::reports::LoginLogUserDto,
        handlers::surveys::SurveyDto,
        handlers::auth::LoginPayload,
        handlers::users::CreateUserPayload,
        handlers::users::AdminUserDto,
    )),
    tags(
        (name = "ventas", description = "Sales recording and receipts"),
        (name = "productos", description = "Product catalog"),
        (name = "registros", description = "Reporting and audit"),
        (name = "encuestas", description = "Customer surveys"),
        (name = "admin", description = "Admin accounts and sessions")
    )
)]
pub struct ApiDoc;
