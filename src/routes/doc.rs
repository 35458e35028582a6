use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::{CategoryList, CreateCategoryRequest},
        orders::{
            CreateOrderRequest, OrderItemRequest, OrderList, OrderWithItems,
            UpdateOrderItemRequest, UpdateOrderStatusRequest,
        },
        payments::{CreateInvoiceRequest, CreatePaymentRequest, InvoiceList, PaymentList},
        products::{BulkActiveRequest, CreateProductRequest, ProductList},
        reviews::{
            CastVoteRequest, CreateReviewRequest, ModerateReviewRequest, ResponseData,
            ReviewDetail, ReviewImageList, ReviewImageRequest, ReviewList, ReviewResponseRequest,
            VoteData,
        },
    },
    models::{
        Category, Invoice, Order, OrderItem, Payment, Product, Review, ReviewImage,
        ReviewResponse, ReviewVote, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, categories, health, orders, params, products, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        categories::list_categories,
        categories::create_category,
        categories::get_category_by_slug,
        products::list_products,
        products::create_product,
        products::get_product,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::add_item,
        orders::update_item,
        orders::cancel_order,
        orders::create_payment,
        orders::list_payments,
        orders::create_invoice,
        orders::list_invoices,
        reviews::list_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::cast_vote,
        reviews::record_response,
        reviews::increment_helpful,
        reviews::increment_views,
        reviews::attach_image,
        reviews::list_images,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::moderate_review,
        admin::set_products_active,
        admin::delete_user
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            Order,
            OrderItem,
            Payment,
            Invoice,
            Review,
            ReviewImage,
            ReviewVote,
            ReviewResponse,
            CreateCategoryRequest,
            CategoryList,
            CreateProductRequest,
            ProductList,
            BulkActiveRequest,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderItemRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderWithItems,
            CreatePaymentRequest,
            CreateInvoiceRequest,
            PaymentList,
            InvoiceList,
            CreateReviewRequest,
            CastVoteRequest,
            ReviewResponseRequest,
            ReviewImageRequest,
            ModerateReviewRequest,
            ReviewDetail,
            ReviewList,
            ReviewImageList,
            VoteData,
            ResponseData,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::ReviewListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Category>,
            ApiResponse<CategoryList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<PaymentList>,
            ApiResponse<InvoiceList>,
            ApiResponse<ReviewDetail>,
            ApiResponse<ReviewList>,
            ApiResponse<ReviewImageList>,
            ApiResponse<Payment>,
            ApiResponse<Invoice>,
            ApiResponse<ReviewImage>,
            ApiResponse<VoteData>,
            ApiResponse<ResponseData>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Category and product endpoints"),
        (name = "Orders", description = "Order and line-item endpoints"),
        (name = "Payments", description = "Payment and invoice records"),
        (name = "Reviews", description = "Review, vote and response endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
