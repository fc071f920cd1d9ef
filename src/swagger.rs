use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AdminRole, OrderStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::account::signup,
        handlers::account::register_admin,
        handlers::account::login,
        handlers::account::forgot_password,
        handlers::account::refresh,
        handlers::account::get_profile,
        handlers::account::update_profile,
        handlers::book::get_books,
        handlers::book::filter_books,
        handlers::book::get_book,
        handlers::book::create_book,
        handlers::book::update_book,
        handlers::book::delete_book,
        handlers::book::upload_book_images,
        handlers::book::delete_book_image,
        handlers::book::get_genres,
        handlers::book::get_genre,
        handlers::book::create_genre,
        handlers::book::update_genre,
        handlers::book::delete_genre,
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::update_quantity,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::order::create_order,
        handlers::order::get_all_orders,
        handlers::order::get_my_orders,
        handlers::order::get_order,
        handlers::order::update_status,
        handlers::order::cancel_order,
        handlers::order::claim_order,
        handlers::order::delete_order,
        handlers::review::create_review,
        handlers::review::update_review,
        handlers::review::delete_review,
        handlers::review::reviews_for_book,
        handlers::review::my_reviews,
        handlers::review::get_review,
        handlers::bookmark::get_bookmarks,
        handlers::bookmark::add_bookmark,
        handlers::bookmark::remove_bookmark,
        handlers::announcement::create_announcement,
        handlers::announcement::my_announcements,
        handlers::announcement::get_all_announcements,
        handlers::announcement::get_public_announcements,
        handlers::announcement::get_announcement,
        handlers::announcement::update_announcement,
        handlers::announcement::delete_announcement,
    ),
    components(
        schemas(
            SignupRequest,
            AdminRegisterRequest,
            LoginRequest,
            ForgotPasswordRequest,
            UpdateProfileRequest,
            MemberResponse,
            AdminResponse,
            AdminRole,
            UserProfile,
            AuthResponse,
            BookCreateRequest,
            BookResponse,
            BookImageResponse,
            BookFilterQuery,
            GenreCreateRequest,
            GenreResponse,
            AddToCartRequest,
            UpdateCartRequest,
            CartItemResponse,
            CartResponse,
            OrderItemResponse,
            OrderResponse,
            OrderStatus,
            OrderStatusUpdateRequest,
            ReviewCreateRequest,
            ReviewUpdateRequest,
            ReviewResponse,
            BookmarkResponse,
            AnnouncementCreateRequest,
            AnnouncementResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "account", description = "Registration, login and profile API"),
        (name = "book", description = "Book catalog API"),
        (name = "genre", description = "Genre taxonomy API"),
        (name = "cart", description = "Shopping cart API"),
        (name = "order", description = "Order placement and fulfillment API"),
        (name = "review", description = "Book review API"),
        (name = "bookmark", description = "Bookmark API"),
        (name = "announcement", description = "Announcement API"),
    ),
    info(
        title = "Bookstore Backend API",
        version = "1.0.0",
        description = "Online bookstore REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
