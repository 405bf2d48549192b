mod admin;
mod auth;
mod config;
mod db;
mod error;
mod models;
mod query;
mod validation;
mod visits;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    models::Role, require_roles, AuthError, AuthService, PasswordService, RoleGate,
    TokenService, UserRepository,
};
use config::AppConfig;
use models::{
    Amenity, CreateAmenity, CreateProperty, Property, PropertyStatus, PropertyType,
    UpdateAmenity, UpdateProperty,
};
use visits::VisitRepository;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        admin::amenities::list_amenities,
        admin::amenities::create_amenity,
        admin::amenities::get_amenity,
        admin::amenities::update_amenity,
        admin::amenities::delete_amenity,
        admin::properties::list_properties,
        admin::properties::create_property,
        admin::properties::get_property,
        admin::properties::update_property,
        admin::properties::delete_property,
    ),
    components(
        schemas(
            Amenity, CreateAmenity, UpdateAmenity,
            Property, CreateProperty, UpdateProperty, PropertyType, PropertyStatus
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "amenities", description = "Amenity management (admin, project_manager)"),
        (name = "properties", description = "Listing management (admin, project_manager)")
    ),
    info(
        title = "Estate Admin API",
        version = "1.0.0",
        description = "Admin panel backend for the real-estate site"
    )
)]
struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the documented paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: MySqlPool,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub visits: VisitRepository,
}

impl AppState {
    pub fn new(db: MySqlPool, jwt_secret: &str) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::new(jwt_secret));
        let auth = AuthService::new(
            UserRepository::new(db.clone()),
            PasswordService::new(),
            tokens.clone(),
        )?;

        Ok(Self {
            visits: VisitRepository::new(db.clone()),
            db,
            tokens,
            auth: Arc::new(auth),
        })
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Put every route of `router` behind the role gate for `allowed`
fn gated(router: Router<AppState>, tokens: &Arc<TokenService>, allowed: &'static [Role]) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        RoleGate::new(tokens.clone(), allowed),
        require_roles,
    ))
}

/// Creates and configures the application router
///
/// Routes are grouped by the role set allowed to call them; each group gets
/// its own gate.
fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/signup", post(auth::signup_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/visits", post(visits::create_visit_handler));

    let signed_in = Router::new().route(
        "/api/user/profile",
        get(auth::get_profile_handler).put(auth::update_profile_handler),
    );

    let managers = Router::new()
        .route(
            "/api/admin/amenities",
            get(admin::amenities::list_amenities).post(admin::amenities::create_amenity),
        )
        .route(
            "/api/admin/amenities/:id",
            get(admin::amenities::get_amenity)
                .put(admin::amenities::update_amenity)
                .delete(admin::amenities::delete_amenity),
        )
        .route(
            "/api/admin/properties",
            get(admin::properties::list_properties).post(admin::properties::create_property),
        )
        .route(
            "/api/admin/properties/:id",
            get(admin::properties::get_property)
                .put(admin::properties::update_property)
                .delete(admin::properties::delete_property),
        )
        .route(
            "/api/admin/agents",
            get(admin::agents::list_agents).post(admin::agents::create_agent),
        )
        .route(
            "/api/admin/agents/:id",
            get(admin::agents::get_agent)
                .put(admin::agents::update_agent)
                .delete(admin::agents::delete_agent),
        )
        .route("/api/admin/visits/analytics", get(visits::visit_analytics_handler));

    let staff = Router::new()
        .route("/api/admin/visits", get(visits::list_visits_handler))
        .route("/api/admin/visits/:id", put(visits::update_visit_status_handler));

    let admins = Router::new()
        .route("/api/admin/users", get(admin::users::list_users))
        .route("/api/admin/users/:id", put(admin::users::update_user));

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(gated(signed_in, &state.tokens, Role::ANY))
        .merge(gated(managers, &state.tokens, Role::MANAGERS))
        .merge(gated(staff, &state.tokens, Role::STAFF))
        .merge(gated(admins, &state.tokens, Role::ADMIN))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Estate Admin API - Starting...");

    let config = AppConfig::from_env()?;
    if config.has_weak_secret() {
        tracing::warn!(
            "JWT_SECRET is shorter than {} bytes; use a longer random secret",
            config::RECOMMENDED_SECRET_LEN
        );
    }

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;
    tracing::info!("Migrations completed successfully");

    let state = AppState::new(db_pool, &config.jwt_secret)?;
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Estate Admin API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
