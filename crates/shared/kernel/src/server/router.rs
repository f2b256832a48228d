use super::{ApiState, health};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Documented router type every slice contributes its routes with.
pub type FeatureRouter = OpenApiRouter<ApiState>;

/// System routes (health) shared by every app.
pub fn system_router() -> FeatureRouter {
    OpenApiRouter::new().routes(routes!(health::health_handler))
}
