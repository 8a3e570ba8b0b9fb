use axum::Json;
use tracing::instrument;

use crate::admin::{self, AdminSite};

#[utoipa::path(
    get,
    path = "/site",
    tag = "Admin",
    operation_id = "getAdminSite",
    summary = "Get the admin-site registry",
    description = "Returns, per registered entity, the list columns, list filters, search fields, inline child editors (with their number of extra blank forms) and closed-choice fields. Consumed by an external admin UI.",
    responses(
        (status = 200, description = "Admin registry", body = AdminSite),
    ),
)]
#[instrument]
pub async fn get_site() -> Json<AdminSite> {
    Json(admin::site())
}
