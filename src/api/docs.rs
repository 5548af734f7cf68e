use axum::Router;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::auth_handlers::login_handler,
        crate::api::auth_handlers::create_user_handler,
        crate::api::auth_handlers::logout_handler,
        crate::api::auth_handlers::refresh_handler,
        crate::api::college_handlers::list_colleges_handler,
        crate::api::college_handlers::create_college_handler,
        crate::api::college_handlers::update_college_handler,
        crate::api::college_handlers::delete_college_handler
    ),
    components(
        schemas(
            crate::auth::models::LoginRequest,
            crate::auth::models::CreateAccountRequest,
            crate::auth::models::RefreshRequest,
            crate::auth::models::AccessLevel,
            crate::api::auth_handlers::MessageResponse,
            crate::api::auth_handlers::LoginResponse,
            crate::api::auth_handlers::RefreshResponse,
            crate::api::college_handlers::CreateCollegeRequest,
            crate::api::college_handlers::UpdateCollegeRequest,
            crate::api::college_handlers::DeleteCollegeRequest,
            crate::storage::repositories::college::CollegeRecord
        )
    ),
    tags(
        (name = "admin", description = "Administrative authentication and college directory")
    ),
    security(
        ("bearerAuth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

pub fn docs_router() -> Router {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_admin_surface() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.paths.paths.contains_key("/admin/login"));
        assert!(openapi.paths.paths.contains_key("/admin/User"));
        assert!(openapi.paths.paths.contains_key("/admin/logout"));
        assert!(openapi.paths.paths.contains_key("/admin/refresh"));
        assert!(openapi.paths.paths.contains_key("/admin/college"));

        let schemas = openapi.components.as_ref().expect("components").schemas.clone();
        assert!(schemas.contains_key("LoginRequest"));
        assert!(schemas.contains_key("CreateAccountRequest"));
    }
}
