//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the quizgen REST API
///
/// Served as JSON at `/openapi.json` and through the Swagger UI at
/// `/swagger-ui` when enabled.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "quizgen REST API",
        version = "0.1.0",
        description = "Upload a document, generate multiple-choice questions from it, and fetch the parsed question set",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5137", description = "Local development server")
    ),
    paths(
        crate::api::routes::upload_document,
        crate::api::routes::get_questions,
        crate::api::routes::pipeline_status,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        crate::types::QuestionRecord,
        crate::types::UploadResponse,
        crate::types::PipelineStatus,
        crate::types::Event,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "quiz", description = "Document upload and question retrieval"),
        (name = "system", description = "Health, status, OpenAPI spec, events"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `X-Api-Key` header scheme
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-Api-Key"),
                    ),
                ),
            );
        }
    }
}
