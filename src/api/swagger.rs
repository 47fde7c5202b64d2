use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TatCon API",
        version = "1.0.0",
        description = "Backend for the TatCon campus app. \n\n**Authentication:** Most endpoints require a JWT Bearer token (also accepted as the `token` cookie).\n\n**Features:**\n- Multi-provider authentication (Email, Google, Facebook, VK)\n- Profiles with interests, meeting goals and peer ratings\n- Event calendar with filters and short-video promos\n- Discovery swipes and matches\n- Random coffee matchmaking\n- Event reminders delivered as push notifications",
        contact(
            name = "TatCon Team",
            email = "support@tatcon.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_me,

        // Profile
        crate::api::profile::update_profile,
        crate::api::profile::get_profile,
        crate::api::profile::add_rating,

        // Events & reminders
        crate::api::events::list_events,
        crate::api::events::shorts_feed,
        crate::api::events::get_event,
        crate::api::events::schedule_reminder,
        crate::api::notifications::list_reminders,
        crate::api::notifications::cancel_reminder,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::api::auth::MeResponse,

            // Profile
            crate::services::profile_service::UpdateProfileRequest,
            crate::services::profile_service::RatingRequest,
            crate::models::user::UserPublic,

            // Events & reminders
            crate::models::event::EventResponse,
            crate::models::event::ShortResponse,
            crate::services::event_service::EventListResponse,
            crate::services::reminder_service::ScheduleReminderRequest,
            crate::models::reminder::ReminderResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints. Supports email/password, Google, Facebook and VK sign-in."),
        (name = "Profile", description = "Profile management and peer ratings."),
        (name = "Events", description = "Event calendar, filters and the short-video promo feed."),
        (name = "Reminders", description = "Event reminders and notification preferences."),
        (name = "Health", description = "Health check and system metrics for monitoring."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
