//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use domain::{
    BillingCycle, Currency, DocumentType, LeaseStatus, PaymentMethod, Role, SubscriptionStatus,
    SubscriptionTier, UnitStatus,
};

use crate::auth::TokenResponse;
use crate::handlers::auth_handler::RegisteredResponse;
use crate::handlers::health_handler::{HealthResponse, StoreHealth};
use crate::pagination::{
    PaginatedDocumentTemplates, PaginatedLandlords, PaginatedLeases, PaginatedPayments,
    PaginatedProperties, PaginatedUnits, PaginatedUsers, PaginationMeta,
};
use crate::requests::{
    LoginRequest, OwnerInput, RegisterLandlordRequest, RenderDocumentRequest,
    StoreDocumentTemplateRequest, StoreLandlordRequest, StoreLeaseRequest, StorePaymentRequest,
    StorePropertyRequest, StoreUnitRequest, StoreUserRequest, UpdateCurrencySettingsRequest,
    UpdateDocumentTemplateRequest, UpdateLandlordRequest, UpdateSubscriptionRequest,
    UpdateUserRequest,
};
use crate::resources::{
    CurrencySettingsResource, DocumentTemplateResource, LandlordResource, LeaseResource,
    LimitResource, PaymentResource, PropertyResource, PropertySummary, RenderedDocumentResource,
    SubscriptionResource, UnitResource, UnitSummary, UsageResource, UserResource,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::me,
        crate::handlers::landlord_handler::list_landlords,
        crate::handlers::landlord_handler::store_landlord,
        crate::handlers::landlord_handler::show_landlord,
        crate::handlers::landlord_handler::update_landlord,
        crate::handlers::landlord_handler::update_subscription,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::store_user,
        crate::handlers::user_handler::show_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::property_handler::list_properties,
        crate::handlers::property_handler::store_property,
        crate::handlers::property_handler::show_property,
        crate::handlers::unit_handler::list_units,
        crate::handlers::unit_handler::store_unit,
        crate::handlers::unit_handler::show_unit,
        crate::handlers::lease_handler::list_leases,
        crate::handlers::lease_handler::store_lease,
        crate::handlers::lease_handler::show_lease,
        crate::handlers::payment_handler::list_payments,
        crate::handlers::payment_handler::store_payment,
        crate::handlers::document_template_handler::list_templates,
        crate::handlers::document_template_handler::store_template,
        crate::handlers::document_template_handler::show_template,
        crate::handlers::document_template_handler::update_template,
        crate::handlers::document_template_handler::delete_template,
        crate::handlers::document_template_handler::render_template,
        crate::handlers::currency_handler::show_settings,
        crate::handlers::currency_handler::update_settings,
    ),
    components(
        schemas(
            HealthResponse,
            StoreHealth,
            LoginRequest,
            RegisterLandlordRequest,
            OwnerInput,
            TokenResponse,
            RegisteredResponse,
            StoreLandlordRequest,
            UpdateLandlordRequest,
            UpdateSubscriptionRequest,
            StoreUserRequest,
            UpdateUserRequest,
            StorePropertyRequest,
            StoreUnitRequest,
            StoreLeaseRequest,
            StorePaymentRequest,
            StoreDocumentTemplateRequest,
            UpdateDocumentTemplateRequest,
            RenderDocumentRequest,
            UpdateCurrencySettingsRequest,
            LandlordResource,
            SubscriptionResource,
            LimitResource,
            UsageResource,
            UserResource,
            PropertyResource,
            PropertySummary,
            UnitResource,
            UnitSummary,
            LeaseResource,
            PaymentResource,
            DocumentTemplateResource,
            RenderedDocumentResource,
            CurrencySettingsResource,
            PaginationMeta,
            PaginatedLandlords,
            PaginatedUsers,
            PaginatedProperties,
            PaginatedUnits,
            PaginatedLeases,
            PaginatedPayments,
            PaginatedDocumentTemplates,
            Role,
            SubscriptionTier,
            SubscriptionStatus,
            BillingCycle,
            UnitStatus,
            LeaseStatus,
            PaymentMethod,
            DocumentType,
            Currency,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Login, registration and identity"),
        (name = "Landlords", description = "Tenant organisations and subscriptions"),
        (name = "Users", description = "Landlord staff accounts"),
        (name = "Properties", description = "Rental properties"),
        (name = "Units", description = "Units within properties"),
        (name = "Leases", description = "Unit leases"),
        (name = "Payments", description = "Lease payments"),
        (name = "Document Templates", description = "Templates and rendering"),
        (name = "Settings", description = "Per-landlord settings"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The document as pretty-printed JSON.
    pub fn to_pretty_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
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
