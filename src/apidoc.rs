use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "wa-inbox",
        version = "0.1.0",
        description = "WhatsApp Business webhook receiver. Answers the subscription handshake and stores inbound text messages."
    ),
    servers(
        (url = "http://localhost:5000", description = "Local dev")
    ),
    tags(
        (name = "webhooks", description = "WhatsApp webhook endpoints")
    ),
    paths(
        crate::routes::webhook::verify_webhook,
        crate::routes::webhook::receive_webhook,
    ),
    components(
        schemas(
            crate::models::whatsapp::NotificationDoc,
            crate::models::whatsapp::EntryDoc,
            crate::models::whatsapp::ChangeDoc,
            crate::models::whatsapp::InboundMessage
        )
    )
)]
pub struct ApiDoc;
