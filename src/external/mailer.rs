use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use crate::models::OrderResponse;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Transactional email over the configured SMTP relay. With no relay
/// configured every send is a logged no-op, so order placement never
/// depends on mail infrastructure being up.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        let transport = if config.host.is_empty() {
            log::warn!("SMTP host not configured; transactional email is disabled");
            None
        } else {
            match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host) {
                Ok(builder) => Some(
                    builder
                        .port(config.port)
                        .credentials(Credentials::new(
                            config.username.clone(),
                            config.password.clone(),
                        ))
                        .build(),
                ),
                Err(e) => {
                    log::error!("Failed to initialize SMTP transport: {e}");
                    None
                }
            }
        };

        Self { transport, config }
    }

    pub async fn send_order_placed(
        &self,
        to_email: &str,
        member_name: &str,
        order: &OrderResponse,
    ) -> AppResult<()> {
        let items_html: String = order
            .items
            .iter()
            .map(|i| {
                format!(
                    "<li>{} — {} x ${}</li>",
                    i.title, i.quantity, i.unit_price
                )
            })
            .collect();

        let body = format!(
            "<h2>Hi {member_name},</h2>\
             <p>Thanks for placing an order with us!</p>\
             <p><strong>Claim Code:</strong> {}</p>\
             <p><strong>Pickup Deadline:</strong> {}</p>\
             <h3>Items</h3>\
             <ul>{items_html}</ul>\
             <p><strong>Total:</strong> ${}</p>\
             <p>We hope you enjoy your books!</p>",
            order.claim_code,
            order.pickup_deadline.format("%Y-%m-%d"),
            order.total_price,
        );

        self.send(to_email, "Order Confirmation", body).await
    }

    pub async fn send_order_dispatched(
        &self,
        to_email: &str,
        member_name: &str,
        order: &OrderResponse,
    ) -> AppResult<()> {
        let rows: String = order
            .items
            .iter()
            .map(|i| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>${}</td><td>${}</td></tr>",
                    i.title, i.quantity, i.unit_price, i.line_total
                )
            })
            .collect();
        let subtotal = order.total_price + order.discount_amount;

        let body = format!(
            "<h2>Hello {member_name},</h2>\
             <p>Your order has been <strong>dispatched</strong>.</p>\
             <p><strong>Claim Code:</strong> {}</p>\
             <p><strong>Pickup Deadline:</strong> {}</p>\
             <h3>Items</h3>\
             <table border='1' cellpadding='6' cellspacing='0'>\
             <thead><tr><th>Title</th><th>Qty</th><th>Unit Price</th><th>Line Total</th></tr></thead>\
             <tbody>{rows}</tbody></table>\
             <h3>Summary</h3>\
             <ul>\
             <li><strong>Subtotal:</strong> ${subtotal}</li>\
             <li><strong>Discounts:</strong> ${} ({})</li>\
             <li><strong>Total:</strong> ${}</li>\
             </ul>",
            order.claim_code,
            order.pickup_deadline.format("%Y-%m-%d"),
            order.discount_amount,
            order.applied_discounts,
            order.total_price,
        );

        self.send(to_email, "Your Order Has Been Dispatched", body)
            .await
    }

    pub async fn send_order_cancelled(
        &self,
        to_email: &str,
        member_name: &str,
        claim_code: &str,
    ) -> AppResult<()> {
        let body = format!(
            "<h2>Hello {member_name},</h2>\
             <p>Your order with Claim Code <strong>{claim_code}</strong> has been \
             <strong>cancelled</strong>.</p>\
             <p>If this was a mistake or you have questions, please contact us.</p>",
        );

        self.send(to_email, "Your Order Was Cancelled", body).await
    }

    pub async fn send_password_reset(&self, to_email: &str, code: &str) -> AppResult<()> {
        let body = format!(
            "<p>Hello,</p>\
             <p>Use this code to reset your password: <strong>{code}</strong></p>",
        );

        self.send(to_email, "Reset Your Password", body).await
    }

    async fn send(&self, to_email: &str, subject: &str, body_html: String) -> AppResult<()> {
        let Some(transport) = &self.transport else {
            log::debug!("SMTP disabled, skipping email '{subject}' to {to_email}");
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|e| AppError::InternalError(format!("Invalid from address: {e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::InternalError(format!("Invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body_html)
            .map_err(|e| AppError::InternalError(format!("Failed to build email: {e}")))?;

        transport.send(message).await?;
        Ok(())
    }
}
