use chrono::{DateTime, Utc};
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// Everything the guardian-credentials email needs. The plaintext password
/// only ever lives in this struct on its way out; it is never persisted.
#[derive(Debug, Clone)]
pub struct GuardianCredentialsEmail {
    pub guardian_name: String,
    pub guardian_email: String,
    pub student_name: String,
    pub temp_code: String,
    pub temp_password: String,
    pub organization_name: String,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send temporary login credentials to a guardian. Returns whether the
    /// email was actually handed to the SMTP relay; when sending is disabled
    /// the content is logged instead and `false` is returned so callers can
    /// report delivery as unconfirmed.
    #[instrument(skip(self, data), fields(to = %data.guardian_email))]
    pub async fn send_guardian_credentials(
        &self,
        data: &GuardianCredentialsEmail,
    ) -> Result<bool, AppError> {
        let subject = format!("Welcome to {} - Student Portal Access", data.organization_name);
        let expiry = data.expiry_date.format("%A, %B %d, %Y").to_string();

        let text_body = format!(
            "Dear {},\n\n\
             Your ward, {}, has been enrolled at {}.\n\n\
             Temporary Username: {}\n\
             Temporary Password: {}\n\n\
             These credentials will expire on {}. Upon your first login you\n\
             will be required to create a permanent username and password.\n\n\
             Next steps:\n\
             1. Visit the student portal login page\n\
             2. Enter the temporary username and password above\n\
             3. Create your permanent credentials when prompted\n\n\
             Best regards,\n\
             {} Team",
            data.guardian_name,
            data.student_name,
            data.organization_name,
            data.temp_code,
            data.temp_password,
            expiry,
            data.organization_name
        );

        let html_body = self.guardian_credentials_template(data, &expiry);

        if !self.config.enabled {
            info!(
                to = %data.guardian_email,
                subject = %subject,
                "Email sending disabled, logging guardian credentials email instead"
            );
            return Ok(false);
        }

        self.send_email(&data.guardian_email, &subject, &text_body, &html_body)
            .await?;
        Ok(true)
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn guardian_credentials_template(
        &self,
        data: &GuardianCredentialsEmail,
        expiry: &str,
    ) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Student Portal Access Credentials</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
                    <tr>
                        <td style="background-color: #2C5282; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">Welcome to {org}</h1>
                            <p style="margin: 10px 0 0 0; color: #BEE3F8; font-size: 16px;">Student Portal Access Credentials</p>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Dear <strong>{guardian}</strong>,
                            </p>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Your ward, <strong>{student}</strong>, has been enrolled at <strong>{org}</strong>.
                                Below are the temporary login credentials to access the student portal.
                            </p>
                            <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f8fafc; border: 2px solid #4299e1; border-radius: 8px; margin: 20px 0;">
                                <tr>
                                    <td style="padding: 20px;">
                                        <p style="margin: 0 0 5px 0; color: #2C5282; font-size: 14px; font-weight: bold;">Temporary Username:</p>
                                        <p style="margin: 0 0 15px 0; font-family: monospace; font-size: 16px; background-color: #f1f5f9; padding: 8px 12px; border-radius: 4px;">{code}</p>
                                        <p style="margin: 0 0 5px 0; color: #2C5282; font-size: 14px; font-weight: bold;">Temporary Password:</p>
                                        <p style="margin: 0; font-family: monospace; font-size: 16px; background-color: #f1f5f9; padding: 8px 12px; border-radius: 4px;">{password}</p>
                                    </td>
                                </tr>
                            </table>
                            <div style="background-color: #fff5f5; border: 2px solid #fc8181; color: #c53030; padding: 15px; border-radius: 8px; margin: 20px 0;">
                                <strong>Important:</strong> These credentials will expire on <strong>{expiry}</strong>.
                                Upon your first login, you will be required to create a permanent username and password.
                            </div>
                            <h3 style="color: #2C5282;">Next Steps:</h3>
                            <ol style="color: #666666; font-size: 14px; line-height: 1.8;">
                                <li>Visit the student portal login page</li>
                                <li>Enter the temporary username and password provided above</li>
                                <li>Create your permanent credentials when prompted</li>
                            </ol>
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This is an automated email from {org}. Please do not reply.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            org = data.organization_name,
            guardian = data.guardian_name,
            student = data.student_name,
            code = data.temp_code,
            password = data.temp_password,
            expiry = expiry,
        )
    }
}
