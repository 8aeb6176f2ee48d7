//! Subject / HTML / plain-text rendering of application notifications.

use chrono::{DateTime, Utc};

use crate::models::Application;

/// A fully composed message, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OutgoingEmail {
    /// Recipients joined into a single header value, order preserved.
    pub fn to_header(&self) -> String {
        self.to.join(", ")
    }
}

pub fn subject(application: &Application) -> String {
    format!(
        "New Application: {} - {}",
        application.position, application.applicant_name
    )
}

pub fn text_body(application: &Application, app_name: &str) -> String {
    let mut text = String::from("New Job Application Received\n\n");
    text.push_str("Applicant Information:\n");
    text.push_str(&format!("Name: {}\n", application.applicant_name));
    text.push_str(&format!("Email: {}\n", application.applicant_email));
    text.push_str(&format!("Position: {}\n", application.position));
    text.push_str(&format!("Team: {}\n", application.team));
    text.push_str(&format!(
        "Applied At: {}\n\n",
        format_timestamp(&application.applied_at)
    ));

    if let Some(cover_letter) = &application.cover_letter {
        text.push_str(&format!("Cover Letter:\n{cover_letter}\n\n"));
    }

    if let Some(resume_url) = &application.resume_url {
        text.push_str(&format!("Resume: {resume_url}\n\n"));
    }

    text.push_str(&format!(
        "---\nThis is an automated notification from the {app_name}"
    ));
    text
}

pub fn html_body(application: &Application, app_name: &str) -> String {
    let name = escape_html(&application.applicant_name);
    let email = escape_html(&application.applicant_email);
    let position = escape_html(&application.position);
    let team = escape_html(&application.team);
    let applied_at = format_timestamp(&application.applied_at);

    let cover_letter = application
        .cover_letter
        .as_deref()
        .map(|letter| {
            format!(
                r#"
  <div style="background-color: #fff; padding: 20px; border-left: 4px solid #007bff; margin: 20px 0;">
    <h3 style="color: #333; margin-top: 0;">Cover Letter</h3>
    <p style="white-space: pre-wrap;">{}</p>
  </div>"#,
                escape_html(letter)
            )
        })
        .unwrap_or_default();

    let resume = application
        .resume_url
        .as_deref()
        .map(|url| {
            format!(
                r#"
  <div style="margin: 20px 0;">
    <h3 style="color: #333;">Resume</h3>
    <p><a href="{}" style="color: #007bff; text-decoration: none;">View Resume</a></p>
  </div>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px;">
    New Job Application Received
  </h2>
  <div style="background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin: 20px 0;">
    <h3 style="color: #007bff; margin-top: 0;">Applicant Information</h3>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
    <p><strong>Position:</strong> {position}</p>
    <p><strong>Team:</strong> {team}</p>
    <p><strong>Applied At:</strong> {applied_at}</p>
  </div>{cover_letter}{resume}
  <div style="background-color: #e9ecef; padding: 15px; border-radius: 5px; margin-top: 30px; text-align: center;">
    <p style="margin: 0; color: #6c757d; font-size: 12px;">
      This is an automated notification from the {app_name}
    </p>
  </div>
</div>
"#,
        app_name = escape_html(app_name),
    )
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn application() -> Application {
        Application {
            id: "app1".to_string(),
            applicant_name: "Linus".to_string(),
            applicant_email: "linus@example.com".to_string(),
            position: "Kernel Hacker".to_string(),
            team: "engineering".to_string(),
            resume_url: None,
            cover_letter: None,
            applied_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            status: Default::default(),
        }
    }

    #[test]
    fn test_subject() {
        assert_eq!(subject(&application()), "New Application: Kernel Hacker - Linus");
    }

    #[test]
    fn test_text_body_without_optionals() {
        let text = text_body(&application(), "Hiring Bot");
        assert!(text.starts_with("New Job Application Received\n\n"));
        assert!(text.contains("Name: Linus\n"));
        assert!(text.contains("Team: engineering\n"));
        assert!(text.contains("Applied At: 2024-03-01 09:30:00 UTC"));
        assert!(!text.contains("Cover Letter"));
        assert!(!text.contains("Resume:"));
        assert!(text.ends_with("automated notification from the Hiring Bot"));
    }

    #[test]
    fn test_text_body_with_optionals() {
        let mut app = application();
        app.cover_letter = Some("Hello there".to_string());
        app.resume_url = Some("https://example.com/cv.pdf".to_string());
        let text = text_body(&app, "Hiring Bot");
        assert!(text.contains("Cover Letter:\nHello there\n\n"));
        assert!(text.contains("Resume: https://example.com/cv.pdf\n\n"));
    }

    #[test]
    fn test_html_body_links_email_and_resume() {
        let mut app = application();
        app.resume_url = Some("https://example.com/cv.pdf".to_string());
        let html = html_body(&app, "Hiring Bot");
        assert!(html.contains(r#"<a href="mailto:linus@example.com">linus@example.com</a>"#));
        assert!(html.contains(r#"href="https://example.com/cv.pdf""#));
        assert!(!html.contains("Cover Letter"));
        assert!(html.contains("automated notification from the Hiring Bot"));
    }

    #[test]
    fn test_html_body_escapes_applicant_text() {
        let mut app = application();
        app.cover_letter = Some("<script>alert('x')</script> & more".to_string());
        let html = html_body(&app, "Hiring Bot");
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_to_header_keeps_order_and_duplicates() {
        let email = OutgoingEmail {
            from: "noreply@company.com".to_string(),
            to: vec![
                "b@x.com".to_string(),
                "a@x.com".to_string(),
                "b@x.com".to_string(),
            ],
            subject: String::new(),
            text: String::new(),
            html: String::new(),
        };
        assert_eq!(email.to_header(), "b@x.com, a@x.com, b@x.com");
    }
}
