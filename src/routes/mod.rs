//! HTTP handlers and the helpers they share.

use actix_web::{HttpRequest, HttpResponse, http::header};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::de::DeserializeOwned;
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedAdmin;

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod inspections;
pub mod master;
pub mod trees;
pub mod volunteers;

/// Bootstrap alert class of a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: alerts, the signed-in admin and the active
/// sidebar entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    admin: Option<&AuthenticatedAdmin>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &admin);
    context.insert("current_page", current_page);
    context
}

/// Renders the layout with a single error alert in place of a page whose
/// data could not be fetched.
pub fn render_fetch_error(
    tera: &Tera,
    admin: &AuthenticatedAdmin,
    current_page: &str,
    message: &str,
) -> HttpResponse {
    let mut context = Context::new();
    context.insert("alerts", &[(message, "danger")]);
    context.insert("current_user", &Some(admin));
    context.insert("current_page", current_page);

    match tera.render("error.html", &context) {
        Ok(body) => HttpResponse::InternalServerError()
            .content_type("text/html")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template 'error.html': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Parses the query string with repeated keys collected into lists.
/// Malformed input falls back to the default query.
pub fn parse_query<T>(req: &HttpRequest) -> T
where
    T: DeserializeOwned + Default,
{
    serde_html_form::from_str(req.query_string()).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed query '{}': {err}", req.query_string());
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::inspections::InspectionsQuery;
    use actix_web::test::TestRequest;

    #[test]
    fn redirect_is_see_other() {
        let response = redirect("/volunteers");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/volunteers"
        );
    }

    #[test]
    fn repeated_query_keys_become_lists() {
        let req = TestRequest::with_uri("/inspections?status=Pending&status=Overdue&page=2")
            .to_http_request();
        let query: InspectionsQuery = parse_query(&req);

        assert_eq!(query.status, vec!["Pending", "Overdue"]);
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn malformed_query_uses_defaults() {
        let req = TestRequest::with_uri("/inspections?page=abc").to_http_request();
        let query: InspectionsQuery = parse_query(&req);

        assert_eq!(query.page, None);
        assert!(query.status.is_empty());
    }
}
