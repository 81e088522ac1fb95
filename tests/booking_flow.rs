//! Integration tests for the request lifecycle.
//!
//! Exercises the public contract end to end: a validated form action with
//! keep-and-redirect, the error cookie round-trip, and field rendering on
//! the follow-up request.

#![cfg(feature = "validation")]

use gantry::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn booking_app() -> App {
    let mut app = App::new(AppConfig::new("it-secret"));
    app.register_plugin(ValidationPlugin::new());
    app
}

/// The booking form action: validates the check-in date, keeps the errors
/// and redirects on failure, renders on success.
fn book_action() -> ActionFn {
    Box::new(|ctx| {
        Box::pin(async move {
            let check_in: String = ctx.params.bind("booking.check_in");

            let validation = ctx.validation().expect("validation plugin registered");
            let failed = {
                let mut validation = validation.lock().unwrap();
                validation
                    .required(check_in.as_str())
                    .key("booking.check_in")
                    .message("Check-in date is required");
                if validation.has_errors() {
                    validation.keep();
                }
                validation.has_errors()
            };

            if failed {
                ctx.flash_params();
                return Ok(HttpResponse::redirect("/hotels/book"));
            }

            ctx.render_arg("booking", json!({ "check_in": check_in }));
            Ok(HttpResponse::ok())
        })
    })
}

#[tokio::test]
async fn test_invalid_post_redirects_with_error_cookie() {
    let app = booking_app();

    let request = HttpRequest::new("POST", "/hotels/book")
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body(b"booking.check_in=&booking.hotel=Lakeside".to_vec());
    let response = app.handle(request, "Hotels.book", book_action()).await;

    assert_eq!(response.status, 302);
    assert_eq!(
        response.headers.get("Location").map(String::as_str),
        Some("/hotels/book")
    );

    let cookie = response
        .cookies
        .iter()
        .find(|c| c.name == "GANTRY_ERRORS")
        .expect("error cookie set");
    let errors = gantry_validation::decode_errors(&cookie.value);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].key, "booking.check_in");
    assert_eq!(errors[0].message, "Check-in date is required");
}

#[tokio::test]
async fn test_follow_up_request_restores_errors_for_rendering() {
    let app = booking_app();

    // First request: invalid form, errors kept in the cookie.
    let request = HttpRequest::new("POST", "/hotels/book")
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body(b"booking.check_in=".to_vec());
    let response = app.handle(request, "Hotels.book", book_action()).await;
    let cookie_value = response.cookies[0].value.clone();

    // Follow-up request after the redirect, cookie included. The action
    // flashes the previously submitted value and renders the form.
    let form_action: ActionFn = Box::new(|ctx| {
        Box::pin(async move {
            ctx.flash("booking.check_in", "2024-01-01");
            Ok(HttpResponse::ok())
        })
    });
    let request = HttpRequest::new("GET", "/hotels/book")
        .with_header("Cookie", format!("GANTRY_ERRORS={}", cookie_value));
    let mut ctx = RequestContext::new(request, "Hotels.form", app.config());
    let response = app.handle_in(&mut ctx, form_action).await;
    assert_eq!(response.status, 200);

    // The error map was published for the render pass, and the cookie was
    // cleared because the follow-up action did not call keep.
    let field = gantry_validation::Field::new("booking.check_in", &ctx.render_args);
    assert_eq!(field.id(), "booking_check_in");
    assert_eq!(field.error_class(), gantry_validation::ERROR_CLASS);
    assert_eq!(field.error_message(), "Check-in date is required");
    assert_eq!(field.flash(), "2024-01-01");

    let cleared = response
        .cookies
        .iter()
        .find(|c| c.name == "GANTRY_ERRORS")
        .expect("cookie written");
    assert_eq!(cleared.value, "");
}

#[tokio::test]
async fn test_valid_post_renders_and_clears_cookie() {
    let app = booking_app();

    let request = HttpRequest::new("POST", "/hotels/book")
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body(b"booking.check_in=2024-01-01".to_vec());
    let mut ctx = RequestContext::new(request, "Hotels.book", app.config());
    let response = app.handle_in(&mut ctx, book_action()).await;

    assert_eq!(response.status, 200);
    assert_eq!(ctx.render_args["booking"]["check_in"], json!("2024-01-01"));
    assert_eq!(ctx.render_args["errors"], json!({}));
    assert_eq!(response.cookies[0].value, "");
}

#[tokio::test]
async fn test_controller_scoped_interceptors_wrap_the_action() {
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl MethodInterceptor for Recorder {
        async fn call(&self, _ctx: &mut RequestContext) -> Result<(), Error> {
            self.log.lock().unwrap().push(self.label);
            Ok(())
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut app = booking_app();
    app.intercept(
        "Hotels.*",
        When::Before,
        Recorder { label: "begin", log: log.clone() },
    );
    app.intercept(
        "Hotels.*",
        When::Finally,
        Recorder { label: "release", log: log.clone() },
    );

    let failing: ActionFn =
        Box::new(|_ctx| Box::pin(async { Err(Error::Internal("boom".into())) }));
    let request = HttpRequest::new("GET", "/hotels/1");
    let response = app.handle(request, "Hotels.show", failing).await;

    assert_eq!(response.status, 500);
    // FINALLY still ran on the failure edge.
    assert_eq!(*log.lock().unwrap(), vec!["begin", "release"]);
}
