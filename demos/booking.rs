// Booking demo: the registration block of a small hotel-booking app.
//
// Shows the public contract end to end: plugin registration, interceptor
// wiring for a controller family, a deferred startup callback, and a
// validated form action using keep-and-redirect. Run with:
//
//     cargo run --example booking

use async_trait::async_trait;
use gantry::logging::LogConfig;
use gantry::prelude::*;
use serde_json::json;

/// Interceptor family wrapped around every `Hotels.*` action, the same
/// shape a transaction-per-controller plugin uses.
struct Audit(&'static str);

#[async_trait]
impl MethodInterceptor for Audit {
    async fn call(&self, ctx: &mut RequestContext) -> Result<(), Error> {
        println!("  [{}] {}", self.0, ctx.action);
        Ok(())
    }
}

/// The booking form action: validate, then keep-and-redirect or render.
fn book_action() -> ActionFn {
    Box::new(|ctx| {
        Box::pin(async move {
            let check_in: String = ctx.params.bind("booking.check_in");
            let guests: u32 = ctx.params.bind("booking.guests");

            let validation = ctx.validation().expect("validation plugin registered");
            let failed = {
                let mut validation = validation.lock().unwrap();
                validation
                    .required(check_in.as_str())
                    .key("booking.check_in")
                    .message("Check-in date is required");
                validation
                    .range(guests, 1, 4)
                    .key("booking.guests")
                    .message("Bookings are for 1 to 4 guests");
                if validation.has_errors() {
                    validation.keep();
                }
                validation.has_errors()
            };

            if failed {
                ctx.flash_params();
                return Ok(HttpResponse::redirect("/hotels/book"));
            }

            ctx.render_arg("booking", json!({ "check_in": check_in, "guests": guests }));
            Ok(HttpResponse::ok())
        })
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    LogConfig::new().init();

    let mut app = App::new(AppConfig::new("demo-secret"));
    app.register_plugin(ValidationPlugin::new());
    app.intercept("Hotels.*", When::Before, Audit("begin"));
    app.intercept("Hotels.*", When::After, Audit("commit"));
    app.intercept("Hotels.*", When::Finally, Audit("release"));
    app.on_start(|| async {
        println!("booking demo ready");
        Ok(())
    });
    app.start().await?;

    // An invalid submission: empty check-in date, too many guests.
    println!("POST /hotels/book (invalid form)");
    let request = HttpRequest::new("POST", "/hotels/book")
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body(b"booking.check_in=&booking.guests=7".to_vec());
    let response = app.handle(request, "Hotels.book", book_action()).await;
    let error_cookie = response
        .cookies
        .iter()
        .find(|c| c.name == "GANTRY_ERRORS")
        .cloned()
        .expect("error cookie");
    println!(
        "  -> {} {}",
        response.status,
        response.headers.get("Location").map(String::as_str).unwrap_or("")
    );

    // The follow-up render after the redirect: errors come back from the
    // cookie and the Field helper joins them per input.
    println!("GET /hotels/book (after redirect)");
    let request = HttpRequest::new("GET", "/hotels/book")
        .with_header("Cookie", format!("{}={}", error_cookie.name, error_cookie.value));
    let form_action: ActionFn = Box::new(|ctx| {
        Box::pin(async move {
            ctx.flash("booking.check_in", "2024-06-01");
            Ok(HttpResponse::ok())
        })
    });
    let mut ctx = RequestContext::new(request, "Hotels.form", app.config());
    app.handle_in(&mut ctx, form_action).await;
    for name in ["booking.check_in", "booking.guests"] {
        let field = Field::new(name, &ctx.render_args);
        println!(
            "  field id={} class={:?} error={:?} flash={:?}",
            field.id(),
            field.error_class(),
            field.error_message(),
            field.flash()
        );
    }

    // A valid submission renders directly.
    println!("POST /hotels/book (valid form)");
    let request = HttpRequest::new("POST", "/hotels/book")
        .with_header("Content-Type", "application/x-www-form-urlencoded")
        .with_body(b"booking.check_in=2024-06-01&booking.guests=2".to_vec());
    let mut ctx = RequestContext::new(request, "Hotels.book", app.config());
    let response = app.handle_in(&mut ctx, book_action()).await;
    println!("  -> {} booking={}", response.status, ctx.render_args["booking"]);

    app.shutdown();
    Ok(())
}
