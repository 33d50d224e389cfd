//! HTTP handler functions for the carbon tracker API.

use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse, web};
use carbon_tracker_ai::render_reply;
use carbon_tracker_footprint::annual::{REDUCTION_TIPS, estimate_annual};
use carbon_tracker_footprint_models::AnnualInputs;
use carbon_tracker_geography::GeoPoint;
use carbon_tracker_server_models::{
    AddPointRequest, AddTransportRequest, ApiAnnualEstimate, ApiChatHistory, ApiError,
    ApiFootprint, ApiHealth, ApiPoints, ApiReply, ApiSession, ApiTip, ApiTransportLedger,
    ApiTransportRecord, ChatMessageRequest, UpdateInputsRequest,
};
use carbon_tracker_session::{ChatRole, HouseholdInputs, Session, SessionError};
use uuid::Uuid;

use crate::AppState;

fn error_response(mut builder: actix_web::HttpResponseBuilder, message: String) -> HttpResponse {
    builder.json(ApiError { error: message })
}

fn not_found(e: &SessionError) -> HttpResponse {
    error_response(HttpResponse::NotFound(), e.to_string())
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    error_response(HttpResponse::BadRequest(), message.into())
}

/// Turns a rejected JSON body into a `400` with an [`ApiError`] body.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

/// Turns an unparseable path segment (e.g. a malformed session id) into a
/// `404` with an [`ApiError`] body.
pub fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = error_response(HttpResponse::NotFound(), err.to_string());
    InternalError::from_response(err, response).into()
}

fn ledger_view(session: &Session, added: Option<bool>) -> ApiTransportLedger {
    ApiTransportLedger {
        added,
        records: session
            .ledger
            .numbered()
            .map(|(i, r)| ApiTransportRecord::new(i, r))
            .collect(),
    }
}

fn points_view(session: &Session) -> ApiPoints {
    ApiPoints {
        points: session.points.points().to_vec(),
        distance_km: session.points.distance_km(),
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/coefficients`
///
/// Returns the emission factors in use.
pub async fn coefficients(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.coefficients.as_ref())
}

/// `POST /api/annual`
///
/// Coarse annual estimate from four raw quantities.
pub async fn annual(body: web::Json<AnnualInputs>) -> HttpResponse {
    let inputs = body.into_inner();
    if let Err(e) = inputs.validate() {
        return bad_request(e.to_string());
    }

    let estimate = estimate_annual(&inputs);
    HttpResponse::Ok().json(ApiAnnualEstimate {
        estimate,
        summary: format!(
            "Your estimated carbon footprint is {:.2} metric tons of CO2e per year.",
            estimate.total
        ),
        tips: REDUCTION_TIPS
            .iter()
            .map(|(title, detail)| ApiTip {
                title: (*title).to_string(),
                detail: (*detail).to_string(),
            })
            .collect(),
    })
}

/// `POST /api/sessions`
pub async fn create_session(state: web::Data<AppState>) -> HttpResponse {
    let session_id = state.sessions.create();
    HttpResponse::Created().json(ApiSession { session_id })
}

/// `DELETE /api/sessions/{id}`
pub async fn end_session(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    let id = id.into_inner();
    if state.sessions.remove(id) {
        HttpResponse::NoContent().finish()
    } else {
        not_found(&SessionError::NotFound(id))
    }
}

/// `POST /api/sessions/{id}/reset`
///
/// Clears the ledger, points and chat and restores default inputs.
pub async fn reset_session(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state.sessions.with_session(id.into_inner(), Session::reset) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => not_found(&e),
    }
}

/// `GET /api/sessions/{id}/transport`
pub async fn list_transport(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state
        .sessions
        .with_session(id.into_inner(), |s| ledger_view(s, None))
    {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => not_found(&e),
    }
}

/// `POST /api/sessions/{id}/transport`
///
/// Appends a record. Zero distance or zero trips is ignored and reported
/// with `added: false`.
pub async fn add_transport(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<AddTransportRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    match state.sessions.with_session(id.into_inner(), |s| {
        let added = s.ledger.add(req.mode, req.distance_km, req.trips);
        ledger_view(s, Some(added))
    }) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => not_found(&e),
    }
}

/// `DELETE /api/sessions/{id}/transport`
pub async fn reset_transport(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state
        .sessions
        .with_session(id.into_inner(), |s| s.ledger.reset())
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => not_found(&e),
    }
}

/// `PUT /api/sessions/{id}/inputs`
pub async fn update_inputs(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateInputsRequest>,
) -> HttpResponse {
    let inputs: HouseholdInputs = body.into_inner().into();
    match state
        .sessions
        .with_session(id.into_inner(), |s| s.set_inputs(inputs))
    {
        Ok(Ok(())) => HttpResponse::NoContent().finish(),
        Ok(Err(e)) => bad_request(e.to_string()),
        Err(e) => not_found(&e),
    }
}

/// `GET /api/sessions/{id}/footprint`
///
/// Recomputes the monthly footprint from the session's current state.
pub async fn footprint(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state.sessions.with_session(id.into_inner(), |s| {
        ApiFootprint::new(
            s.footprint(&state.coefficients),
            *s.inputs(),
            s.ledger.len(),
        )
    }) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => not_found(&e),
    }
}

/// `GET /api/sessions/{id}/points` and `GET /api/sessions/{id}/distance`
pub async fn points(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state.sessions.with_session(id.into_inner(), |s| points_view(s)) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => not_found(&e),
    }
}

/// `POST /api/sessions/{id}/points`
///
/// Records a map click; only the two most recent clicks are kept.
pub async fn add_point(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<AddPointRequest>,
) -> HttpResponse {
    let point = match GeoPoint::new(body.latitude, body.longitude) {
        Ok(p) => p,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.sessions.with_session(id.into_inner(), |s| {
        s.points.record_click(point);
        points_view(s)
    }) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => not_found(&e),
    }
}

/// `DELETE /api/sessions/{id}/points`
pub async fn reset_points(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state
        .sessions
        .with_session(id.into_inner(), |s| s.points.reset())
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => not_found(&e),
    }
}

/// `POST /api/sessions/{id}/tips`
///
/// Asks the chat service for tips on the session's current footprint.
/// Upstream failures are reported in the body, not as an HTTP error.
pub async fn tips(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    let total = match state
        .sessions
        .with_session(id.into_inner(), |s| s.footprint(&state.coefficients).total())
    {
        Ok(total) => total,
        Err(e) => return not_found(&e),
    };

    let result = state.tips.get_tips(total).await;
    HttpResponse::Ok().json(ApiReply {
        is_error: result.is_err(),
        reply: render_reply(&result),
    })
}

/// `POST /api/sessions/{id}/chat`
///
/// Records the user's message, forwards it to the chat service, and
/// records the rendered reply.
pub async fn chat(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<ChatMessageRequest>,
) -> HttpResponse {
    let id = id.into_inner();
    let text = body.into_inner().text;
    if text.trim().is_empty() {
        return bad_request("text must not be empty");
    }

    if let Err(e) = state
        .sessions
        .with_session(id, |s| s.chat.append_turn(ChatRole::User, text.clone()))
    {
        return not_found(&e);
    }

    let result = state.tips.get_bot_response(&text).await;
    let reply = render_reply(&result);

    // The session may have ended while waiting on the upstream call.
    if let Err(e) = state
        .sessions
        .with_session(id, |s| s.chat.append_turn(ChatRole::Assistant, reply.clone()))
    {
        log::debug!("Dropping chat reply: {e}");
        return not_found(&e);
    }

    HttpResponse::Ok().json(ApiReply {
        is_error: result.is_err(),
        reply,
    })
}

/// `GET /api/sessions/{id}/chat`
pub async fn chat_history(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state.sessions.with_session(id.into_inner(), |s| ApiChatHistory {
        turns: s.chat.turns().to_vec(),
    }) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => not_found(&e),
    }
}

/// `DELETE /api/sessions/{id}/chat`
pub async fn clear_chat(state: web::Data<AppState>, id: web::Path<Uuid>) -> HttpResponse {
    match state
        .sessions
        .with_session(id.into_inner(), |s| s.chat.clear())
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => not_found(&e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use carbon_tracker_ai::providers::{ChatRequest, LlmProvider, UnconfiguredProvider};
    use carbon_tracker_ai::{AiError, TipsAdapter};
    use carbon_tracker_footprint::EmissionCoefficients;
    use carbon_tracker_session::SessionStore;
    use serde_json::{Value, json};

    use crate::{AppState, configure};

    struct EchoProvider;

    #[async_trait::async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(&self, request: &ChatRequest) -> Result<String, AiError> {
            let last = request.messages.last().map_or("", |m| m.content.as_str());
            Ok(format!("  echo: {last}  "))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn state(provider: Arc<dyn LlmProvider>) -> actix_web::web::Data<AppState> {
        actix_web::web::Data::new(AppState {
            coefficients: Arc::new(EmissionCoefficients::embedded().unwrap()),
            sessions: Arc::new(SessionStore::new()),
            tips: TipsAdapter::new(provider),
        })
    }

    macro_rules! app {
        ($provider:expr) => {
            test::init_service(App::new().app_data(state($provider)).configure(configure)).await
        };
    }

    macro_rules! new_session {
        ($app:expr) => {{
            let req = test::TestRequest::post().uri("/api/sessions").to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            body["sessionId"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(Arc::new(EchoProvider));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn annual_estimate_and_validation() {
        let app = app!(Arc::new(EchoProvider));

        let req = test::TestRequest::post()
            .uri("/api/annual")
            .set_json(json!({
                "transportKmPerYear": 1000.0,
                "energyMwhPerYear": 10.0,
                "meatMealsPerMonth": 10.0,
                "wasteKgPerWeek": 20.0
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!((body["estimate"]["total"].as_f64().unwrap() - 205.0).abs() < 1e-9);
        assert_eq!(body["tips"].as_array().unwrap().len(), 4);
        assert!(body["summary"].as_str().unwrap().contains("205.00 metric tons"));

        let req = test::TestRequest::post()
            .uri("/api/annual")
            .set_json(json!({
                "transportKmPerYear": -1.0,
                "energyMwhPerYear": 0.0,
                "meatMealsPerMonth": 0.0,
                "wasteKgPerWeek": 0.0
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn transport_ledger_and_footprint() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/transport"))
            .set_json(json!({ "mode": "car", "distanceKm": 100.0, "trips": 2 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["added"], true);
        assert_eq!(body["records"][0]["index"], 1);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/transport"))
            .set_json(json!({ "mode": "car", "distanceKm": 0.0, "trips": 2 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["added"], false);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{id}/inputs"))
            .set_json(json!({ "electricityKwh": 0.0, "diet": "vegan", "wasteKg": 0.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/footprint"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let breakdown = &body["breakdown"];
        assert!((breakdown["transportation"].as_f64().unwrap() - 54.2).abs() < 1e-9);
        assert!((breakdown["food"].as_f64().unwrap() - 45.0).abs() < 1e-9);
        assert_eq!(body["recordCount"], 1);
    }

    #[actix_web::test]
    async fn overflowing_record_is_not_added() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/transport"))
            .set_json(json!({ "mode": "long_haul_flight", "distanceKm": 1e308, "trips": 10 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["added"], false);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/footprint"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["breakdown"]["total"].as_f64().is_some());
        assert!(body["breakdown"]["transportation"].as_f64().is_some());
    }

    #[actix_web::test]
    async fn malformed_requests_get_json_errors() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::get()
            .uri("/api/sessions/not-a-uuid/footprint")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/transport"))
            .set_json(json!({ "mode": "car", "distanceKm": 10.0, "trips": -1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn negative_inputs_are_bad_request() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{id}/inputs"))
            .set_json(json!({ "electricityKwh": -1.0, "diet": "omnivore", "wasteKg": 0.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn distance_appears_with_two_points() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        for (lat, lon) in [(0.0, 0.0), (40.7128, -74.006), (51.5074, -0.1278)] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/sessions/{id}/points"))
                .set_json(json!({ "latitude": lat, "longitude": lon }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/distance"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["points"].as_array().unwrap().len(), 2);
        assert!((body["points"][0]["latitude"].as_f64().unwrap() - 40.7128).abs() < 1e-9);
        let d = body["distanceKm"].as_f64().unwrap();
        assert!((d - 5585.234).abs() < 1.0, "got {d}");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{id}/points"))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/points"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["points"].as_array().unwrap().is_empty());
        assert!(body["distanceKm"].is_null());
    }

    #[actix_web::test]
    async fn invalid_point_is_bad_request() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/points"))
            .set_json(json!({ "latitude": 95.0, "longitude": 0.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn chat_records_both_turns() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/chat"))
            .set_json(json!({ "text": "Is composting worth it?" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["reply"], "echo: Is composting worth it?");
        assert_eq!(body["isError"], false);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/chat"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let turns = body["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[1]["role"], "assistant");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{id}/chat"))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/chat"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["turns"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn missing_credentials_render_as_error_reply() {
        let app = app!(Arc::new(UnconfiguredProvider::new(
            "OPENAI_API_KEY environment variable not set"
        )));
        let id = new_session!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/tips"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["isError"], true);
        assert!(body["reply"].as_str().unwrap().starts_with("Error: "));
    }

    #[actix_web::test]
    async fn reset_session_empties_everything() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/transport"))
            .set_json(json!({ "mode": "long_haul_flight", "distanceKm": 6000.0, "trips": 1 }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/reset"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/transport"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["records"].as_array().unwrap().is_empty());
        assert!(body.get("added").is_none());
    }

    #[actix_web::test]
    async fn ended_session_is_not_found() {
        let app = app!(Arc::new(EchoProvider));
        let id = new_session!(app);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/footprint"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Session not found"));
    }
}
