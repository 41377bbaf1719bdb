//! RPC method handler for the RepoScout JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! appropriate managers and services via the `App` struct.
//!
//! The server runs on a current-thread runtime, so holding the `App` lock
//! across the await points here never blocks another executor thread.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::token_store::TokenStoreTrait;
use crate::pages;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::recommendation::SubmitOutcome;
use crate::types::session::{AuthState, Route};

fn auth_state_json(state: &AuthState) -> Value {
    match state {
        AuthState::Unauthenticated => json!({"state": "unauthenticated"}),
        AuthState::Verifying => json!({"state": "verifying"}),
        AuthState::Authenticated(profile) => json!({
            "state": "authenticated",
            "profile": {
                "username": profile.username,
                "email": profile.email,
                "avatar_url": profile.avatar_url,
            }
        }),
    }
}

fn outcome_json(outcome: SubmitOutcome) -> Value {
    match outcome {
        SubmitOutcome::Recommendations(items) => json!({
            "outcome": "recommendations",
            "recommendations": items,
        }),
        SubmitOutcome::DailyLimit(message) => json!({
            "outcome": "daily_limit",
            "message": message,
        }),
        SubmitOutcome::Rejected(message) => json!({
            "outcome": "rejected",
            "message": message,
        }),
    }
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        // ─── Session ───
        "session.status" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(auth_state_json(a.session_manager.state()))
        }
        "session.login_url" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"url": a.api.login_url().to_string()}))
        }
        "session.callback" => {
            let query = params
                .get("query")
                .and_then(|v| v.as_str())
                .ok_or("missing query")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let accepted = a.session_manager.complete_login(query);
            if accepted {
                a.startup().await;
            }
            let state = auth_state_json(a.session_manager.state());
            Ok(json!({"accepted": accepted, "session": state}))
        }
        "session.verify" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.startup().await;
            Ok(auth_state_json(a.session_manager.state()))
        }
        "session.refresh" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let api = a.api.clone();
            match a.session_manager.refresh(&api).await {
                Ok(()) => Ok(json!({"ok": true})),
                Err(e) => Err(e),
            }
        }
        "session.logout" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.logout();
            Ok(json!({"ok": true}))
        }
        "session.route" => {
            let requested = params
                .get("path")
                .and_then(|v| v.as_str())
                .ok_or("missing path")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let route = a.session_manager.route_for(Route::from_path(requested));
            Ok(json!({"path": route.as_path()}))
        }

        // ─── Form ───
        "form.set_username" => {
            let value = params
                .get("value")
                .and_then(|v| v.as_str())
                .ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.set_username(value);
            a.anon_form_manager.set_username(value);
            Ok(json!({"ok": true}))
        }
        "form.set_language_input" => {
            let value = params
                .get("value")
                .and_then(|v| v.as_str())
                .ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.set_language_input(value);
            Ok(json!({"languages": a.form_manager.languages(), "input": a.form_manager.language_input()}))
        }
        "form.set_topic_input" => {
            let value = params
                .get("value")
                .and_then(|v| v.as_str())
                .ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.set_topic_input(value);
            Ok(json!({"topics": a.form_manager.topics(), "input": a.form_manager.topic_input()}))
        }
        "form.commit_language" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.commit_language();
            Ok(json!({"languages": a.form_manager.languages()}))
        }
        "form.commit_topic" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.commit_topic();
            Ok(json!({"topics": a.form_manager.topics()}))
        }
        "form.remove_language" => {
            let value = params
                .get("value")
                .and_then(|v| v.as_str())
                .ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.remove_language(value);
            Ok(json!({"languages": a.form_manager.languages()}))
        }
        "form.remove_topic" => {
            let value = params
                .get("value")
                .and_then(|v| v.as_str())
                .ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.form_manager.remove_topic(value);
            Ok(json!({"topics": a.form_manager.topics()}))
        }
        "form.state" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({
                "username": a.form_manager.username(),
                "languages": a.form_manager.languages(),
                "topics": a.form_manager.topics(),
                "language_input": a.form_manager.language_input(),
                "topic_input": a.form_manager.topic_input(),
                "submitting": a.form_manager.is_submitting(),
            }))
        }
        "form.submit" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let token = a.session_manager.token();
            let request = a
                .form_manager
                .begin_submit(token.is_some())
                .map_err(|e| e.to_string())?;
            let api = a.api.clone();
            let result = api.fetch_recommendations(&request, token.as_deref()).await;
            let outcome = a.form_manager.finish_submit(result);
            Ok(outcome_json(outcome))
        }
        "form.submit_anonymous" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let request = a
                .anon_form_manager
                .begin_submit(false)
                .map_err(|e| e.to_string())?;
            let api = a.api.clone();
            let result = api.fetch_recommendations(&request, None).await;
            let outcome = a.anon_form_manager.finish_submit(result);
            Ok(outcome_json(outcome))
        }

        // ─── History ───
        "history.ids" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let username = a
                .session_manager
                .profile()
                .map(|p| p.username.clone())
                .ok_or("not authenticated")?;
            let token = a.session_manager.token().ok_or("not authenticated")?;
            let api = a.api.clone();
            let ids = a
                .history_manager
                .load_ids(&api, &username, &token)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"ids": ids}))
        }
        "history.select" => {
            let id = params
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or("missing id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let token = a.session_manager.token().ok_or("not authenticated")?;
            let api = a.api.clone();
            let selected = a
                .history_manager
                .select_id(&api, id, &token)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"id": selected.id, "recommendations": selected.items}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params
                .get("key")
                .and_then(|v| v.as_str())
                .ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Pages ───
        "page.recommendations" => {
            let items: Vec<crate::types::recommendation::RepositorySummary> =
                serde_json::from_value(
                    params.get("recommendations").cloned().unwrap_or(json!([])),
                )
                .map_err(|e| format!("invalid recommendations: {}", e))?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let html = pages::recommendation_list_html(&items, a.max_topics_per_card());
            Ok(json!({"html": html}))
        }
        "page.history" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"html": pages::history_list_html(a.history_manager.ids_state())}))
        }
        "page.login" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"html": pages::login_html(a.api.login_url().as_str())}))
        }

        // ─── Debug ───
        "debug.has_token" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"has_token": a.token_store.has_token()}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
