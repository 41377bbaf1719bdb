//! WebView-based client application using `wry` + `tao`.
//!
//! Architecture:
//! - Internal pages (login, recommender, history) are served via the
//!   `rsct://` custom protocol, built from the pure renderers in
//!   [`crate::pages`].
//! - IPC from JS → Rust via `window.ipc.postMessage()`; commands mutate
//!   state on the event-loop thread only.
//! - Network calls are spawned on a tokio runtime with a cloned API
//!   client and re-enter the loop as [`UserEvent`]s — no state is held
//!   across an await. A result arriving after its view was dismissed is
//!   dropped by the router.
//! - The OAuth callback redirect is intercepted by the navigation handler
//!   on the `/auth-callback` path.

use std::sync::{Arc, Mutex};

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tao::window::WindowBuilder;
use wry::WebViewBuilder;

use crate::app::App;
use crate::pages;
use crate::types::errors::ApiError;
use crate::types::recommendation::RepositorySummary;
use crate::types::session::{AuthState, Route, UserProfile};

#[derive(Debug)]
enum UserEvent {
    LoadRoute(Route),
    EvalScript(String),
    SessionVerified,
    VerifyFinished(Result<UserProfile, ApiError>),
    SubmitFinished(Result<Vec<RepositorySummary>, ApiError>),
    HistoryIdsLoaded(Result<Vec<String>, ApiError>),
    HistoryDetailFetched {
        id: String,
        result: Result<Vec<RepositorySummary>, ApiError>,
    },
    AuthCallback(String),
}

struct ClientState {
    app: App,
    /// The route currently displayed; results for other routes are stale.
    current_route: Route,
}

/// Build HTML for internal pages with the shared chrome.
fn internal_page(body: &str, extra_js: &str) -> String {
    let mut html = String::with_capacity(body.len() + extra_js.len() + 2000);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>");
    html.push_str(":root{--bg-canvas:#0d1117;--bg-default:#161b22;--fg-default:#e6edf3;--fg-muted:#7d8590;--border-default:#30363d;--accent-fg:#58a6ff;--success-emphasis:#238636;--danger-fg:#f85149;--font:-apple-system,BlinkMacSystemFont,\"Segoe UI\",\"Noto Sans\",Helvetica,Arial,sans-serif}");
    html.push_str("*{margin:0;padding:0;box-sizing:border-box}");
    html.push_str("body{font-family:var(--font);background:var(--bg-canvas);color:var(--fg-default);min-height:100vh;padding:24px}");
    html.push_str(".repo-card{background:var(--bg-default);border:1px solid var(--border-default);border-radius:8px;padding:16px;margin:12px 0;display:flex;gap:16px}");
    html.push_str(".repo-details span{color:var(--fg-muted);margin-right:12px}");
    html.push_str(".topic{display:inline-block;background:#1f6feb33;color:var(--accent-fg);border-radius:12px;padding:2px 10px;margin:2px}");
    html.push_str(".tag{display:inline-block;background:var(--bg-default);border:1px solid var(--border-default);border-radius:12px;padding:2px 10px;margin:2px;cursor:pointer}");
    html.push_str(".error-message{color:var(--danger-fg)}");
    html.push_str("input,button{font-family:var(--font);font-size:14px;padding:6px 12px;border-radius:6px;border:1px solid var(--border-default);background:var(--bg-default);color:var(--fg-default)}");
    html.push_str("button{cursor:pointer}.github-login-button{display:inline-block;background:var(--success-emphasis);color:#fff;padding:10px 20px;border-radius:6px;text-decoration:none;margin-top:16px}");
    html.push_str("#toast{position:fixed;top:16px;right:16px;background:var(--bg-default);border:1px solid var(--border-default);border-radius:6px;padding:10px 16px;display:none}");
    html.push_str("</style></head><body>");
    html.push_str(body);
    html.push_str("<div id=\"toast\"></div><script>");
    html.push_str("window.__rs_ipc=function(cmd,data){window.ipc.postMessage(JSON.stringify(Object.assign({cmd:cmd},data||{})))};");
    html.push_str("window.__rs_showToast=function(msg){var t=document.getElementById('toast');t.textContent=msg;t.style.display='block';setTimeout(function(){t.style.display='none'},4000)};");
    html.push_str(extra_js);
    html.push_str("</script></body></html>");
    html
}

fn login_page(state: &ClientState) -> String {
    let body = pages::login_html(state.app.api.login_url().as_str());
    internal_page(&body, "")
}

fn recommender_page(state: &ClientState) -> String {
    let navbar = pages::navbar_html(state.app.session_manager.profile());
    let username = pages::html_escape(state.app.form_manager.username());
    let body = format!(
        concat!(
            "{}",
            "<h2>Get Recommendations</h2>",
            "<form id=\"reco-form\">",
            "<label>GitHub Username: <input id=\"f-username\" type=\"text\" value=\"{username}\" /></label><br/>",
            "<label>Preferred Languages: <input id=\"f-language\" type=\"text\" placeholder=\"Enter or comma to add\" /></label>",
            "<span id=\"language-tags\"></span><br/>",
            "<label>Extra Topics: <input id=\"f-topic\" type=\"text\" placeholder=\"Enter or comma to add\" /></label>",
            "<span id=\"topic-tags\"></span><br/>",
            "<button type=\"submit\" id=\"f-submit\">Get Recommendations</button>",
            "<button type=\"button\" id=\"nav-history\">Previous Recommendations</button>",
            "</form>",
            "<div id=\"reco-output\"></div>"
        ),
        navbar,
        username = username
    );

    let js = r#"
function renderTags(el,tags,cmd){
  var s=document.getElementById(el);s.innerHTML='';
  tags.forEach(function(t){
    var d=document.createElement('span');d.className='tag';d.textContent=t+' ×';
    d.addEventListener('click',function(){__rs_ipc(cmd,{value:t})});
    s.appendChild(d);
  });
}
function wireTagInput(id,setCmd,commitCmd){
  var i=document.getElementById(id);
  i.addEventListener('input',function(){__rs_ipc(setCmd,{value:i.value})});
  i.addEventListener('keydown',function(e){if(e.key==='Enter'){e.preventDefault();__rs_ipc(commitCmd,{});i.value='';}});
}
wireTagInput('f-language','set_language_input','commit_language');
wireTagInput('f-topic','set_topic_input','commit_topic');
document.getElementById('f-username').addEventListener('input',function(e){__rs_ipc('set_username',{value:e.target.value})});
document.getElementById('reco-form').addEventListener('submit',function(e){e.preventDefault();__rs_ipc('submit',{})});
document.getElementById('nav-history').addEventListener('click',function(){__rs_ipc('navigate',{path:'/history'})});
var lo=document.getElementById('logout');
if(lo)lo.addEventListener('click',function(){__rs_ipc('logout',{})});
__rs_ipc('ui_ready',{});
"#;

    internal_page(&body, js)
}

fn history_page(state: &ClientState) -> String {
    let navbar = pages::navbar_html(state.app.session_manager.profile());
    let listing = pages::history_list_html(state.app.history_manager.ids_state());
    let body = format!(
        "{}<button id=\"nav-back\">&lt; Go back</button>{}<div id=\"reco-output\"></div>",
        navbar, listing
    );

    let js = r#"
document.getElementById('nav-back').addEventListener('click',function(){__rs_ipc('navigate',{path:'/recommender'})});
document.querySelectorAll('.recommendation-ids button').forEach(function(b){
  b.addEventListener('click',function(){__rs_ipc('history_select',{id:b.dataset.id})});
});
var lo=document.getElementById('logout');
if(lo)lo.addEventListener('click',function(){__rs_ipc('logout',{})});
__rs_ipc('history_ready',{});
"#;

    internal_page(&body, js)
}

fn page_for(state: &ClientState, route: Route) -> String {
    match state.app.session_manager.route_for(route) {
        Route::Recommender => recommender_page(state),
        Route::History => history_page(state),
        Route::Login | Route::AuthCallback => login_page(state),
    }
}

fn route_url(route: Route) -> String {
    format!("rsct://localhost{}", route.as_path())
}

fn tags_update_script(state: &ClientState) -> String {
    format!(
        "if(typeof renderTags==='function'){{renderTags('language-tags',{},'remove_language');renderTags('topic-tags',{},'remove_topic');}}",
        serde_json::to_string(state.app.form_manager.languages()).unwrap_or_default(),
        serde_json::to_string(state.app.form_manager.topics()).unwrap_or_default(),
    )
}

fn show_recommendations_script(state: &ClientState, items: &[RepositorySummary]) -> String {
    let html = pages::recommendation_list_html(items, state.app.max_topics_per_card());
    format!(
        "var o=document.getElementById('reco-output');if(o){{o.innerHTML={};var el=document.getElementById('reco-list');if(el)el.scrollIntoView({{behavior:'smooth'}});}}",
        serde_json::to_string(&html).unwrap_or_default()
    )
}

// ─── IPC handler ───
//
// Runs on the event-loop thread. Commands that need the network return no
// event directly; they spawn a future that re-enters the loop.

fn handle_ipc(
    state: &mut ClientState,
    runtime: &tokio::runtime::Handle,
    proxy: &tao::event_loop::EventLoopProxy<UserEvent>,
    message: &str,
) -> Option<UserEvent> {
    let msg: serde_json::Value = serde_json::from_str(message).ok()?;
    let cmd = msg.get("cmd")?.as_str()?;

    match cmd {
        "ui_ready" => Some(UserEvent::EvalScript(tags_update_script(state))),

        "navigate" => {
            let path = msg.get("path").and_then(|v| v.as_str()).unwrap_or("/login");
            Some(UserEvent::LoadRoute(Route::from_path(path)))
        }

        "set_username" => {
            if let Some(value) = msg.get("value").and_then(|v| v.as_str()) {
                state.app.form_manager.set_username(value);
            }
            None
        }

        "set_language_input" => {
            let value = msg.get("value").and_then(|v| v.as_str())?;
            let before = state.app.form_manager.languages().len();
            state.app.form_manager.set_language_input(value);
            // A comma committed one or more tags; refresh the chips and
            // clear the input box.
            if state.app.form_manager.languages().len() != before {
                let script = format!(
                    "{}document.getElementById('f-language').value='';",
                    tags_update_script(state)
                );
                return Some(UserEvent::EvalScript(script));
            }
            None
        }

        "set_topic_input" => {
            let value = msg.get("value").and_then(|v| v.as_str())?;
            let before = state.app.form_manager.topics().len();
            state.app.form_manager.set_topic_input(value);
            if state.app.form_manager.topics().len() != before {
                let script = format!(
                    "{}document.getElementById('f-topic').value='';",
                    tags_update_script(state)
                );
                return Some(UserEvent::EvalScript(script));
            }
            None
        }

        "commit_language" => {
            state.app.form_manager.commit_language();
            Some(UserEvent::EvalScript(tags_update_script(state)))
        }

        "commit_topic" => {
            state.app.form_manager.commit_topic();
            Some(UserEvent::EvalScript(tags_update_script(state)))
        }

        "remove_language" => {
            if let Some(value) = msg.get("value").and_then(|v| v.as_str()) {
                state.app.form_manager.remove_language(value);
            }
            Some(UserEvent::EvalScript(tags_update_script(state)))
        }

        "remove_topic" => {
            if let Some(value) = msg.get("value").and_then(|v| v.as_str()) {
                state.app.form_manager.remove_topic(value);
            }
            Some(UserEvent::EvalScript(tags_update_script(state)))
        }

        "submit" => {
            let token = state.app.session_manager.token();
            match state.app.form_manager.begin_submit(token.is_some()) {
                Ok(request) => {
                    let api = state.app.api.clone();
                    let proxy = proxy.clone();
                    runtime.spawn(async move {
                        let result = api.fetch_recommendations(&request, token.as_deref()).await;
                        let _ = proxy.send_event(UserEvent::SubmitFinished(result));
                    });
                    Some(UserEvent::EvalScript(
                        "document.getElementById('f-submit').disabled=true;".to_string(),
                    ))
                }
                Err(e) => Some(UserEvent::EvalScript(format!(
                    "__rs_showToast({});",
                    serde_json::to_string(&e.to_string()).unwrap_or_default()
                ))),
            }
        }

        "history_ready" => {
            // Fetch-once: the FetchState guard refuses duplicates across
            // re-renders and in-flight fetches.
            if !state.app.history_manager.begin_ids_fetch() {
                return None;
            }
            let (username, token) = match (
                state.app.session_manager.profile().map(|p| p.username.clone()),
                state.app.session_manager.token(),
            ) {
                (Some(username), Some(token)) => (username, token),
                _ => return Some(UserEvent::LoadRoute(Route::Login)),
            };
            let api = state.app.api.clone();
            let proxy = proxy.clone();
            runtime.spawn(async move {
                let result = api.list_recommendation_ids(&username, &token).await;
                let _ = proxy.send_event(UserEvent::HistoryIdsLoaded(result));
            });
            None
        }

        "history_select" => {
            let id = msg.get("id").and_then(|v| v.as_str())?.to_string();
            let token = match state.app.session_manager.token() {
                Some(token) => token,
                None => return Some(UserEvent::LoadRoute(Route::Login)),
            };
            if let Some(items) = state.app.history_manager.cached_detail(&id) {
                let script = show_recommendations_script(state, &items.clone());
                return Some(UserEvent::EvalScript(script));
            }
            let api = state.app.api.clone();
            let proxy = proxy.clone();
            runtime.spawn(async move {
                let result = api.fetch_recommendation_detail(&id, &token).await;
                let _ = proxy.send_event(UserEvent::HistoryDetailFetched { id, result });
            });
            None
        }

        "logout" => {
            state.app.logout();
            Some(UserEvent::LoadRoute(Route::Login))
        }

        _ => None,
    }
}

// ─── Main entry point ───

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let data_dir = match std::env::var("REPOSCOUT_DATA_DIR") {
        Ok(dir) => std::path::PathBuf::from(dir),
        Err(_) => crate::platform::get_data_dir(),
    };
    let _ = std::fs::create_dir_all(&data_dir);
    let db_path = data_dir.join("reposcout.db");

    let app = App::new(db_path.to_str().unwrap_or("reposcout.db"))
        .expect("Failed to initialize RepoScout");

    let runtime = tokio::runtime::Runtime::new().expect("Failed to build tokio runtime");

    let state = Arc::new(Mutex::new(ClientState {
        app,
        current_route: Route::Login,
    }));

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    // Kick off startup verification once the loop starts; a stored token
    // puts the session manager in Verifying.
    {
        let s = state.lock().unwrap();
        if *s.app.session_manager.state() == AuthState::Verifying {
            let _ = proxy.send_event(UserEvent::SessionVerified);
        }
    }

    let window = WindowBuilder::new()
        .with_title("RepoScout")
        .with_inner_size(tao::dpi::LogicalSize::new(1100.0, 760.0))
        .build(&event_loop)
        .expect("Failed to create window");

    let protocol_state = state.clone();
    let ipc_state = state.clone();
    let ipc_proxy = proxy.clone();
    let nav_proxy = proxy.clone();

    let builder = WebViewBuilder::new()
        .with_custom_protocol("rsct".into(), move |_wv_id, request| {
            let path = request.uri().path().to_string();
            let html = {
                let s = protocol_state.lock().unwrap();
                page_for(&s, Route::from_path(&path))
            };
            wry::http::Response::builder()
                .header("Content-Type", "text/html; charset=utf-8")
                .body(html.into_bytes().into())
                .unwrap()
        })
        .with_url(&route_url(Route::Login))
        .with_ipc_handler({
            let runtime_handle = runtime.handle().clone();
            move |msg: wry::http::Request<String>| {
                let body = msg.body().as_str();
                let mut s = ipc_state.lock().unwrap();
                if let Some(event) = handle_ipc(&mut s, &runtime_handle, &ipc_proxy, body) {
                    let _ = ipc_proxy.send_event(event);
                }
            }
        })
        .with_navigation_handler(move |url: String| {
            // Intercept the OAuth callback redirect before the webview
            // renders it.
            if let Some(idx) = url.find("/auth-callback") {
                let query = url[idx..].split_once('?').map(|(_, q)| q).unwrap_or("");
                let _ = nav_proxy.send_event(UserEvent::AuthCallback(query.to_string()));
                return false;
            }
            true
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().expect("Failed to get GTK vbox");
        builder.build_gtk(vbox).expect("Failed to create WebView")
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window).expect("Failed to create WebView");

    let loop_runtime = runtime;
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                let mut s = state.lock().unwrap();
                s.app.shutdown();
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::LoadRoute(route) => {
                    let resolved = {
                        let mut s = state.lock().unwrap();
                        let resolved = s.app.session_manager.route_for(route);
                        s.current_route = resolved;
                        resolved
                    };
                    let _ = webview.load_url(&route_url(resolved));
                }

                UserEvent::EvalScript(js) => {
                    let _ = webview.evaluate_script(&js);
                }

                UserEvent::SessionVerified => {
                    // The verify call runs on the runtime; holding the lock
                    // here is only for the synchronous state reads.
                    let spawn_args = {
                        let mut s = state.lock().unwrap();
                        if *s.app.session_manager.state() != AuthState::Verifying {
                            let route = if s.app.session_manager.is_authenticated() {
                                Route::Recommender
                            } else {
                                Route::Login
                            };
                            let _ = proxy.send_event(UserEvent::LoadRoute(route));
                            None
                        } else {
                            match s.app.session_manager.token() {
                                Some(token) => Some((s.app.api.clone(), token)),
                                None => {
                                    s.app
                                        .session_manager
                                        .finish_verification(Err(ApiError::Unauthorized));
                                    let _ = proxy.send_event(UserEvent::LoadRoute(Route::Login));
                                    None
                                }
                            }
                        }
                    };
                    if let Some((api, token)) = spawn_args {
                        let proxy = proxy.clone();
                        loop_runtime.spawn(async move {
                            let result = api.verify_session(&token).await;
                            let _ = proxy.send_event(UserEvent::VerifyFinished(result));
                        });
                    }
                }

                UserEvent::VerifyFinished(result) => {
                    let route = {
                        let mut s = state.lock().unwrap();
                        s.app.session_manager.finish_verification(result);
                        if s.app.session_manager.is_authenticated() {
                            Route::Recommender
                        } else {
                            Route::Login
                        }
                    };
                    let _ = proxy.send_event(UserEvent::LoadRoute(route));
                }

                UserEvent::AuthCallback(query) => {
                    let accepted = {
                        let mut s = state.lock().unwrap();
                        s.app.session_manager.complete_login(&query)
                    };
                    if accepted {
                        let _ = proxy.send_event(UserEvent::SessionVerified);
                    } else {
                        let _ = proxy.send_event(UserEvent::LoadRoute(Route::Login));
                    }
                }

                UserEvent::SubmitFinished(result) => {
                    let mut s = state.lock().unwrap();
                    // A submit finishing after the user navigated away is
                    // stale: clear the flag, drop the result.
                    let stale = s.current_route != Route::Recommender;
                    let outcome = s.app.form_manager.finish_submit(result);
                    if stale {
                        return;
                    }
                    let script = match outcome {
                        crate::types::recommendation::SubmitOutcome::Recommendations(items) => {
                            format!(
                                "document.getElementById('f-submit').disabled=false;{}",
                                show_recommendations_script(&s, &items)
                            )
                        }
                        crate::types::recommendation::SubmitOutcome::DailyLimit(msg)
                        | crate::types::recommendation::SubmitOutcome::Rejected(msg) => format!(
                            "document.getElementById('f-submit').disabled=false;__rs_showToast({});",
                            serde_json::to_string(&msg).unwrap_or_default()
                        ),
                    };
                    let _ = webview.evaluate_script(&script);
                }

                UserEvent::HistoryIdsLoaded(result) => {
                    let reload = {
                        let mut s = state.lock().unwrap();
                        let _ = s.app.history_manager.finish_ids_fetch(result);
                        s.current_route == Route::History
                    };
                    // Reload so the listing renders from the settled state;
                    // a result for a dismissed view is recorded but not shown.
                    if reload {
                        let _ = webview.load_url(&route_url(Route::History));
                    }
                }

                UserEvent::HistoryDetailFetched { id, result } => {
                    let mut s = state.lock().unwrap();
                    let script = match result {
                        Ok(items) => {
                            let selected = s.app.history_manager.store_detail(&id, items);
                            if s.current_route != Route::History {
                                return;
                            }
                            show_recommendations_script(&s, &selected.items)
                        }
                        Err(e) => {
                            if s.current_route != Route::History {
                                return;
                            }
                            format!(
                                "__rs_showToast({});",
                                serde_json::to_string(&e.to_string()).unwrap_or_default()
                            )
                        }
                    };
                    drop(s);
                    let _ = webview.evaluate_script(&script);
                }
            },

            _ => {}
        }
    });
}
