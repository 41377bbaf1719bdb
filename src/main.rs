//! RepoScout — a desktop client for GitHub repository recommendations.
//!
//! Entry point: launches the webview shell. When built without the `gui`
//! feature, runs a console demo exercising each component.

#[cfg(feature = "gui")]
fn main() {
    reposcout::ui::webview_app::run();
}

#[cfg(not(feature = "gui"))]
fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               RepoScout v{} — Demo Mode                   ║", env!("CARGO_PKG_VERSION"));
    println!("║     Personalized open-source repository recommendations    ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_database();
    demo_token_cipher();
    demo_token_store();
    demo_settings();
    demo_session();
    demo_form();
    demo_pages();
    demo_app_core();

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All 8 components demonstrated successfully!");
    println!("  RepoScout is ready for webview UI integration.");
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

#[cfg(not(feature = "gui"))]
fn demo_database() {
    use reposcout::database::connection::Database;
    section("Database Layer");

    let db = Database::open_in_memory().expect("Failed to open database");
    let tables: Vec<String> = {
        let conn = db.connection();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    };
    println!("  Created {} tables: {}", tables.len(), tables.join(", "));
    println!("  ✓ Database + migrations OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_token_cipher() {
    use reposcout::services::token_cipher::{TokenCipher, TokenCipherTrait};
    section("Token Cipher");

    let cipher = TokenCipher::new();
    let key = cipher.derive_key("demo-passphrase", b"demo-salt").unwrap();
    println!("  Derived 256-bit key from passphrase (PBKDF2, 100k iterations)");

    let plaintext = b"ghs_demo_session_token";
    let sealed = cipher.seal(plaintext, &key).unwrap();
    println!(
        "  Sealed {} bytes -> {} bytes ciphertext + {} bytes IV + {} bytes tag",
        plaintext.len(),
        sealed.ciphertext.len(),
        sealed.iv.len(),
        sealed.auth_tag.len()
    );

    let opened = cipher.open(&sealed, &key).unwrap();
    assert_eq!(opened, plaintext);
    println!("  Opened successfully: \"{}\"", String::from_utf8_lossy(&opened));

    let mut sensitive = vec![0xFFu8; 32];
    cipher.zeroize_memory(&mut sensitive);
    assert!(sensitive.iter().all(|&b| b == 0));
    println!("  Zeroized 32 bytes of sensitive memory");
    println!("  ✓ TokenCipher OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_token_store() {
    use std::sync::Arc;
    use reposcout::database::connection::Database;
    use reposcout::managers::token_store::{TokenStore, TokenStoreTrait};
    section("Token Store (encrypted)");

    let db = Arc::new(Database::open_in_memory().unwrap());
    let store = TokenStore::new(db).unwrap();

    println!("  has_token (fresh): {}", store.has_token());

    store.set_token("jwt-demo-abc123").unwrap();
    println!("  Stored session token, sealed with AES-256-GCM");

    let token = store.get_token().unwrap();
    println!("  Retrieved token: {}", if token.is_some() { "OK" } else { "MISSING" });

    store.clear_token().unwrap();
    println!("  Cleared: has_token = {}", store.has_token());
    println!("  ✓ TokenStore OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_settings() {
    use reposcout::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
    section("Settings Engine");

    let mut engine = SettingsEngine::new(Some("demo_settings.json".to_string()));
    let settings = engine.load().unwrap();
    println!("  Backend URL: {}", settings.backend.api_base_url);
    println!("  Request timeout: {}s", settings.backend.request_timeout_secs);
    println!("  Max topics per card: {}", settings.display.max_topics_per_card);

    engine
        .set_value("backend.request_timeout_secs", serde_json::json!(60))
        .unwrap();
    println!(
        "  Changed timeout to: {}s",
        engine.get_settings().backend.request_timeout_secs
    );

    engine.reset().unwrap();
    println!(
        "  Reset to defaults: timeout = {}s",
        engine.get_settings().backend.request_timeout_secs
    );
    let _ = std::fs::remove_file("demo_settings.json");
    println!("  ✓ SettingsEngine OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_session() {
    use std::sync::Arc;
    use reposcout::database::connection::Database;
    use reposcout::managers::session_manager::SessionManager;
    use reposcout::managers::token_store::{TokenStore, TokenStoreTrait};
    use reposcout::types::session::Route;
    section("Session Manager");

    let db = Arc::new(Database::open_in_memory().unwrap());
    let store = Arc::new(TokenStore::new(db).unwrap());
    let mut mgr = SessionManager::new(store.clone());

    println!("  Initial state: {:?}", mgr.state());
    println!(
        "  Route guard: /recommender -> {:?}",
        mgr.route_for(Route::Recommender)
    );

    let accepted = mgr.complete_login("authenticated=true&jwt=demo-token");
    println!("  Callback accepted: {} -> {:?}", accepted, mgr.state());
    println!("  Token persisted: {}", store.has_token());

    let rejected = mgr.complete_login("authenticated=false");
    println!("  Bad callback rejected: {} -> {:?}", !rejected, mgr.state());

    mgr.logout();
    println!("  Logged out: has_token = {}", store.has_token());
    println!("  ✓ SessionManager OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_form() {
    use reposcout::managers::form_manager::FormManager;
    section("Form Manager");

    let mut form = FormManager::new(false);
    form.set_username("octocat");

    form.set_language_input("rust,go,");
    println!("  Comma-committed languages: {:?}", form.languages());

    form.set_topic_input("cli");
    form.commit_topic();
    form.set_topic_input("cli");
    form.commit_topic(); // duplicate, ignored
    println!("  Topics after duplicate commit: {:?}", form.topics());

    form.remove_language("go");
    println!("  After removing 'go': {:?}", form.languages());

    let request = form.begin_submit(false).unwrap();
    println!(
        "  Submit request: username={}, languages={:?}, topics={:?}",
        request.username, request.languages, request.extra_topics
    );
    println!("  Submitting flag: {}", form.is_submitting());

    let again = form.begin_submit(false);
    println!("  Double-submit rejected: {}", again.is_err());
    println!("  ✓ FormManager OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_pages() {
    use reposcout::pages;
    use reposcout::types::recommendation::{FetchState, RepositorySummary};
    section("Page Renderers");

    let repo = RepositorySummary {
        full_name: "rust-lang/rust".to_string(),
        description: Some("Empowering everyone to build reliable software.".to_string()),
        language: Some("Rust".to_string()),
        stargazers_count: 89500,
        forks_count: 11000,
        open_issues_count: 9000,
        updated_at: "2024-01-15".to_string(),
        topics: "compiler,language,systems".to_string(),
        repo_url: "https://github.com/rust-lang/rust".to_string(),
        avatar_url: None,
    };

    println!("  format_stars(89500) = {}", pages::format_stars(89500));

    let list = pages::recommendation_list_html(&[repo], 7);
    println!("  Rendered 1 card: {} bytes", list.len());

    let empty = pages::recommendation_list_html(&[], 7);
    println!(
        "  Empty set message: {}",
        empty.contains("No recommendations available")
    );

    let history = pages::history_list_html(&FetchState::Fetched(vec!["abc".to_string()]));
    println!("  History listing: {} bytes", history.len());
    println!("  ✓ Page renderers OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_app_core() {
    use reposcout::app::App;
    section("App Core (full lifecycle)");

    let mut app = App::new(":memory:").unwrap();
    println!("  Initialized App with all components");
    println!("  Login URL: {}", app.api.login_url());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(app.startup());
    println!("  Startup sequence: settings → credential verification");

    app.shutdown();
    println!("  Shutdown sequence: settings flush");
    println!("  ✓ App Core OK");
}
