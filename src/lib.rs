mod analyzer;
mod cache;
mod commands;
mod config;
mod db;
mod error;
mod export;
mod orders;
mod state;

use state::AppState;
use tauri::Manager;

pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .manage(AppState::new())
        .setup(|app| {
            let app_handle = app.handle().clone();
            let data_dir = app_handle.path().app_data_dir()?;
            std::fs::create_dir_all(&data_dir)?;

            let config_path = data_dir.join("config.json");
            let loaded = config::load_config(&config_path);

            let state: tauri::State<AppState> = app.state();
            if let Ok(mut guard) = state.config.lock() {
                *guard = loaded;
            }
            if let Ok(mut guard) = state.config_path.lock() {
                *guard = Some(config_path);
            }

            commands::refresh::spawn_refresh_task(app_handle);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Tableau de bord
            commands::dashboard::get_dashboard,
            commands::filters::get_filter_options,
            // Export
            commands::export::export_csv,
            commands::export::export_excel_dashboard,
            // Config
            commands::config::get_config,
            commands::config::update_config,
            // Rafraîchissement
            commands::refresh::reload_orders,
            commands::refresh::set_auto_refresh,
        ])
        .run(tauri::generate_context!())
        .expect("Erreur au lancement de l'application");
}

// ─── E2E Integration Tests ──────────────────────────────────────────────────
