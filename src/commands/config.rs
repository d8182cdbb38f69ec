use crate::services::config_service;

#[tauri::command]
pub fn get_server_url() -> Result<Option<String>, String> {
    config_service::get_server_url()
}

#[tauri::command]
pub fn set_server_url(url: String) -> Result<(), String> {
    config_service::set_server_url(&url)
}

#[tauri::command]
pub fn get_config() -> Result<config_service::Config, String> {
    config_service::get_full_config()
}
