use dotenv::dotenv;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Loads `.env` from the home directory, then from the current directory.
/// Values already present in the environment win over both files. Runs
/// before logging is set up, so problems go straight to stderr.
pub fn load_env_files() {
    if let Some(home_dir) = dirs::home_dir() {
        let env_path = home_dir.join(".env");
        if env_path.exists() {
            if let Err(e) = dotenv::from_path(&env_path) {
                eprintln!("Warning: failed to load {}: {}", env_path.display(), e);
            }
        }
    }

    let _ = dotenv();
}

/// Resolves the completion API key: explicit flag, then the named
/// environment variable, then `OPENAI_API_KEY`.
pub fn get_api_key(api_key: Option<&str>, api_key_env: Option<&str>) -> Option<String> {
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let var = api_key_env.unwrap_or(OPENAI_API_KEY_ENV);
    std::env::var(var).ok().filter(|k| !k.is_empty())
}
