mod api_key;

pub use api_key::{get_api_key, load_env_files, OPENAI_API_KEY_ENV};
