//! HTML pages and static directories.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ApiConfig;
use crate::state::AppState;

const PAGES: [(&str, &str); 4] = [
    ("/", "index.html"),
    ("/video", "video.html"),
    ("/login", "login.html"),
    ("/signup", "signup.html"),
];

/// Page routes plus the `/static` and `/mockvideos` directories.
pub fn page_routes(config: &ApiConfig) -> Router<AppState> {
    let router = PAGES.iter().fold(Router::new(), |router, (path, file)| {
        router.route_service(path, ServeFile::new(config.templates_dir.join(file)))
    });

    router
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .nest_service("/mockvideos", ServeDir::new(&config.mock_videos_dir))
}
