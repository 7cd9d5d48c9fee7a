use axum::response::Html;

use crate::management::Route;

pub async fn index() -> Html<String> {
    Html(format!(
        "<h2>hostmix</h2><p>Build a playlist from recommendations seeded by your top tracks.</p><a href='{}'>Host Login</a>",
        Route::Login.path()
    ))
}
