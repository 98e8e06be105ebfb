//! 根路径与示例页面

use crate::models::auth::Message;
use axum::{response::Html, Json};

/// 问候
pub async fn index() -> Json<Message> {
    Json(Message::new("Olá bb!"))
}

/// 静态 HTML 页面
pub async fn ola_mundo() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Nosso olá mundo!</title>
  </head>
  <body>
    <h1>Olá Mundo</h1>
  </body>
</html>
"#,
    )
}
