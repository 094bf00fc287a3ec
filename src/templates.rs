/// HTML 템플릿 렌더링
/// 템플릿은 바이너리에 포함되며 처음 사용할 때 한 번 파싱된다.
// region:    --- Imports
use crate::account::model::User;
use axum::response::Html;
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

// endregion: --- Imports

// region:    --- Templates
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("layout.html", include_str!("../templates/layout.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("login.html", include_str!("../templates/login.html")),
        ("register.html", include_str!("../templates/register.html")),
        (
            "createlisting.html",
            include_str!("../templates/createlisting.html"),
        ),
        (
            "auctiondetails.html",
            include_str!("../templates/auctiondetails.html"),
        ),
        ("category.html", include_str!("../templates/category.html")),
        ("error.html", include_str!("../templates/error.html")),
    ])
    .expect("embedded templates must parse");
    tera
});

/// 템플릿 렌더링
/// 모든 페이지에 로그인 사용자 이름을 `current_user` 로 전달한다.
pub fn render<C: Serialize>(
    name: &str,
    user: Option<&User>,
    context: &C,
) -> Result<Html<String>, tera::Error> {
    let mut ctx = Context::from_serialize(context)?;
    ctx.insert("current_user", &user.map(|u| u.username.as_str()));
    TEMPLATES.render(name, &ctx).map(Html)
}

/// 오류 페이지 렌더링
pub fn render_error(message: &str) -> Result<Html<String>, tera::Error> {
    let mut ctx = Context::new();
    ctx.insert("message", message);
    ctx.insert("current_user", &Option::<&str>::None);
    TEMPLATES.render("error.html", &ctx).map(Html)
}
// endregion: --- Templates
