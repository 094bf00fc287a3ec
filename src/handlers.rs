// region:    --- Imports
use crate::account::extract::{CurrentUser, RequireUser};
use crate::account::model::User;
use crate::account::{self, session, LoginForm, RegisterForm};
use crate::app::AppState;
use crate::auction::model::{BidView, Category, CommentView, ListingSummary};
use crate::bidding::commands::{
    handle_close_listing as command_handle_close_listing, handle_place_bid, CloseListingCommand,
    PlaceBidCommand,
};
use crate::error::{AppError, Result};
use crate::listing::commands::{
    handle_add_comment, handle_add_watchlist as command_handle_add_watchlist,
    handle_create_listing as command_handle_create_listing,
    handle_remove_watchlist as command_handle_remove_watchlist, AddCommentCommand,
    CreateListingForm, WatchlistCommand,
};
use crate::query;
use crate::templates;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Page Contexts
#[derive(Serialize)]
struct ListingsPage {
    title: String,
    listings: Vec<ListingSummary>,
    watchlist_view: bool,
}

#[derive(Serialize, Default)]
struct LoginPage {
    message: Option<String>,
    next: Option<String>,
    username: String,
}

#[derive(Serialize, Default)]
struct RegisterPage {
    message: Option<String>,
    username: String,
    email: String,
}

#[derive(Serialize)]
struct CreateListingPage {
    message: Option<String>,
    form: CreateListingForm,
    categories: Vec<Category>,
    selected_category: Option<i64>,
}

#[derive(Serialize)]
struct ListingDetailPage {
    listing: ListingSummary,
    comments: Vec<CommentView>,
    bidder: Option<BidView>,
    bid_count: i64,
    min_bid: i64,
    is_owner: bool,
    is_watched: bool,
    is_winner: bool,
}

#[derive(Serialize)]
struct CategoriesPage {
    title: String,
    categories: Vec<Category>,
}
// endregion: --- Page Contexts

// region:    --- Forms
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BidForm {
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}
// endregion: --- Forms

// region:    --- Listing Handlers

/// 진행 중인 상품 목록
pub async fn handle_index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>> {
    info!("{:<12} --> 진행 중인 상품 목록", "Handler");
    let listings = query::handlers::get_open_listings(&state.db_manager).await?;
    render_listings(user.as_ref(), "All active listings available:", listings, false)
}

/// 종료된 상품 목록
pub async fn handle_closed_listings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>> {
    info!("{:<12} --> 종료된 상품 목록", "Handler");
    let listings = query::handlers::get_closed_listings(&state.db_manager).await?;
    render_listings(user.as_ref(), "Closed listings:", listings, false)
}

/// 상품 등록 폼
pub async fn handle_create_listing_page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>> {
    let categories = query::handlers::get_categories(&state.db_manager).await?;
    Ok(templates::render(
        "createlisting.html",
        Some(&user),
        &CreateListingPage {
            message: None,
            form: CreateListingForm::default(),
            categories,
            selected_category: None,
        },
    )?)
}

/// 상품 등록
pub async fn handle_create_listing(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<CreateListingForm>,
) -> Result<Response> {
    info!("{:<12} --> 상품 등록 요청 user: {}", "Handler", user.username);
    let result = match form.validate(user.id) {
        Ok(cmd) => command_handle_create_listing(cmd, &state.db_manager).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Validation(message)) => {
            let categories = query::handlers::get_categories(&state.db_manager).await?;
            let selected_category = form.category_id.trim().parse().ok();
            let page = templates::render(
                "createlisting.html",
                Some(&user),
                &CreateListingPage {
                    message: Some(message),
                    form,
                    categories,
                    selected_category,
                },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// 상품 상세
pub async fn handle_listing_details(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let listing_id = parse_listing_id(&id)?;
    info!("{:<12} --> 상품 상세 id: {}", "Handler", listing_id);

    let db_manager = &state.db_manager;
    let listing = query::handlers::get_listing(db_manager, listing_id)
        .await?
        .ok_or_else(AppError::listing_not_found)?;
    let comments = query::handlers::get_listing_comments(db_manager, listing_id).await?;
    let bidder = query::handlers::get_top_bid(db_manager, listing_id).await?;
    let bid_count = query::handlers::count_listing_bids(db_manager, listing_id).await?;
    let is_watched = query::handlers::is_watched(db_manager, user.id, listing_id).await?;

    let is_winner = bidder
        .as_ref()
        .is_some_and(|bid| bid.bidder_id == user.id && bid.amount == listing.current_bid);
    let page = ListingDetailPage {
        min_bid: listing.current_bid.saturating_add(1),
        is_owner: listing.owner_id == user.id,
        listing,
        comments,
        bidder,
        bid_count,
        is_watched,
        is_winner,
    };

    Ok(templates::render("auctiondetails.html", Some(&user), &page)?)
}

/// 입찰
pub async fn handle_bid(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Form(form): Form<BidForm>,
) -> Result<Redirect> {
    let listing_id = parse_listing_id(&id)?;
    let amount = form
        .amount
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation("Please enter a whole number bid.".to_string()))?;

    handle_place_bid(
        PlaceBidCommand {
            listing_id,
            bidder_id: user.id,
            amount,
        },
        &state.db_manager,
    )
    .await?;

    Ok(Redirect::to(&details_url(listing_id)))
}

/// 경매 종료
pub async fn handle_close_listing(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let listing_id = parse_listing_id(&id)?;
    command_handle_close_listing(
        CloseListingCommand {
            listing_id,
            user_id: user.id,
        },
        &state.db_manager,
    )
    .await?;

    Ok(Redirect::to(&details_url(listing_id)))
}

/// 댓글 작성
pub async fn handle_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect> {
    let listing_id = parse_listing_id(&id)?;
    handle_add_comment(
        AddCommentCommand {
            listing_id,
            author_id: user.id,
            content: form.content,
        },
        &state.db_manager,
    )
    .await?;

    Ok(Redirect::to(&details_url(listing_id)))
}

// endregion: --- Listing Handlers

// region:    --- Watchlist Handlers

/// 관심 목록
pub async fn handle_watchlist(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>> {
    info!("{:<12} --> 관심 목록 user: {}", "Handler", user.username);
    let listings = query::handlers::get_watchlist(&state.db_manager, user.id).await?;
    render_listings(Some(&user), "Your watch list:", listings, true)
}

/// 관심 목록 추가
pub async fn handle_add_watchlist(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let listing_id = parse_listing_id(&id)?;
    command_handle_add_watchlist(
        WatchlistCommand {
            listing_id,
            user_id: user.id,
        },
        &state.db_manager,
    )
    .await?;
    Ok(Redirect::to("/watchlist"))
}

/// 관심 목록 삭제
pub async fn handle_remove_watchlist(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let listing_id = parse_listing_id(&id)?;
    command_handle_remove_watchlist(
        WatchlistCommand {
            listing_id,
            user_id: user.id,
        },
        &state.db_manager,
    )
    .await?;
    Ok(Redirect::to("/watchlist"))
}

// endregion: --- Watchlist Handlers

// region:    --- Category Handlers

/// 카테고리 목록
pub async fn handle_categories(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>> {
    let categories = query::handlers::get_categories(&state.db_manager).await?;
    Ok(templates::render(
        "category.html",
        Some(&user),
        &CategoriesPage {
            title: "View listings by categories".to_string(),
            categories,
        },
    )?)
}

/// 카테고리별 상품 목록
pub async fn handle_category_listings(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(name): Path<String>,
) -> Result<Html<String>> {
    info!("{:<12} --> 카테고리별 상품 목록: {}", "Handler", name);
    let category = query::handlers::get_category_by_name(&state.db_manager, &name)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "I'm sorry, but there is no listing with category {}",
                name
            ))
        })?;
    let listings =
        query::handlers::get_listings_by_category(&state.db_manager, category.id).await?;
    render_listings(
        Some(&user),
        &format!("Listings with category {} are:", category.name),
        listings,
        false,
    )
}

// endregion: --- Category Handlers

// region:    --- Account Handlers

/// 로그인 폼
pub async fn handle_login_page(
    CurrentUser(user): CurrentUser,
    Query(query): Query<NextQuery>,
) -> Result<Html<String>> {
    Ok(templates::render(
        "login.html",
        user.as_ref(),
        &LoginPage {
            next: query.next,
            ..LoginPage::default()
        },
    )?)
}

/// 로그인
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match account::authenticate(&state.db_manager, &form.username, &form.password).await {
        Ok(user) => {
            let jar = start_session(&state, jar, &user).await?;
            let target = safe_next(form.next.as_deref());
            Ok((jar, Redirect::to(&target)).into_response())
        }
        Err(e) if e.is_user_facing() => {
            let page = templates::render(
                "login.html",
                None,
                &LoginPage {
                    message: Some(e.to_string()),
                    next: form.next,
                    username: form.username,
                },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// 로그아웃
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    if let Some(session_id) = session::session_id_from_jar(&jar) {
        session::delete_session(&state.db_manager, &session_id).await?;
    }
    Ok((jar.add(session::create_logout_cookie()), Redirect::to("/")))
}

/// 회원 가입 폼
pub async fn handle_register_page(CurrentUser(user): CurrentUser) -> Result<Html<String>> {
    Ok(templates::render(
        "register.html",
        user.as_ref(),
        &RegisterPage::default(),
    )?)
}

/// 회원 가입
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let username = form.username.clone();
    let email = form.email.clone();

    match account::register(&state.db_manager, form).await {
        Ok(user) => {
            let jar = start_session(&state, jar, &user).await?;
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(e) if e.is_user_facing() => {
            let page = templates::render(
                "register.html",
                None,
                &RegisterPage {
                    message: Some(e.to_string()),
                    username,
                    email,
                },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// endregion: --- Account Handlers

// region:    --- Helpers

fn render_listings(
    user: Option<&User>,
    title: &str,
    listings: Vec<ListingSummary>,
    watchlist_view: bool,
) -> Result<Html<String>> {
    Ok(templates::render(
        "index.html",
        user,
        &ListingsPage {
            title: title.to_string(),
            listings,
            watchlist_view,
        },
    )?)
}

/// 세션 생성 후 쿠키 설정
async fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar> {
    let session_config = &state.config.session;
    let session =
        session::create_session(&state.db_manager, user.id, session_config.ttl_secs).await?;
    Ok(jar.add(session::create_session_cookie(
        session.id,
        session_config.ttl_secs,
        session_config.secure_cookie,
    )))
}

/// 경로의 상품 id 파싱 (숫자가 아니면 없는 상품)
fn parse_listing_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| AppError::listing_not_found())
}

fn details_url(listing_id: i64) -> String {
    format!("/auctiondetails/{}", listing_id)
}

/// 로그인 후 이동할 경로 (내부 경로만 허용)
fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

// endregion: --- Helpers
