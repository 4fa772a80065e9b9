use axum::Form;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use cinema_auth_types::identity::{IdentityHeaders, LOGIN_PATH};
use cinema_core::flash::FlashMessage;
use cinema_domain::form::SignupInput;
use cinema_domain::region::{Region, RegionInfo};

use crate::domain::types::{Order, OrderItem};
use crate::error::MoviesServiceError;
use crate::handlers::{PageResponse, RedirectResponse, TRENDING_PATH, done, page, recover};
use crate::state::AppState;
use crate::usecase::account::{
    GetRegionUseCase, ListOrdersUseCase, SignupUseCase, UpdateRegionUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RegionChoice {
    pub code: Region,
    #[serde(flatten)]
    pub info: RegionInfo,
}

fn region_choices() -> Vec<RegionChoice> {
    Region::ALL
        .into_iter()
        .map(|code| RegionChoice {
            code,
            info: code.info(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct SignupContext {
    pub regions: Vec<RegionChoice>,
}

#[derive(Debug, Serialize)]
pub struct RegionContext {
    pub region: Option<Region>,
    pub regions: Vec<RegionChoice>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i32,
    pub movie_id: i32,
    pub movie_name: String,
    pub price: i32,
    pub quantity: i32,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        Self {
            id: i.id,
            movie_id: i.movie_id,
            movie_name: i.movie_name,
            price: i.price,
            quantity: i.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub total: i32,
    #[serde(serialize_with = "cinema_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            total: o.total,
            created_at: o.created_at,
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrdersContext {
    pub orders: Vec<OrderResponse>,
}

// ── Forms ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RegionForm {
    #[serde(default)]
    pub region: String,
}

// ── GET /accounts/signup ─────────────────────────────────────────────────────

pub async fn signup_form(jar: CookieJar) -> PageResponse<SignupContext> {
    page(
        jar,
        "Sign Up",
        SignupContext {
            regions: region_choices(),
        },
    )
}

// ── POST /accounts/signup ────────────────────────────────────────────────────

pub async fn signup(
    jar: CookieJar,
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = SignupUseCase {
        accounts: state.account_repo(),
        hasher: state.password_hasher(),
    };
    uc.execute(SignupInput {
        username: &form.username,
        email: &form.email,
        password1: &form.password1,
        password2: &form.password2,
        region: &form.region,
    })
    .await?;
    Ok(done(
        jar,
        Some(FlashMessage::success(
            "Account created successfully. Please log in.",
        )),
        LOGIN_PATH,
    ))
}

// ── GET /accounts/region ─────────────────────────────────────────────────────

pub async fn get_region(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<PageResponse<RegionContext>, MoviesServiceError> {
    let uc = GetRegionUseCase {
        profiles: state.profile_repo(),
    };
    let region = uc.execute(identity.into()).await?;
    Ok(page(
        jar,
        "Update Region",
        RegionContext {
            region,
            regions: region_choices(),
        },
    ))
}

// ── POST /accounts/region ────────────────────────────────────────────────────

pub async fn update_region(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Form(form): Form<RegionForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = UpdateRegionUseCase {
        profiles: state.profile_repo(),
    };
    match uc.execute(identity.into(), &form.region).await {
        Ok(_) => Ok(done(
            jar,
            Some(FlashMessage::success("Region updated successfully.")),
            TRENDING_PATH,
        )),
        Err(e) => recover(jar, e, "/accounts/region"),
    }
}

// ── GET /accounts/orders ─────────────────────────────────────────────────────

pub async fn get_orders(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<PageResponse<OrdersContext>, MoviesServiceError> {
    let uc = ListOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = uc.execute(identity.into()).await?;
    Ok(page(
        jar,
        "Orders",
        OrdersContext {
            orders: orders.into_iter().map(OrderResponse::from).collect(),
        },
    ))
}
