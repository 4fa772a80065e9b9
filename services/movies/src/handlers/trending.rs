use axum::extract::State;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use cinema_auth_types::identity::IdentityHeaders;
use cinema_domain::region::{Region, RegionInfo};

use crate::domain::types::TrendingEntry;
use crate::error::MoviesServiceError;
use crate::handlers::{PageResponse, page};
use crate::state::AppState;
use crate::usecase::trending::{GetTrendingMapUseCase, RegionTrending};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TrendingEntryResponse {
    pub movie_id: i32,
    pub movie_name: String,
    pub movie_image: String,
    pub total_purchases: i64,
    pub order_count: i64,
}

impl From<TrendingEntry> for TrendingEntryResponse {
    fn from(e: TrendingEntry) -> Self {
        Self {
            movie_id: e.movie_id,
            movie_name: e.movie_name,
            movie_image: e.movie_image,
            total_purchases: e.total_purchases,
            order_count: e.order_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegionTrendingResponse {
    pub code: Region,
    #[serde(flatten)]
    pub info: RegionInfo,
    pub movies: Vec<TrendingEntryResponse>,
}

impl From<RegionTrending> for RegionTrendingResponse {
    fn from(r: RegionTrending) -> Self {
        Self {
            code: r.region,
            info: r.region.info(),
            movies: r.movies.into_iter().map(TrendingEntryResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendingContext {
    pub regions: Vec<RegionTrendingResponse>,
    pub overall_trending: Vec<TrendingEntryResponse>,
    pub user_region: Option<Region>,
}

// ── GET /trending ────────────────────────────────────────────────────────────

pub async fn get_trending(
    jar: CookieJar,
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
) -> Result<PageResponse<TrendingContext>, MoviesServiceError> {
    let uc = GetTrendingMapUseCase {
        trending: state.trending_repo(),
        profiles: state.profile_repo(),
    };
    let map = uc.execute(identity.map(|i| i.user_id)).await?;
    Ok(page(
        jar,
        "Trending Movies Map",
        TrendingContext {
            regions: map
                .regions
                .into_iter()
                .map(RegionTrendingResponse::from)
                .collect(),
            overall_trending: map
                .overall
                .into_iter()
                .map(TrendingEntryResponse::from)
                .collect(),
            user_region: map.user_region,
        },
    ))
}
