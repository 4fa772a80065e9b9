use uuid::Uuid;

use cinema_domain::region::Region;

use crate::domain::repository::{ProfileRepository, TrendingRepository};
use crate::domain::types::TrendingEntry;
use crate::error::MoviesServiceError;

pub const REGION_TOP_N: u64 = 5;
pub const OVERALL_TOP_N: u64 = 10;

#[derive(Debug, Clone)]
pub struct RegionTrending {
    pub region: Region,
    pub movies: Vec<TrendingEntry>,
}

#[derive(Debug, Clone)]
pub struct TrendingMap {
    /// One entry per region, in `Region::ALL` order.
    pub regions: Vec<RegionTrending>,
    pub overall: Vec<TrendingEntry>,
    /// The viewer's own region, when signed in with a profile.
    pub user_region: Option<Region>,
}

// ── GetTrendingMap ───────────────────────────────────────────────────────────

pub struct GetTrendingMapUseCase<T: TrendingRepository, Pr: ProfileRepository> {
    pub trending: T,
    pub profiles: Pr,
}

impl<T: TrendingRepository, Pr: ProfileRepository> GetTrendingMapUseCase<T, Pr> {
    pub async fn execute(&self, viewer: Option<Uuid>) -> Result<TrendingMap, MoviesServiceError> {
        let mut regions = Vec::with_capacity(Region::ALL.len());
        for region in Region::ALL {
            let movies = self.trending.top_movies(Some(region), REGION_TOP_N).await?;
            regions.push(RegionTrending { region, movies });
        }
        let overall = self.trending.top_movies(None, OVERALL_TOP_N).await?;

        let user_region = match viewer {
            Some(user_id) => self.profiles.find(user_id).await?.map(|p| p.region),
            None => None,
        };

        Ok(TrendingMap {
            regions,
            overall,
            user_region,
        })
    }
}
