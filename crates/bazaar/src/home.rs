//! Landing page overview.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::listings::ListingSummary;
use crate::state::Marketplace;

/// Featured listings shown per section on the landing page.
pub const FEATURED_PER_KIND: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub users: usize,
    pub active_users: usize,
    pub listings: usize,
    pub conversations: usize,
    pub featured: Vec<ListingSummary>,
}

impl Marketplace {
    pub fn overview(&self) -> Result<Overview, AppError> {
        let (users, active_users) = self.accounts.counts()?;
        Ok(Overview {
            users,
            active_users,
            listings: self.listings.count()?,
            conversations: self.conversations.count()?,
            featured: self.listings.featured(FEATURED_PER_KIND)?,
        })
    }
}

pub fn home_router() -> Router<Marketplace> {
    Router::new().route("/api/v1/home", get(overview_handler))
}

async fn overview_handler(State(market): State<Marketplace>) -> Result<Json<Overview>, AppError> {
    Ok(Json(market.overview()?))
}
