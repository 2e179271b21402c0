//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::analytics::ReportCache;
use crate::auth::TokenVerifier;
use crate::config::Settings;
use crate::db::{
    EarningService, MessageService, NotificationService, PlatformService, ProposalService,
};
use crate::error::AppError;
use crate::generator::ProposalGenerator;
use deadpool_postgres::Pool;
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across all handlers
pub struct AppState {
    pub proposals: ProposalService,
    pub earnings: EarningService,
    pub messages: MessageService,
    pub notifications: NotificationService,
    pub platform: PlatformService,

    /// Memoized dashboard reports keyed by input fingerprint
    pub report_cache: ReportCache,

    /// Absent when no generator API key is configured
    pub generator: Option<ProposalGenerator>,

    /// Verifies bearer tokens from the hosted auth layer
    pub tokens: TokenVerifier,

    pub admin_user_ids: Vec<Uuid>,
}

impl AppState {
    pub fn new(pool: Pool, settings: &Settings) -> Result<Self, AppError> {
        Ok(Self {
            proposals: ProposalService::new(pool.clone()),
            earnings: EarningService::new(pool.clone()),
            messages: MessageService::new(pool.clone()),
            notifications: NotificationService::new(pool.clone()),
            platform: PlatformService::new(pool),
            report_cache: ReportCache::new(settings.analytics.report_cache_capacity),
            generator: ProposalGenerator::from_config(&settings.generator)?,
            tokens: TokenVerifier::new(&settings.auth.jwt_secret, &settings.auth.audience),
            admin_user_ids: settings.auth.admin_user_ids.clone(),
        })
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
