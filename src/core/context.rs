//! Everything a command needs: the open database, the active state and a clock.

use crate::config::{Config, DEFAULT_FIRST_OFFSET_MINUTES, DEFAULT_LONG_SESSION_HOURS};
use crate::core::state::StateTracker;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::clock::{Clock, SystemClock};
use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

/// Tunables copied out of [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub long_session: Duration,
    pub first_clock_in_offset: Duration,
}

impl Settings {
    /// Out-of-range values are a `Config` error.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let long_session = Duration::try_hours(cfg.long_session_hours).ok_or_else(|| {
            AppError::Config(format!(
                "long_session_hours out of range: {}",
                cfg.long_session_hours
            ))
        })?;
        let first_clock_in_offset = Duration::try_minutes(cfg.first_clock_in_offset_minutes)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "first_clock_in_offset_minutes out of range: {}",
                    cfg.first_clock_in_offset_minutes
                ))
            })?;

        Ok(Self {
            long_session,
            first_clock_in_offset,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            long_session: Duration::hours(DEFAULT_LONG_SESSION_HOURS),
            first_clock_in_offset: Duration::minutes(DEFAULT_FIRST_OFFSET_MINUTES),
        }
    }
}

/// Owned by the command dispatcher and passed by reference to the core.
pub struct AppContext {
    pub pool: DbPool,
    pub state: StateTracker,
    pub clock: Box<dyn Clock>,
    pub settings: Settings,
}

impl AppContext {
    /// Open (and initialize if needed) the configured database with the system clock.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::new(&cfg.database)?;
        let settings = Settings::from_config(cfg)?;
        Self::with_pool(pool, Box::new(SystemClock), settings)
    }

    pub fn with_pool(pool: DbPool, clock: Box<dyn Clock>, settings: Settings) -> AppResult<Self> {
        init_db(&pool.conn)?;
        let state = StateTracker::load(&pool.conn)?;
        Ok(Self {
            pool,
            state,
            clock,
            settings,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}
