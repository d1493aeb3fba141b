use crate::models::{LockdownFlags, ServiceError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

const LOCKDOWN_FILE: &str = "./storage/lockdown.json";

// The subsystems an administrator can lock independently of the site flag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LockdownScope {
    Site,
    Tickets,
    Grants,
    Volunteers,
}

impl LockdownScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "site" => Some(LockdownScope::Site),
            "tickets" => Some(LockdownScope::Tickets),
            "grants" => Some(LockdownScope::Grants),
            "volunteers" => Some(LockdownScope::Volunteers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockdownScope::Site => "site",
            LockdownScope::Tickets => "tickets",
            LockdownScope::Grants => "grants",
            LockdownScope::Volunteers => "volunteers",
        }
    }
}

// Process-wide lockdown flag store. Flags are written rarely by admins and
// read at the start of every mutating call; state is write-through persisted
// so a restart keeps an engaged lockdown engaged.
pub struct LockdownStore {
    state: Mutex<LockdownFlags>,
}

impl LockdownStore {
    fn load() -> Self {
        let path = Path::new(LOCKDOWN_FILE);
        let flags = if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(flags) => flags,
                    Err(e) => {
                        warn!("Failed to parse lockdown state, starting unlocked: {:?}", e);
                        LockdownFlags::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read lockdown state, starting unlocked: {:?}", e);
                    LockdownFlags::default()
                }
            }
        } else {
            LockdownFlags::default()
        };

        Self {
            state: Mutex::new(flags),
        }
    }

    // Raw flag read for a single scope; no precedence applied.
    pub fn get(&self, scope: LockdownScope) -> Result<bool, ServiceError> {
        let state = self.state.lock().map_err(|_| ServiceError::InternalServerError)?;
        Ok(flag_of(&state, scope))
    }

    // Engage or lift a scope. An optional banner message is kept while any
    // flag remains engaged and cleared once the last one is lifted.
    pub fn set(
        &self,
        scope: LockdownScope,
        engaged: bool,
        message: Option<String>,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock().map_err(|_| ServiceError::InternalServerError)?;

        match scope {
            LockdownScope::Site => state.site = engaged,
            LockdownScope::Tickets => state.tickets = engaged,
            LockdownScope::Grants => state.grants = engaged,
            LockdownScope::Volunteers => state.volunteers = engaged,
        }

        if engaged {
            if message.is_some() {
                state.message = message;
            }
        } else if !(state.site || state.tickets || state.grants || state.volunteers) {
            state.message = None;
        }

        persist(&state)?;

        info!(
            "🔒 Lockdown {} for scope: {}",
            if engaged { "engaged" } else { "lifted" },
            scope.as_str()
        );

        Ok(())
    }

    // The gate rule: the site flag short-circuits every subsystem check.
    pub fn is_locked(&self, scope: LockdownScope) -> Result<bool, ServiceError> {
        let state = self.state.lock().map_err(|_| ServiceError::InternalServerError)?;
        Ok(state.site || flag_of(&state, scope))
    }

    pub fn snapshot(&self) -> Result<LockdownFlags, ServiceError> {
        let state = self.state.lock().map_err(|_| ServiceError::InternalServerError)?;
        Ok(state.clone())
    }
}

fn flag_of(state: &LockdownFlags, scope: LockdownScope) -> bool {
    match scope {
        LockdownScope::Site => state.site,
        LockdownScope::Tickets => state.tickets,
        LockdownScope::Grants => state.grants,
        LockdownScope::Volunteers => state.volunteers,
    }
}

fn persist(state: &LockdownFlags) -> Result<(), ServiceError> {
    let dir = Path::new("./storage");
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create storage directory: {:?}", e);
            ServiceError::InternalServerError
        })?;
    }

    let state_json = serde_json::to_string_pretty(state).map_err(|e| {
        error!("Failed to serialize lockdown state: {:?}", e);
        ServiceError::InternalServerError
    })?;

    fs::write(LOCKDOWN_FILE, state_json).map_err(|e| {
        error!("Failed to save lockdown state: {:?}", e);
        ServiceError::InternalServerError
    })
}

// Create a singleton lockdown store
lazy_static::lazy_static! {
    pub static ref LOCKDOWN: LockdownStore = LockdownStore::load();
}
